use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::base::Value;

/// Store-assigned identifier for news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NewsId(pub i64);

impl fmt::Display for NewsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NewsId> for Value {
    fn from(id: NewsId) -> Self {
        Value::Integer(id.0)
    }
}

/// A news article as stored in the `news` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: NewsId,
    /// Headline
    pub title: String,
    /// Article text
    pub body: String,
    /// Day the article was created; never changes afterwards
    pub created_at: NaiveDate,
}

impl News {
    /// Creates an empty article for a persisted id
    pub fn new(id: NewsId, created_at: NaiveDate) -> Self {
        Self {
            id,
            title: String::new(),
            body: String::new(),
            created_at,
        }
    }

    /// Sets the headline
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the article text
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl fmt::Display for News {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
