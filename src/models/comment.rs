use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::news::NewsId;
use crate::base::Value;

/// Store-assigned identifier for comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CommentId> for Value {
    fn from(id: CommentId) -> Self {
        Value::Integer(id.0)
    }
}

/// A reader comment attached to a news article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub created_at: NaiveDate,
    /// Article the comment belongs to. Not checked against the `news` table.
    pub news_id: NewsId,
}

impl Comment {
    pub fn new(id: CommentId, created_at: NaiveDate) -> Self {
        Self {
            id,
            body: String::new(),
            created_at,
            news_id: NewsId(0),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_news_id(mut self, news_id: NewsId) -> Self {
        self.news_id = news_id;
        self
    }

    pub fn belongs_to(&self, news_id: NewsId) -> bool {
        self.news_id == news_id
    }
}
