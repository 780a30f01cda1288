use std::sync::Arc;

use log::{debug, error, warn};

use crate::base::{Database, Params, Record, StoreResult};
use crate::models::{Comment, CommentId, NewsId};
use crate::utils::today;

const SELECT_ALL: &str = "SELECT * FROM `comment`";
const INSERT: &str =
    "INSERT INTO `comment` (`body`, `created_at`, `news_id`) VALUES (:body, :created_at, :news_id)";
const DELETE: &str = "DELETE FROM `comment` WHERE `id` = :id";

/// Comment storage over any [`Database`].
///
/// The plain methods log store failures and return an empty or negative result.
/// The `try_` methods hand the [`StoreError`](crate::base::StoreError) back instead.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<dyn Database>,
}

impl CommentRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    fn map_row(record: &Record) -> StoreResult<Comment> {
        Ok(Comment::new(CommentId(record.get_i64("id")?), record.get_date("created_at")?)
            .with_body(record.get_text("body")?)
            .with_news_id(NewsId(record.get_i64("news_id")?)))
    }

    /// Every stored comment. Rows that cannot be mapped are logged and skipped.
    pub fn try_list_comments(&self) -> StoreResult<Vec<Comment>> {
        let rows = self.db.select(SELECT_ALL, &Params::new())?;
        Ok(rows
            .iter()
            .filter_map(|record| match Self::map_row(record) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    warn!("Skipping malformed comment row: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Every stored comment; empty when the store cannot be read
    pub fn list_comments(&self) -> Vec<Comment> {
        self.try_list_comments().unwrap_or_else(|e| {
            error!("Error fetching comments: {}", e);
            Vec::new()
        })
    }

    /// Comments attached to `news_id`, filtered after a full listing
    pub fn comments_for_news(&self, news_id: NewsId) -> Vec<Comment> {
        self.list_comments()
            .into_iter()
            .filter(|c| c.belongs_to(news_id))
            .collect()
    }

    pub fn try_add_comment_for_news(&self, body: &str, news_id: NewsId) -> StoreResult<Option<CommentId>> {
        let params = Params::new()
            .with_value(":body", body)
            .with_value(":created_at", today())
            .with_value(":news_id", news_id);

        if !self.db.exec(INSERT, &params)? {
            warn!("Insert of comment for news {} reported no rows", news_id);
            return Ok(None);
        }

        let id = CommentId(self.db.last_insert_id()?);
        debug!("Added comment {} to news {}", id, news_id);
        Ok(Some(id))
    }

    /// Stores a new comment dated today and returns its id
    pub fn add_comment_for_news(&self, body: &str, news_id: NewsId) -> Option<CommentId> {
        self.try_add_comment_for_news(body, news_id).unwrap_or_else(|e| {
            error!("Error adding comment: {}", e);
            None
        })
    }

    pub fn try_delete_comment(&self, id: CommentId) -> StoreResult<bool> {
        self.db.exec(DELETE, &Params::new().with_value(":id", id))
    }

    /// `false` when nothing was deleted or the store failed
    pub fn delete_comment(&self, id: CommentId) -> bool {
        self.try_delete_comment(id).unwrap_or_else(|e| {
            error!("Error deleting comment {}: {}", id, e);
            false
        })
    }
}
