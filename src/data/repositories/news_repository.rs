use std::sync::Arc;

use log::{debug, error, info, warn};

use super::comment_repository::CommentRepository;
use crate::base::{Database, Params, Record, StoreResult};
use crate::models::{News, NewsId};
use crate::utils::today;

const SELECT_ALL: &str = "SELECT * FROM `news`";
const INSERT: &str =
    "INSERT INTO `news` (`title`, `body`, `created_at`) VALUES (:title, :body, :created_at)";
const DELETE: &str = "DELETE FROM `news` WHERE `id` = :id";

/// News storage over any [`Database`], cascading deletes to comments
#[derive(Clone)]
pub struct NewsRepository {
    db: Arc<dyn Database>,
    comments: CommentRepository,
}

impl NewsRepository {
    pub fn new(db: Arc<dyn Database>, comments: CommentRepository) -> Self {
        Self { db, comments }
    }

    pub fn comments(&self) -> &CommentRepository {
        &self.comments
    }

    fn map_row(record: &Record) -> StoreResult<News> {
        Ok(News::new(NewsId(record.get_i64("id")?), record.get_date("created_at")?)
            .with_title(record.get_text("title")?)
            .with_body(record.get_text("body")?))
    }

    /// Every stored article. Rows that cannot be mapped are logged and skipped.
    pub fn try_list_news(&self) -> StoreResult<Vec<News>> {
        let rows = self.db.select(SELECT_ALL, &Params::new())?;
        Ok(rows
            .iter()
            .filter_map(|record| match Self::map_row(record) {
                Ok(news) => Some(news),
                Err(e) => {
                    warn!("Skipping malformed news row: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Every stored article; empty when the store cannot be read
    pub fn list_news(&self) -> Vec<News> {
        self.try_list_news().unwrap_or_else(|e| {
            error!("Error fetching news: {}", e);
            Vec::new()
        })
    }

    pub fn try_add_news(&self, title: &str, body: &str) -> StoreResult<Option<NewsId>> {
        let params = Params::new()
            .with_value(":title", title)
            .with_value(":body", body)
            .with_value(":created_at", today());

        if !self.db.exec(INSERT, &params)? {
            warn!("Insert of news '{}' reported no rows", title);
            return Ok(None);
        }

        let id = NewsId(self.db.last_insert_id()?);
        info!("Added news {} '{}'", id, title);
        Ok(Some(id))
    }

    /// Stores a new article dated today and returns its id
    pub fn add_news(&self, title: &str, body: &str) -> Option<NewsId> {
        self.try_add_news(title, body).unwrap_or_else(|e| {
            error!("Error adding news: {}", e);
            None
        })
    }

    /// Deletes the comments of `id`, then the article itself.
    ///
    /// Stops at the first store failure, leaving the article in place. Comments
    /// deleted before the failure stay deleted.
    pub fn try_delete_news(&self, id: NewsId) -> StoreResult<bool> {
        let mut removed = 0;
        for comment in self.comments.try_list_comments()? {
            if comment.belongs_to(id) && self.comments.try_delete_comment(comment.id)? {
                removed += 1;
            }
        }
        debug!("Removed {} comments linked to news {}", removed, id);
        self.delete_row(id)
    }

    /// Deletes the comments of `id`, then the article itself.
    ///
    /// Each comment delete logs and swallows its own failure, and the article row
    /// is deleted even when the comments could not be listed. The steps are not
    /// atomic: any comment that failed to delete is left pointing at a deleted
    /// article.
    pub fn delete_news(&self, id: NewsId) -> bool {
        self.delete_linked_comments(id);

        self.delete_row(id).unwrap_or_else(|e| {
            error!("Error deleting news {}: {}", id, e);
            false
        })
    }

    // Full listing plus one delete per matching comment
    fn delete_linked_comments(&self, id: NewsId) {
        let comments = match self.comments.try_list_comments() {
            Ok(comments) => comments,
            Err(e) => {
                error!("Error deleting linked comments of news {}: {}", id, e);
                return;
            }
        };

        let removed = comments
            .iter()
            .filter(|c| c.belongs_to(id))
            .filter(|c| self.comments.delete_comment(c.id))
            .count();
        debug!("Removed {} comments linked to news {}", removed, id);
    }

    fn delete_row(&self, id: NewsId) -> StoreResult<bool> {
        let deleted = self.db.exec(DELETE, &Params::new().with_value(":id", id))?;
        if deleted {
            info!("Deleted news {}", id);
        }
        Ok(deleted)
    }
}
