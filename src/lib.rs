pub mod base;
pub mod config;
pub mod data;
pub mod models;
pub mod utils;

// Re-export the gateway contract
pub use base::{Database, Params, Record, StoreError, StoreResult, Value};

// Re-export the SQLite adapter and repositories
pub use data::{CommentRepository, NewsRepository, SqliteDatabase};

// Re-export models
pub use models::{
    comment::{Comment, CommentId},
    news::{News, NewsId},
};

pub use config::{DatabaseSettings, Settings};
