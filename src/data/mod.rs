pub mod database;
pub mod repositories;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use database::{init_database, in_memory_pool, SqliteDatabase, SCHEMA};
pub use repositories::{CommentRepository, NewsRepository};
