mod comment_repository;
mod news_repository;

pub use comment_repository::CommentRepository;
pub use news_repository::NewsRepository;
