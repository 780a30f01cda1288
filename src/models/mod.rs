pub mod comment;
pub mod news;

pub use comment::{Comment, CommentId};
pub use news::{News, NewsId};
