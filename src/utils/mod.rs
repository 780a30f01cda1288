use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::models::{Comment, News};

/// Current local date, used as `created_at` for new rows
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Ensures that the directory for the given file path exists
///
/// This function extracts the directory part of a given file path
/// and creates it if it doesn't exist.
///
/// # Arguments
/// * `file_path` - The path to the file including the filename
///
/// # Returns
/// * `Result<()>` - Ok if the directory exists or was created successfully
pub fn ensure_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(||
                format!("Failed to create directory: {}", parent.display())
            )?;
        }
    }
    Ok(())
}

/// Writes every news item followed by the comments that belong to it
pub fn write_news_listing<W: Write>(out: &mut W, news: &[News], comments: &[Comment]) -> io::Result<()> {
    for item in news {
        writeln!(out, "############ NEWS {} ############", item.title)?;
        writeln!(out, "{}", item.body)?;

        for comment in comments.iter().filter(|c| c.belongs_to(item.id)) {
            writeln!(out, "Comment {} : {}", comment.id, comment.body)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentId, NewsId};

    #[test]
    fn test_ensure_directory_exists_creates_parent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("nested").join("deeper").join("newsdesk.db");

        ensure_directory_exists(&db_path)?;

        assert!(db_path.parent().unwrap().is_dir());
        assert!(!db_path.exists());
        Ok(())
    }

    #[test]
    fn test_ensure_directory_exists_bare_file_name() -> Result<()> {
        ensure_directory_exists(Path::new("newsdesk.db"))
    }

    #[test]
    fn test_write_news_listing_groups_comments() -> Result<()> {
        let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        let news = vec![
            News::new(NewsId(1), date).with_title("First").with_body("One"),
            News::new(NewsId(2), date).with_title("Second").with_body("Two"),
        ];
        let comments = vec![
            Comment::new(CommentId(10), date).with_body("on second").with_news_id(NewsId(2)),
            Comment::new(CommentId(11), date).with_body("on first").with_news_id(NewsId(1)),
            Comment::new(CommentId(12), date).with_body("orphan").with_news_id(NewsId(3)),
        ];

        let mut out = Vec::new();
        write_news_listing(&mut out, &news, &comments)?;

        let expected = "\
############ NEWS First ############
One
Comment 11 : on first
############ NEWS Second ############
Two
Comment 10 : on second
";
        assert_eq!(String::from_utf8(out)?, expected);
        Ok(())
    }
}
