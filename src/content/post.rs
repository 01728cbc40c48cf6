//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Identifier derived from the source filename (file stem)
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date, when the front-matter carries a parseable one
    pub date: Option<DateTime<Local>>,

    /// Date string as written in front-matter, for display
    pub date_raw: String,

    /// Excerpt (falls back to the description field)
    pub excerpt: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Post author
    pub author: Option<String>,

    /// Whether the post is published
    pub published: bool,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Whether the body contains math notation
    pub has_math: bool,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(id: String, title: String, source: String) -> Self {
        Self {
            id,
            title,
            date: None,
            date_raw: String::new(),
            excerpt: None,
            tags: Vec::new(),
            author: None,
            published: false,
            raw: String::new(),
            content: String::new(),
            has_math: false,
            source: source.clone(),
            full_source: PathBuf::from(&source),
            extra: HashMap::new(),
        }
    }

    /// URL path of this post
    pub fn path(&self) -> String {
        format!("/post/{}", crate::helpers::encode_segment(&self.id))
    }

    /// Whether the post carries the given tag, matched by name or slug
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t == tag || slug::slugify(t) == tag)
    }

    /// Ordering for listings: date descending, undated posts last.
    /// Used with a stable sort so ties keep their file order.
    pub fn cmp_by_date(a: &Post, b: &Post) -> Ordering {
        match (a.date, b.date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_dated(id: &str, date: Option<(i32, u32, u32)>) -> Post {
        let mut post = Post::new(id.to_string(), id.to_string(), format!("{}.md", id));
        post.date = date.map(|(y, m, d)| Local.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
        post
    }

    #[test]
    fn test_cmp_by_date_descending() {
        let older = post_dated("older", Some((2024, 1, 1)));
        let newer = post_dated("newer", Some((2024, 3, 1)));
        assert_eq!(Post::cmp_by_date(&newer, &older), Ordering::Less);
        assert_eq!(Post::cmp_by_date(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_cmp_by_date_undated_last() {
        let dated = post_dated("dated", Some((2024, 1, 1)));
        let undated = post_dated("undated", None);
        assert_eq!(Post::cmp_by_date(&dated, &undated), Ordering::Less);
        assert_eq!(Post::cmp_by_date(&undated, &dated), Ordering::Greater);
        assert_eq!(Post::cmp_by_date(&undated, &undated), Ordering::Equal);
    }

    #[test]
    fn test_has_tag_by_name_and_slug() {
        let mut post = post_dated("p", None);
        post.tags = vec!["Machine Learning".to_string(), "go".to_string()];
        assert!(post.has_tag("go"));
        assert!(post.has_tag("Machine Learning"));
        assert!(post.has_tag("machine-learning"));
        assert!(!post.has_tag("rust"));
    }

    #[test]
    fn test_path_encodes_id() {
        let post = post_dated("hello world", None);
        assert_eq!(post.path(), "/post/hello%20world");
    }
}
