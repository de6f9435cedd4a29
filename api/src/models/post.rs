use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single blog article, as stored in both the remote `blog_posts` table and
/// the local `blogPosts` blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    /// Display date, e.g. "2024-03-18" or "March 18, 2024".
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub featured: bool,
}

impl Post {
    pub fn shares_category_with(&self, other: &Post) -> bool {
        self.categories
            .iter()
            .any(|category| other.categories.contains(category))
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Best-effort parse of the display date.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
            return Some(parsed.date_naive());
        }
        ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"]
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
    }

    /// Newest first; posts without a parseable date sort last.
    pub fn newest_first(a: &Post, b: &Post) -> Ordering {
        match (a.published_on(), b.published_on()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Lightweight projection used for the "related posts" strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub author: String,
    pub date: String,
}

impl From<&Post> for RelatedPost {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image: post.image.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, date: &str, categories: &[&str]) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            excerpt: String::new(),
            content: String::new(),
            author: "Jane".to_string(),
            date: date.to_string(),
            read_time: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            tags: vec![],
            image: String::new(),
            featured: false,
        }
    }

    #[test]
    fn deserializes_sparse_record_with_defaults() {
        let post: Post =
            serde_json::from_str(r#"{"id":"a","title":"Hello","readTime":"4 min read"}"#).unwrap();

        assert_eq!(post.read_time.as_deref(), Some("4 min read"));
        assert!(post.categories.is_empty());
        assert!(!post.featured);
    }

    #[test]
    fn category_overlap_is_exact() {
        let a = post("a", "", &["Rust", "Web"]);
        let b = post("b", "", &["Web"]);
        let c = post("c", "", &["rust"]);

        assert!(a.shares_category_with(&b));
        assert!(!a.shares_category_with(&c));
    }

    #[test]
    fn parses_common_display_dates() {
        assert_eq!(
            post("a", "March 18, 2024", &[]).published_on(),
            NaiveDate::from_ymd_opt(2024, 3, 18)
        );
        assert_eq!(
            post("a", "2023-11-02", &[]).published_on(),
            NaiveDate::from_ymd_opt(2023, 11, 2)
        );
        assert_eq!(post("a", "last week", &[]).published_on(), None);
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let mut posts = vec![
            post("old", "2022-01-01", &[]),
            post("undated", "soon", &[]),
            post("new", "2024-06-01", &[]),
        ];
        posts.sort_by(Post::newest_first);

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["new", "old", "undated"]);
    }
}
