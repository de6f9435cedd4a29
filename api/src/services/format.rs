//! Display helpers for the post detail view.

use crate::models::Post;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const WORDS_PER_MINUTE: usize = 200;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

pub fn word_count(html: &str) -> usize {
    TAG.replace_all(html, " ").split_whitespace().count()
}

/// The stored estimate if there is one, otherwise one derived from the
/// content at 200 words per minute.
pub fn read_time(post: &Post) -> String {
    if let Some(estimate) = post.read_time.as_deref().filter(|r| !r.trim().is_empty()) {
        return estimate.to_string();
    }
    let minutes = word_count(&post.content).div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

pub fn category_link(label: &str) -> NavLink {
    nav_link("category", label)
}

pub fn tag_link(label: &str) -> NavLink {
    nav_link("tag", label)
}

fn nav_link(param: &str, label: &str) -> NavLink {
    NavLink {
        label: label.to_string(),
        href: format!("/posts?{}={}", param, urlencoding::encode(label)),
    }
}
