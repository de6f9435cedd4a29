use crate::services::PostFilter;
use serde::Deserialize;
use validator::Validate;

const MAX_LIMIT: usize = 50;

/// Only the size is checked here; trimming, case folding and the email
/// grammar check belong to `SubscriptionHandler::normalize_email`.
#[derive(Debug, Validate, Deserialize)]
pub struct SubscribeRequest {
    #[validate(length(max = 320, message = "Email address is too long"))]
    pub email: String,
}

/// `GET /posts?category=..&tag=..&featured=..&page=1&limit=10`
#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}
fn default_limit() -> usize {
    10
}

impl ListPostsParams {
    pub fn filter(&self) -> PostFilter {
        PostFilter {
            category: self.category.clone().filter(|c| !c.is_empty()),
            tag: self.tag.clone().filter(|t| !t.is_empty()),
            featured: self.featured,
        }
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}
