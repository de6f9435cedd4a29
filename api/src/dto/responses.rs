use crate::{
    models::{Post, RelatedPost},
    services::format::NavLink,
    store::StoreKind,
};
use serde::Serialize;

/// Everything the post detail page renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: Post,
    pub category_links: Vec<NavLink>,
    pub tag_links: Vec<NavLink>,
    pub related: Vec<RelatedPost>,
    pub source: StoreKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionStatus {
    Accepted,
    AcceptedLocally,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub status: SubscriptionStatus,
    pub message: String,
    /// Whether the form should clear its input.
    pub reset_form: bool,
}

impl SubscribeResponse {
    pub fn accepted() -> Self {
        Self {
            status: SubscriptionStatus::Accepted,
            message: "Thank you for subscribing to our newsletter!".to_string(),
            reset_form: true,
        }
    }

    pub fn accepted_locally() -> Self {
        Self {
            status: SubscriptionStatus::AcceptedLocally,
            message: "Thank you for subscribing! Your subscription was saved and will be synced once our mailing list is reachable.".to_string(),
            reset_form: true,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

impl<T: Clone> PaginatedResponse<T> {
    pub fn paginate(items: &[T], page: usize, limit: usize) -> Self {
        let total = items.len();
        let start = page.saturating_sub(1).saturating_mul(limit);
        let end = start.saturating_add(limit).min(total);

        let data = if start < total {
            items[start..end].to_vec()
        } else {
            vec![]
        };

        Self {
            data,
            page,
            limit,
            total,
        }
    }
}
