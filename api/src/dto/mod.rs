mod requests;
mod responses;

pub use requests::{ListPostsParams, SubscribeRequest};
pub use responses::{PaginatedResponse, PostDetailResponse, SubscribeResponse, SubscriptionStatus};
