pub mod format;
mod resolver;
mod subscription;

pub use resolver::{ContentResolver, PostFilter, ResolvedPost};
pub use subscription::{RejectReason, SubscribeError, SubscribeOutcome, SubscriptionHandler};
