mod post;
mod subscriber;

pub use post::{Post, RelatedPost};
pub use subscriber::Subscriber;
