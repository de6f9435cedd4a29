mod health;
mod post;
mod subscribe;

pub use health::health_check;
pub use post::{get_post, get_posts, get_related_posts};
pub use subscribe::subscribe;
