use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            subscribed_at: Utc::now(),
        }
    }
}
