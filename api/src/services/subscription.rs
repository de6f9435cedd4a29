use crate::{
    models::Subscriber,
    store::{StoreError, StoreKind, SubscriberStore},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use validator::ValidateEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidEmail,
    Duplicate,
}

/// Terminal states of a subscription attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Accepted(Subscriber),
    /// The primary store was unusable and the fallback store took the record.
    AcceptedLocally(Subscriber),
    Rejected(RejectReason),
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("no subscriber store accepted the record: {0}")]
    StoresExhausted(#[source] StoreError),
}

pub struct SubscriptionHandler {
    stores: Vec<Arc<dyn SubscriberStore>>,
}

impl SubscriptionHandler {
    pub fn new(stores: Vec<Arc<dyn SubscriberStore>>) -> Self {
        Self { stores }
    }

    /// Trims and lowercases; rejects anything that is empty, has no `@` or
    /// fails the email grammar check.
    pub fn normalize_email(raw: &str) -> Result<String, RejectReason> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') || !email.validate_email() {
            return Err(RejectReason::InvalidEmail);
        }
        Ok(email)
    }

    pub async fn subscribe(&self, raw_email: &str) -> Result<SubscribeOutcome, SubscribeError> {
        let email = match Self::normalize_email(raw_email) {
            Ok(email) => email,
            Err(reason) => return Ok(SubscribeOutcome::Rejected(reason)),
        };

        let mut last_error = StoreError::Unconfigured;
        for store in &self.stores {
            match self.try_store(store.as_ref(), &email).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    warn!("{:?} subscriber store failed for {}: {}", store.kind(), email, e);
                    last_error = e;
                }
            }
        }

        Err(SubscribeError::StoresExhausted(last_error))
    }

    async fn try_store(
        &self,
        store: &dyn SubscriberStore,
        email: &str,
    ) -> Result<SubscribeOutcome, StoreError> {
        if store.find_subscriber(email).await?.is_some() {
            info!("Duplicate subscription rejected: {}", email);
            return Ok(SubscribeOutcome::Rejected(RejectReason::Duplicate));
        }

        let subscriber = Subscriber::new(email);
        match store.insert_subscriber(&subscriber).await {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                info!("Duplicate subscription rejected on insert: {}", email);
                return Ok(SubscribeOutcome::Rejected(RejectReason::Duplicate));
            }
            Err(e) => return Err(e),
        }

        info!("New subscriber: {} ({:?} store)", email, store.kind());
        Ok(match store.kind() {
            StoreKind::Remote => SubscribeOutcome::Accepted(subscriber),
            StoreKind::Local => SubscribeOutcome::AcceptedLocally(subscriber),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn handler(remote: &Arc<MemoryStore>, local: &Arc<MemoryStore>) -> SubscriptionHandler {
        SubscriptionHandler::new(vec![
            remote.clone() as Arc<dyn SubscriberStore>,
            local.clone(),
        ])
    }

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
        (
            Arc::new(MemoryStore::new(StoreKind::Remote)),
            Arc::new(MemoryStore::new(StoreKind::Local)),
        )
    }

    #[test]
    fn normalizes_and_validates() {
        assert_eq!(
            SubscriptionHandler::normalize_email("  Reader@Example.COM "),
            Ok("reader@example.com".to_string())
        );
        for bad in ["", "   ", "not-an-email", "@", "a@"] {
            assert_eq!(
                SubscriptionHandler::normalize_email(bad),
                Err(RejectReason::InvalidEmail),
                "{bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn invalid_email_touches_no_store() {
        let (remote, local) = stores();

        let outcome = handler(&remote, &local).subscribe("not-an-email").await.unwrap();

        assert_eq!(outcome, SubscribeOutcome::Rejected(RejectReason::InvalidEmail));
        assert_eq!(remote.subscriber_count() + local.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn new_email_goes_to_remote() {
        let (remote, local) = stores();

        let outcome = handler(&remote, &local)
            .subscribe("reader@example.com")
            .await
            .unwrap();

        assert!(matches!(outcome, SubscribeOutcome::Accepted(ref s) if s.email == "reader@example.com"));
        assert!(remote.contains_subscriber("reader@example.com"));
        assert_eq!(local.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_is_checked_against_authoritative_store() {
        let (remote, local) = stores();
        let handler = handler(&remote, &local);
        handler.subscribe("reader@example.com").await.unwrap();

        let again = handler.subscribe("READER@example.com").await.unwrap();
        assert_eq!(again, SubscribeOutcome::Rejected(RejectReason::Duplicate));

        // Once the remote is down the local list is authoritative, and it has
        // never seen this address.
        remote.set_available(false);
        let degraded = handler.subscribe("reader@example.com").await.unwrap();
        assert!(matches!(degraded, SubscribeOutcome::AcceptedLocally(_)));

        let again = handler.subscribe("reader@example.com").await.unwrap();
        assert_eq!(again, SubscribeOutcome::Rejected(RejectReason::Duplicate));
    }

    #[tokio::test]
    async fn remote_outage_accepts_locally() {
        let (remote, local) = stores();
        remote.set_available(false);

        let outcome = handler(&remote, &local)
            .subscribe("new@example.com")
            .await
            .unwrap();

        assert!(matches!(outcome, SubscribeOutcome::AcceptedLocally(_)));
        assert!(local.contains_subscriber("new@example.com"));
    }

    #[tokio::test]
    async fn exhausted_chain_is_an_error() {
        let (remote, local) = stores();
        remote.set_available(false);
        local.set_available(false);

        let result = handler(&remote, &local).subscribe("new@example.com").await;

        assert!(matches!(
            result,
            Err(SubscribeError::StoresExhausted(StoreError::Unavailable(_)))
        ));
    }
}
