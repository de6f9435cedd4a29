use super::{PostStore, StoreError, StoreKind, SubscriberStore};
use crate::models::{Post, Subscriber};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process test double backed by `DashMap`s.
///
/// Stands in for either side of the chain in tests; toggling availability
/// makes every call fail with [`StoreError::Unavailable`]. `AppState::from_config`
/// never builds one.
pub struct MemoryStore {
    kind: StoreKind,
    posts: DashMap<String, Post>,
    subscribers: DashMap<String, Subscriber>, // keyed by email
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new(kind: StoreKind) -> Self {
        Self {
            kind,
            posts: DashMap::new(),
            subscribers: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_posts(kind: StoreKind, posts: impl IntoIterator<Item = Post>) -> Self {
        let store = Self::new(kind);
        for post in posts {
            store.posts.insert(post.id.clone(), post);
        }
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn contains_subscriber(&self, email: &str) -> bool {
        self.subscribers.contains_key(email)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store switched off".into()))
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        self.ensure_available()?;
        Ok(self.posts.get(id).map(|entry| entry.value().clone()))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.ensure_available()?;
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary
        posts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(posts)
    }
}

#[async_trait]
impl SubscriberStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, StoreError> {
        self.ensure_available()?;
        Ok(self.subscribers.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        self.ensure_available()?;
        match self.subscribers.entry(subscriber.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(subscriber.clone());
                Ok(())
            }
        }
    }
}
