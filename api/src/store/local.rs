use super::{PostStore, StoreError, StoreKind, SubscriberStore};
use crate::models::{Post, Subscriber};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

pub const POSTS_KEY: &str = "blogPosts";
pub const SUBSCRIBERS_KEY: &str = "subscribers";

/// Fallback store: string-keyed JSON array blobs, one file per key.
///
/// Blobs are always read and rewritten wholesale. Writers of the same key are
/// serialized so concurrent appends don't drop each other's records.
pub struct LocalStore {
    dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// A missing blob reads as an empty collection.
    pub async fn read_blob<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let raw = match fs::read(self.path_for(key)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }

    pub async fn write_blob<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.lock().await;
        self.write_unlocked(key, items).await
    }

    async fn write_unlocked<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(items)?).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Rewrote local blob {} ({} records)", key, items.len());
        Ok(())
    }
}

#[async_trait]
impl PostStore for LocalStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let posts: Vec<Post> = self.read_blob(POSTS_KEY).await?;
        Ok(posts.into_iter().find(|post| post.id == id))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.read_blob(POSTS_KEY).await
    }
}

#[async_trait]
impl SubscriberStore for LocalStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, StoreError> {
        let subscribers: Vec<Subscriber> = self.read_blob(SUBSCRIBERS_KEY).await?;
        Ok(subscribers.into_iter().find(|s| s.email == email))
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        let lock = self.lock_for(SUBSCRIBERS_KEY);
        let _guard = lock.lock().await;

        let mut subscribers: Vec<Subscriber> = self.read_blob(SUBSCRIBERS_KEY).await?;
        if subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(StoreError::Conflict);
        }

        subscribers.push(subscriber.clone());
        self.write_unlocked(SUBSCRIBERS_KEY, &subscribers).await?;

        info!("Subscriber stored locally: {}", subscriber.email);
        Ok(())
    }
}
