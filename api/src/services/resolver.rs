use crate::{
    models::{Post, RelatedPost},
    store::{PostStore, RELATED_LIMIT, StoreKind},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// A post together with the store that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedPost {
    pub post: Post,
    pub source: StoreKind,
    /// Position of the producing store in the chain.
    pub position: usize,
}

/// Category / tag navigation filter for post listings.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.category.as_deref().is_none_or(|c| post.has_category(c))
            && self.tag.as_deref().is_none_or(|t| post.has_tag(t))
            && self.featured.is_none_or(|f| post.featured == f)
    }
}

/// Resolves posts from an ordered chain of stores, primary first.
///
/// Each store gets exactly one attempt per call. Errors and, for single-post
/// lookups, misses move on to the next store.
pub struct ContentResolver {
    sources: Vec<Arc<dyn PostStore>>,
}

impl ContentResolver {
    pub fn new(sources: Vec<Arc<dyn PostStore>>) -> Self {
        Self { sources }
    }

    pub async fn resolve_post(&self, id: &str) -> Option<ResolvedPost> {
        for (position, source) in self.sources.iter().enumerate() {
            match source.find_post(id).await {
                Ok(Some(post)) => {
                    debug!("Post {} resolved from {:?} store", id, source.kind());
                    return Some(ResolvedPost {
                        post,
                        source: source.kind(),
                        position,
                    });
                }
                Ok(None) => debug!("Post {} not in {:?} store", id, source.kind()),
                Err(e) => warn!("{:?} store lookup for {} failed: {}", source.kind(), id, e),
            }
        }
        None
    }

    /// Related posts starting from the primary store.
    pub async fn resolve_related(&self, post: &Post, exclude_id: &str) -> Vec<RelatedPost> {
        self.resolve_related_from(0, post, exclude_id).await
    }

    /// Related posts starting from the store at `start`.
    ///
    /// The first store that answers is authoritative, an empty answer
    /// included. Returns an empty list if every store fails.
    pub async fn resolve_related_from(
        &self,
        start: usize,
        post: &Post,
        exclude_id: &str,
    ) -> Vec<RelatedPost> {
        for source in self.sources.iter().skip(start) {
            match source.related_posts(post, exclude_id, RELATED_LIMIT).await {
                Ok(posts) => return posts.iter().map(RelatedPost::from).collect(),
                Err(e) => warn!(
                    "{:?} store related lookup for {} failed: {}",
                    source.kind(),
                    post.id,
                    e
                ),
            }
        }
        Vec::new()
    }

    /// All posts matching `filter`, newest first, from the first store that
    /// has any post at all.
    pub async fn list_posts(&self, filter: &PostFilter) -> (Vec<Post>, Option<StoreKind>) {
        for source in &self.sources {
            match source.list_posts().await {
                Ok(posts) if posts.is_empty() => {
                    debug!("{:?} store has no posts", source.kind());
                }
                Ok(posts) => {
                    let mut matching: Vec<Post> =
                        posts.into_iter().filter(|p| filter.matches(p)).collect();
                    matching.sort_by(Post::newest_first);
                    return (matching, Some(source.kind()));
                }
                Err(e) => warn!("{:?} store listing failed: {}", source.kind(), e),
            }
        }
        (Vec::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn post(id: &str, categories: &[&str]) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("{id} title"),
            "categories": categories,
        }))
        .unwrap()
    }

    fn chain(remote: Arc<MemoryStore>, local: Arc<MemoryStore>) -> ContentResolver {
        ContentResolver::new(vec![remote as Arc<dyn PostStore>, local])
    }

    #[tokio::test]
    async fn remote_copy_wins_when_present() {
        let mut remote_copy = post("p1", &["rust"]);
        remote_copy.title = "remote".into();
        let mut local_copy = post("p1", &["rust"]);
        local_copy.title = "local".into();
        let remote = Arc::new(MemoryStore::with_posts(StoreKind::Remote, [remote_copy.clone()]));
        let local = Arc::new(MemoryStore::with_posts(StoreKind::Local, [local_copy]));

        let resolved = chain(remote, local).resolve_post("p1").await.unwrap();

        assert_eq!(resolved.post, remote_copy);
        assert_eq!(resolved.source, StoreKind::Remote);
    }

    #[tokio::test]
    async fn falls_back_on_miss_and_on_error() {
        let remote = Arc::new(MemoryStore::new(StoreKind::Remote));
        let local = Arc::new(MemoryStore::with_posts(StoreKind::Local, [post("p1", &[])]));
        let resolver = chain(remote.clone(), local);

        let missed = resolver.resolve_post("p1").await.unwrap();
        assert_eq!(missed.source, StoreKind::Local);
        assert_eq!(missed.position, 1);

        remote.set_available(false);
        assert_eq!(
            resolver.resolve_post("p1").await.unwrap().source,
            StoreKind::Local
        );
    }

    #[tokio::test]
    async fn absent_everywhere_is_none() {
        let remote = Arc::new(MemoryStore::new(StoreKind::Remote));
        let local = Arc::new(MemoryStore::new(StoreKind::Local));

        assert!(chain(remote, local).resolve_post("ghost").await.is_none());
    }

    #[tokio::test]
    async fn related_never_includes_current_and_is_capped() {
        let current = post("current", &["rust"]);
        let mut posts = vec![current.clone(), post("other", &["go"])];
        posts.extend((0..6).map(|i| post(&format!("r{i}"), &["rust"])));
        let remote = Arc::new(MemoryStore::with_posts(StoreKind::Remote, posts));
        let local = Arc::new(MemoryStore::new(StoreKind::Local));

        let related = chain(remote, local)
            .resolve_related(&current, &current.id)
            .await;

        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|r| r.id != "current" && r.id != "other"));
    }

    #[tokio::test]
    async fn related_falls_back_only_on_error() {
        let current = post("current", &["rust"]);
        let remote = Arc::new(MemoryStore::with_posts(StoreKind::Remote, [current.clone()]));
        let local = Arc::new(MemoryStore::with_posts(
            StoreKind::Local,
            [post("local-1", &["rust"])],
        ));
        let resolver = chain(remote.clone(), local);

        assert!(resolver.resolve_related(&current, "current").await.is_empty());

        remote.set_available(false);
        let related = resolver.resolve_related(&current, "current").await;
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "local-1");
    }

    #[tokio::test]
    async fn listing_filters_and_skips_empty_primary() {
        let remote = Arc::new(MemoryStore::new(StoreKind::Remote));
        let mut featured = post("b", &["Rust"]);
        featured.featured = true;
        let local = Arc::new(MemoryStore::with_posts(
            StoreKind::Local,
            [post("a", &["rust"]), featured, post("c", &["go"])],
        ));
        let resolver = chain(remote, local);

        let (posts, source) = resolver
            .list_posts(&PostFilter {
                category: Some("rust".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(source, Some(StoreKind::Local));
        assert_eq!(posts.len(), 2);

        let (featured_only, _) = resolver
            .list_posts(&PostFilter {
                featured: Some(true),
                ..Default::default()
            })
            .await;
        assert_eq!(featured_only.len(), 1);
        assert_eq!(featured_only[0].id, "b");
    }
}
