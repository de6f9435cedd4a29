use crate::{
    AppState,
    dto::{ListPostsParams, PaginatedResponse, PostDetailResponse},
    errors::ApiError,
    models::{Post, RelatedPost},
    services::format::{category_link, read_time, tag_link},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;

/// GET /posts?category=..&tag=..&featured=..&page=1&limit=10
pub async fn get_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
) -> Json<PaginatedResponse<Post>> {
    let (posts, _source) = state.resolver.list_posts(&params.filter()).await;

    Json(PaginatedResponse::paginate(
        &posts,
        params.page(),
        params.limit(),
    ))
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let resolved = state
        .resolver
        .resolve_post(&id)
        .await
        .ok_or(ApiError::NotFound)?;

    // Related posts come from the same store as the post itself.
    let related = state
        .resolver
        .resolve_related_from(resolved.position, &resolved.post, &id)
        .await;

    let mut post = resolved.post;
    post.read_time = Some(read_time(&post));

    info!("Serving post {} from {:?} store", post.id, resolved.source);

    Ok(Json(PostDetailResponse {
        category_links: post.categories.iter().map(|c| category_link(c)).collect(),
        tag_links: post.tags.iter().map(|t| tag_link(t)).collect(),
        related,
        source: resolved.source,
        post,
    }))
}

/// GET /posts/:id/related
pub async fn get_related_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RelatedPost>>, ApiError> {
    let resolved = state
        .resolver
        .resolve_post(&id)
        .await
        .ok_or(ApiError::NotFound)?;

    Ok(Json(
        state.resolver.resolve_related(&resolved.post, &id).await,
    ))
}
