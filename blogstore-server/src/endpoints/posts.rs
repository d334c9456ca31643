use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing};
use blogstore_types::{Post, PostId, PostInput, PostStatus};

use crate::endpoints::common::{ApiError, ApiResult};
use crate::state::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/blogs", routing::get(posts_list))
        .route("/blogs/save-draft", routing::post(draft_create))
        .route("/blogs/publish", routing::post(publish_create))
        .route("/blogs/{id}", routing::get(post_get))
        .route("/blogs/{id}/save-draft", routing::post(draft_update))
        .route("/blogs/{id}/publish", routing::post(publish_update))
}

async fn posts_list(State(state): State<ServiceState>) -> ApiResult<Json<Vec<Post>>> {
    let posts = state
        .service
        .list_posts()
        .await
        .map_err(|err| ApiError::server("Failed to retrieve blogs", err))?;

    Ok(Json(posts))
}

async fn post_get(
    State(state): State<ServiceState>,
    Path(id): Path<PostId>,
) -> ApiResult<Json<Post>> {
    let post = state
        .service
        .get_post(&id)
        .await
        .map_err(|err| ApiError::server("Failed to retrieve blog", err))?;

    post.map(Json).ok_or(ApiError::NotFound)
}

async fn draft_create(
    State(state): State<ServiceState>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let Json(input) = payload?;
    create(&state, input, PostStatus::Draft, "Failed to save draft").await
}

async fn draft_update(
    State(state): State<ServiceState>,
    Path(id): Path<PostId>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    let Json(input) = payload?;
    update(&state, &id, input, PostStatus::Draft, "Failed to update draft").await
}

async fn publish_create(
    State(state): State<ServiceState>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let Json(input) = payload?;
    create(&state, input, PostStatus::Published, "Failed to publish blog").await
}

async fn publish_update(
    State(state): State<ServiceState>,
    Path(id): Path<PostId>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    let Json(input) = payload?;
    update(&state, &id, input, PostStatus::Published, "Failed to publish blog").await
}

async fn create(
    state: &ServiceState,
    input: PostInput,
    status: PostStatus,
    error_message: &'static str,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state
        .service
        .create_post(input, status)
        .await
        .map_err(|err| ApiError::server(error_message, err))?;

    tracing::info!(id = %post.id, %status, "created post");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update(
    state: &ServiceState,
    id: &PostId,
    input: PostInput,
    status: PostStatus,
    error_message: &'static str,
) -> ApiResult<Json<Post>> {
    let post = state
        .service
        .update_post(id, input, status)
        .await
        .map_err(|err| ApiError::server(error_message, err))?;

    post.map(Json).ok_or(ApiError::NotFound)
}
