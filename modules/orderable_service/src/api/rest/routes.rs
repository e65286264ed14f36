//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::contract::{ContentOrderingApi, Direction};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

type Api = Arc<dyn ContentOrderingApi>;

/// Register all REST routes
pub fn register_routes(router: Router, api: Api) -> anyhow::Result<Router> {
    let router = router
        // Menu endpoints
        .route(
            "/menus/{menu_id}/contents",
            get(list_contents_handler).post(create_content_handler),
        )
        .route(
            "/menus/{menu_id}/contents/next-position",
            get(next_position_handler),
        )
        .route("/menus/{menu_id}/repack", post(repack_menu_handler))
        .route(
            "/menus/{menu_id}/positions/{position}/move-up",
            post(move_at_position_up_handler),
        )
        .route(
            "/menus/{menu_id}/positions/{position}/move-down",
            post(move_at_position_down_handler),
        )
        // Content endpoints
        .route("/contents/landing", get(get_landing_content_handler))
        .route(
            "/contents/by-url/{url_name}",
            get(get_content_by_url_handler),
        )
        .route(
            "/contents/{id}",
            get(get_content_handler)
                .patch(update_content_handler)
                .delete(delete_content_handler),
        )
        .route("/contents/{id}/move-up", post(move_up_handler))
        .route("/contents/{id}/move-down", post(move_down_handler))
        // Add client as extension for handlers
        .layer(Extension(api));

    Ok(router)
}

// ===== Handler wrappers that extract the client from Extension =====

async fn list_contents_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::list_contents(api, path).await
}

async fn create_content_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
    json: Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentDto>), Problem> {
    handlers::create_content(api, path, json).await
}

async fn next_position_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<NextPositionResponse>, Problem> {
    handlers::next_position(api, path).await
}

async fn repack_menu_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::repack_menu(api, path).await
}

async fn move_at_position_up_handler(
    Extension(api): Extension<Api>,
    path: Path<(i64, u32)>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::move_at_position(api, path, Direction::Up).await
}

async fn move_at_position_down_handler(
    Extension(api): Extension<Api>,
    path: Path<(i64, u32)>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::move_at_position(api, path, Direction::Down).await
}

async fn get_content_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<ContentDto>, Problem> {
    handlers::get_content(api, path).await
}

async fn get_content_by_url_handler(
    Extension(api): Extension<Api>,
    path: Path<String>,
) -> Result<Json<ContentDto>, Problem> {
    handlers::get_content_by_url(api, path).await
}

async fn get_landing_content_handler(
    Extension(api): Extension<Api>,
) -> Result<Json<ContentDto>, Problem> {
    handlers::get_landing_content(api).await
}

async fn update_content_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
    json: Json<UpdateContentRequest>,
) -> Result<Json<ContentDto>, Problem> {
    handlers::update_content(api, path, json).await
}

async fn delete_content_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<StatusCode, Problem> {
    handlers::delete_content(api, path).await
}

async fn move_up_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::move_content(api, path, Direction::Up).await
}

async fn move_down_handler(
    Extension(api): Extension<Api>,
    path: Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    handlers::move_content(api, path, Direction::Down).await
}
