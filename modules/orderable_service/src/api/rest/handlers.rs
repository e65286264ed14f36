//! HTTP request handlers - thin layer that delegates to the native client

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{ContentOrderingApi, Direction};
use axum::{extract::Path, http::StatusCode, Json};
use std::sync::Arc;

type Api = Arc<dyn ContentOrderingApi>;

// ===== Menu Handlers =====

/// List the contents of a menu in display order
pub async fn list_contents(
    api: Api,
    Path(menu_id): Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    let contents = api.list_contents(menu_id).await.map_err(map_domain_error)?;
    Ok(Json(ContentListResponse::new(menu_id, contents)))
}

/// Position a new content of the menu would receive
pub async fn next_position(
    api: Api,
    Path(menu_id): Path<i64>,
) -> Result<Json<NextPositionResponse>, Problem> {
    let position = api.next_position(menu_id).await.map_err(map_domain_error)?;
    Ok(Json(NextPositionResponse { menu_id, position }))
}

/// Append a new content at the end of the menu
pub async fn create_content(
    api: Api,
    Path(menu_id): Path<i64>,
    Json(req): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentDto>), Problem> {
    let content = api
        .add_content(req.into_draft(menu_id))
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(content.into())))
}

/// Renumber a menu with gaps or duplicate positions
pub async fn repack_menu(
    api: Api,
    Path(menu_id): Path<i64>,
) -> Result<Json<ContentListResponse>, Problem> {
    let contents = api.repack_menu(menu_id).await.map_err(map_domain_error)?;
    Ok(Json(ContentListResponse::new(menu_id, contents)))
}

/// Move whatever content sits at `position` one step
pub async fn move_at_position(
    api: Api,
    Path((menu_id, position)): Path<(i64, u32)>,
    direction: Direction,
) -> Result<Json<ContentListResponse>, Problem> {
    let contents = api
        .move_at_position(menu_id, position, direction)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(ContentListResponse::new(menu_id, contents)))
}

// ===== Content Handlers =====

/// Get a single content
pub async fn get_content(api: Api, Path(id): Path<i64>) -> Result<Json<ContentDto>, Problem> {
    let content = api.get_content(id).await.map_err(map_domain_error)?;
    Ok(Json(content.into()))
}

/// Get the content published under a url name
pub async fn get_content_by_url(
    api: Api,
    Path(url_name): Path<String>,
) -> Result<Json<ContentDto>, Problem> {
    let content = api
        .find_by_url_name(&url_name)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(content.into()))
}

/// Get the content shown when no page is named
pub async fn get_landing_content(api: Api) -> Result<Json<ContentDto>, Problem> {
    let content = api.landing_content().await.map_err(map_domain_error)?;
    Ok(Json(content.into()))
}

/// Edit a content without moving it
pub async fn update_content(
    api: Api,
    Path(id): Path<i64>,
    Json(req): Json<UpdateContentRequest>,
) -> Result<Json<ContentDto>, Problem> {
    let content = api
        .update_content(id, req.into())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(content.into()))
}

/// Delete a content and close the gap in its menu
pub async fn delete_content(api: Api, Path(id): Path<i64>) -> Result<StatusCode, Problem> {
    api.delete_content(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a content one step within its menu
pub async fn move_content(
    api: Api,
    Path(id): Path<i64>,
    direction: Direction,
) -> Result<Json<ContentListResponse>, Problem> {
    let contents = api
        .move_content(id, direction)
        .await
        .map_err(map_domain_error)?;

    let menu_id = contents.first().map(|c| c.menu_id).unwrap_or_default();
    Ok(Json(ContentListResponse::new(menu_id, contents)))
}
