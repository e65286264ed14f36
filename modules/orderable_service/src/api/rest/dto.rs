//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentDto {
    pub id: i64,

    /// Owning menu
    pub menu_id: i64,

    /// Zero-based display position within the menu
    pub position: u32,

    #[schema(example = "About us")]
    pub name: String,

    #[schema(example = "about-us")]
    pub url_name: String,

    pub text: String,

    pub is_active: bool,

    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Create content request; the position is always assigned by the service
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateContentRequest {
    #[schema(example = "About us")]
    pub name: String,

    #[schema(example = "about-us")]
    pub url_name: String,

    #[serde(default)]
    pub text: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial edit of a content; omitted fields keep their value.
///
/// Position and menu cannot be set here; use the move endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url_name: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Contents of one menu in display order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentListResponse {
    pub menu_id: i64,

    pub items: Vec<ContentDto>,

    /// Total count
    pub total: usize,
}

/// Position the next appended content would receive
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextPositionResponse {
    pub menu_id: i64,
    pub position: u32,
}

// Note: Conversion implementations live in mapper.rs
