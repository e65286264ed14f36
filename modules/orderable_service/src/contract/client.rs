//! Native client trait for inter-module communication
//!
//! This trait defines the API that controllers and other modules use to
//! order CMS content. NO HTTP - direct function calls.

use super::{
    error::OrderingError,
    model::{Content, ContentUpdate, Direction, EntityId, PartitionKey, Position},
};
use async_trait::async_trait;

/// Content ordering API for inter-module communication
#[async_trait]
pub trait ContentOrderingApi: Send + Sync {
    /// Contents of a menu in display order
    async fn list_contents(&self, menu_id: PartitionKey) -> Result<Vec<Content>, OrderingError>;

    /// Get a single content record
    async fn get_content(&self, id: EntityId) -> Result<Content, OrderingError>;

    /// Content published under `url_name`
    async fn find_by_url_name(&self, url_name: &str) -> Result<Content, OrderingError>;

    /// First active content in display order, shown when no page is named
    async fn landing_content(&self) -> Result<Content, OrderingError>;

    /// Change the editable fields of a content record; its position and menu
    /// stay as they are
    async fn update_content(
        &self,
        id: EntityId,
        update: ContentUpdate,
    ) -> Result<Content, OrderingError>;

    /// Position a new content record of `menu_id` would receive
    async fn next_position(&self, menu_id: PartitionKey) -> Result<Position, OrderingError>;

    /// Validate a draft and append it at the end of its menu
    async fn add_content(&self, draft: Content) -> Result<Content, OrderingError>;

    /// Delete a content record and close the gap it leaves
    async fn delete_content(&self, id: EntityId) -> Result<Vec<Content>, OrderingError>;

    /// Move a content record one step within its menu
    async fn move_content(
        &self,
        id: EntityId,
        direction: Direction,
    ) -> Result<Vec<Content>, OrderingError>;

    /// Move whatever content occupies `position` one step within `menu_id`
    async fn move_at_position(
        &self,
        menu_id: PartitionKey,
        position: Position,
        direction: Direction,
    ) -> Result<Vec<Content>, OrderingError>;

    /// Renumber a menu whose positions have gaps or duplicates
    async fn repack_menu(&self, menu_id: PartitionKey) -> Result<Vec<Content>, OrderingError>;
}
