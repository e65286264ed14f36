//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Content, ContentOrderingApi, ContentUpdate, Direction, EntityId, OrderingError, PartitionKey,
    Position,
};
use crate::domain::{validation, ContentCatalog, ContentService};
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// This client is what controllers call: it validates drafts and resolves
/// moves by id the way the CMS admin screens issue them.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<ContentService>,
    catalog: Arc<ContentCatalog>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<ContentService>, catalog: Arc<ContentCatalog>) -> Self {
        Self { service, catalog }
    }
}

#[async_trait]
impl ContentOrderingApi for NativeClient {
    async fn list_contents(&self, menu_id: PartitionKey) -> Result<Vec<Content>, OrderingError> {
        self.service.ordered(menu_id).await
    }

    async fn get_content(&self, id: EntityId) -> Result<Content, OrderingError> {
        self.service.get(id).await
    }

    async fn find_by_url_name(&self, url_name: &str) -> Result<Content, OrderingError> {
        self.catalog.by_url_name(url_name).await
    }

    async fn landing_content(&self) -> Result<Content, OrderingError> {
        self.catalog.landing().await
    }

    async fn update_content(
        &self,
        id: EntityId,
        update: ContentUpdate,
    ) -> Result<Content, OrderingError> {
        self.catalog.update(id, update).await
    }

    async fn next_position(&self, menu_id: PartitionKey) -> Result<Position, OrderingError> {
        self.service.next_position(menu_id).await
    }

    async fn add_content(&self, draft: Content) -> Result<Content, OrderingError> {
        validation::validate_content(&draft, self.service.config())?;
        self.service.append(draft).await
    }

    async fn delete_content(&self, id: EntityId) -> Result<Vec<Content>, OrderingError> {
        self.service.remove(id).await
    }

    async fn move_content(
        &self,
        id: EntityId,
        direction: Direction,
    ) -> Result<Vec<Content>, OrderingError> {
        self.service.move_entity(id, direction).await
    }

    async fn move_at_position(
        &self,
        menu_id: PartitionKey,
        position: Position,
        direction: Direction,
    ) -> Result<Vec<Content>, OrderingError> {
        let staged = self.service.begin_move(position).constrained_by(menu_id);
        match direction {
            Direction::Up => staged.up_one().await,
            Direction::Down => staged.down_one().await,
        }
    }

    async fn repack_menu(&self, menu_id: PartitionKey) -> Result<Vec<Content>, OrderingError> {
        self.service.repack(menu_id).await
    }
}
