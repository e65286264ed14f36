//! Content lookups and edits that leave the display order alone

use super::repository::ContentRepository;
use super::validation;
use crate::config::Config;
use crate::contract::{Content, ContentUpdate, EntityId, OrderingError};
use std::sync::Arc;

/// Reads content the way the storefront addresses it and applies editor
/// changes. Moves, appends and removals stay with the orderable service.
pub struct ContentCatalog {
    store: Arc<dyn ContentRepository>,
    config: Config,
}

impl ContentCatalog {
    pub fn new(store: Arc<dyn ContentRepository>, config: Config) -> Self {
        Self { store, config }
    }

    /// Content published under `url_name`
    pub async fn by_url_name(&self, url_name: &str) -> Result<Content, OrderingError> {
        self.store
            .find_by_url_name(url_name)
            .await?
            .ok_or_else(|| OrderingError::UrlNameNotFound {
                url_name: url_name.to_string(),
            })
    }

    /// Page shown when no url name is requested
    pub async fn landing(&self) -> Result<Content, OrderingError> {
        self.store
            .first_in_order()
            .await?
            .ok_or(OrderingError::NoContent)
    }

    /// Apply `update` to the editable fields of `id`.
    ///
    /// An empty update returns the stored record without writing.
    pub async fn update(
        &self,
        id: EntityId,
        update: ContentUpdate,
    ) -> Result<Content, OrderingError> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(OrderingError::EntityNotFound { id })?;
        if update.is_empty() {
            return Ok(current);
        }

        let details = current.details().merged(update);
        validation::validate_details(&details, &self.config)?;

        let updated = self
            .store
            .update_details(id, &details)
            .await?
            .ok_or(OrderingError::EntityNotFound { id })?;

        tracing::info!(
            id = id,
            menu_id = updated.menu_id,
            position = updated.position,
            "Updated content"
        );
        Ok(updated)
    }
}
