//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage.

use crate::contract::{
    Content, ContentDetails, EntityId, Orderable, OrderingError, PartitionKey, PositionChange,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failures a position store reports to the engine
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent writer changed the partition, or the write would
    /// duplicate a `(partition, position)` pair
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// Infrastructure failure unrelated to ordering
    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for OrderingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(reason) => OrderingError::ConcurrencyConflict { reason },
            StoreError::Unavailable(source) => OrderingError::StoreUnavailable {
                reason: format!("{source:#}"),
            },
        }
    }
}

/// Read/write access to orderable entities.
///
/// Every write method is atomic with respect to readers of the same
/// partition: either all of its changes become visible or none do.
#[async_trait]
pub trait PositionStore<T: Orderable>: Send + Sync {
    /// Entities of `partition` ordered by position, reflecting the latest
    /// committed state
    async fn entities_in(&self, partition: PartitionKey) -> StoreResult<Vec<T>>;

    /// Find an entity by id
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>>;

    /// Insert a new entity and return it with its assigned id.
    ///
    /// Must fail with `Conflict` if the `(partition, position)` pair is taken
    /// or the position is not the partition's next free slot.
    async fn insert(&self, entity: &T) -> StoreResult<T>;

    /// Apply compare-and-set position changes as one unit.
    ///
    /// Fails with `Conflict`, leaving the partition untouched, if any row no
    /// longer holds its `from` position.
    async fn apply_position_changes(
        &self,
        partition: PartitionKey,
        changes: &[PositionChange],
    ) -> StoreResult<()>;

    /// Delete `id` and apply `repair` as one unit.
    ///
    /// Fails with `Conflict`, changing nothing, if the partition would not be
    /// dense afterwards (a concurrent append or removal slipped in).
    async fn remove(
        &self,
        partition: PartitionKey,
        id: EntityId,
        repair: &[PositionChange],
    ) -> StoreResult<()>;
}

/// Content lookups and edits on top of the position store.
///
/// Nothing here writes `position` or `menu_id`.
#[async_trait]
pub trait ContentRepository: PositionStore<Content> {
    /// Content published under `url_name`; the lowest id wins if several share it
    async fn find_by_url_name(&self, url_name: &str) -> StoreResult<Option<Content>>;

    /// The first active content in `(position, menu_id, id)` order
    async fn first_in_order(&self) -> StoreResult<Option<Content>>;

    /// Overwrite the editable fields of `id` and bump `updated_at`.
    ///
    /// Returns `None` when the content no longer exists.
    async fn update_details(
        &self,
        id: EntityId,
        details: &ContentDetails,
    ) -> StoreResult<Option<Content>>;
}
