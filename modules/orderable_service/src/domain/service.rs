//! Domain service - position bookkeeping for orderable entities

use super::events::{EventPublisher, PositionEvent};
use super::move_builder::{MoveBuilder, PartitionScope};
use super::ordering;
use super::repository::PositionStore;
use super::validation;
use crate::config::Config;
use crate::contract::{
    Content, Direction, EntityId, MoveRequest, Orderable, OrderingError, PartitionKey, Position,
};
use std::sync::Arc;

/// Keeps every partition of `T` dense and moves items one step at a time.
///
/// The service holds no lock and no state between calls. It reads a
/// partition snapshot, computes compare-and-set writes, and hands them to the
/// store in a single call; serialization per partition is the store's job.
pub struct OrderableService<T: Orderable> {
    store: Arc<dyn PositionStore<T>>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

/// The service as wired for CMS content
pub type ContentService = OrderableService<Content>;

impl<T: Orderable> OrderableService<T> {
    /// Create a new service instance
    pub fn new(
        store: Arc<dyn PositionStore<T>>,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            store,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Reads =====

    /// Position a newly appended entity of `partition` should receive.
    ///
    /// Does not reserve the slot; `append` relies on the store rejecting a
    /// duplicate `(partition, position)` pair.
    pub async fn next_position(&self, partition: PartitionKey) -> Result<Position, OrderingError> {
        let count = self.store.entities_in(partition).await?.len();
        to_position(partition, count)
    }

    /// Entities of `partition` in display order
    pub async fn ordered(&self, partition: PartitionKey) -> Result<Vec<T>, OrderingError> {
        Ok(self.store.entities_in(partition).await?)
    }

    /// Get an entity by id
    pub async fn get(&self, id: EntityId) -> Result<T, OrderingError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(OrderingError::EntityNotFound { id })
    }

    // ===== Moves =====

    /// Start a move of whatever entity occupies `position` when the move runs
    pub fn begin_move(&self, position: Position) -> MoveBuilder<'_, T> {
        MoveBuilder::new(self, position)
    }

    /// Start a move inside `partition`, naming the position afterwards
    pub fn within(&self, partition: PartitionKey) -> PartitionScope<'_, T> {
        PartitionScope::new(self, partition)
    }

    /// Move the entity `id` one step within its own partition
    pub async fn move_entity(
        &self,
        id: EntityId,
        direction: Direction,
    ) -> Result<Vec<T>, OrderingError> {
        let entity = self.get(id).await?;
        let request = MoveRequest::new(entity.partition_key(), entity.position());
        self.execute_move(request, direction).await
    }

    /// Read the partition, compute the adjacent swap, write it back, and
    /// return the refreshed partition
    pub(crate) async fn execute_move(
        &self,
        request: MoveRequest,
        direction: Direction,
    ) -> Result<Vec<T>, OrderingError> {
        let snapshot = self.store.entities_in(request.partition).await?;
        if self.config.verify_density {
            validation::ensure_dense(request.partition, &snapshot)?;
        }

        let changes = match direction {
            Direction::Up => ordering::compute_up_swap(&snapshot, request),
            Direction::Down => ordering::compute_down_swap(&snapshot, request),
        }
        .inspect_err(|e| {
            tracing::warn!(
                partition = request.partition,
                position = request.position,
                %direction,
                "Move rejected: {}",
                e
            );
        })?;
        tracing::debug!(partition = request.partition, ?changes, "Computed swap");

        self.store
            .apply_position_changes(request.partition, &changes)
            .await
            .inspect_err(|e| tracing::warn!(partition = request.partition, "Swap not applied: {}", e))?;

        tracing::info!(
            partition = request.partition,
            position = request.position,
            %direction,
            "Moved item"
        );
        self.publish(PositionEvent::moved(
            request.partition,
            request.position,
            direction,
            &changes,
        ))
        .await;

        self.ordered(request.partition).await
    }

    // ===== Lifecycle =====

    /// Append `entity` at the end of its partition and persist it
    pub async fn append(&self, mut entity: T) -> Result<T, OrderingError> {
        let partition = entity.partition_key();
        let count = self.store.entities_in(partition).await?.len();
        validation::ensure_capacity(partition, count, &self.config)?;

        entity.set_position(to_position(partition, count)?);
        let created = self
            .store
            .insert(&entity)
            .await
            .inspect_err(|e| tracing::warn!(partition = partition, "Append rejected: {}", e))?;

        tracing::info!(
            partition = partition,
            id = created.id(),
            position = created.position(),
            "Appended item"
        );
        self.publish(PositionEvent::appended(
            partition,
            created.id(),
            created.position(),
        ))
        .await;

        Ok(created)
    }

    /// Delete `id` and shift every later entity of its partition down by one.
    ///
    /// Returns the remaining partition in display order.
    pub async fn remove(&self, id: EntityId) -> Result<Vec<T>, OrderingError> {
        let entity = self.get(id).await?;
        let partition = entity.partition_key();

        let snapshot = self.store.entities_in(partition).await?;
        if self.config.verify_density {
            validation::ensure_dense(partition, &snapshot)?;
        }
        let repair = ordering::compute_removal_repair(&snapshot, id)?;
        self.store.remove(partition, id, &repair).await?;

        tracing::info!(
            partition = partition,
            id = id,
            shifted = repair.len(),
            "Removed item"
        );
        self.publish(PositionEvent::removed(
            partition,
            id,
            entity.position(),
            &repair,
        ))
        .await;

        self.ordered(partition).await
    }

    /// Renumber `partition` to `0..n` if it has gaps or duplicates
    pub async fn repack(&self, partition: PartitionKey) -> Result<Vec<T>, OrderingError> {
        let snapshot = self.store.entities_in(partition).await?;
        let changes = ordering::compute_repack(&snapshot);
        if changes.is_empty() {
            return Ok(snapshot);
        }

        self.store.apply_position_changes(partition, &changes).await?;

        tracing::info!(partition = partition, changed = changes.len(), "Repacked partition");
        self.publish(PositionEvent::repacked(partition, &changes)).await;

        self.ordered(partition).await
    }

    // ===== Helper Methods =====

    async fn publish(&self, event: PositionEvent) {
        let partition = event.partition();
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(partition = partition, "Failed to publish position event: {:#}", e);
        }
    }
}

fn to_position(partition: PartitionKey, count: usize) -> Result<Position, OrderingError> {
    Position::try_from(count).map_err(|_| OrderingError::Inconsistent {
        partition,
        details: format!("{} items exceed the position range", count),
    })
}
