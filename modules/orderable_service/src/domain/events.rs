//! Domain events for the orderable service
//!
//! One event is published after every successful write so that caches of
//! rendered menus can be invalidated. Publishing never fails the write.

use crate::contract::{Direction, EntityId, PartitionKey, Position, PositionChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PositionEvent {
    /// An entity was appended at the end of its partition
    Appended(AppendedEvent),
    /// Two neighbours swapped positions
    Moved(MovedEvent),
    /// An entity was deleted and the partition re-packed
    Removed(RemovedEvent),
    /// A non-dense partition was renumbered
    Repacked(RepackedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendedEvent {
    pub partition: PartitionKey,
    pub id: EntityId,
    pub position: Position,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedEvent {
    pub partition: PartitionKey,
    /// Position the move started from
    pub from: Position,
    pub direction: MoveDirection,
    /// Entities whose position changed
    pub changed: Vec<EntityId>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEvent {
    pub partition: PartitionKey,
    pub id: EntityId,
    pub position: Position,
    /// Entities shifted down to close the gap
    pub shifted: Vec<EntityId>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepackedEvent {
    pub partition: PartitionKey,
    pub changed: Vec<EntityId>,
    pub timestamp: DateTime<Utc>,
}

/// Serializable mirror of [`Direction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

fn changed_ids(changes: &[PositionChange]) -> Vec<EntityId> {
    changes.iter().map(|c| c.id).collect()
}

impl PositionEvent {
    pub fn appended(partition: PartitionKey, id: EntityId, position: Position) -> Self {
        Self::Appended(AppendedEvent {
            partition,
            id,
            position,
            timestamp: Utc::now(),
        })
    }

    pub fn moved(
        partition: PartitionKey,
        from: Position,
        direction: Direction,
        changes: &[PositionChange],
    ) -> Self {
        Self::Moved(MovedEvent {
            partition,
            from,
            direction: direction.into(),
            changed: changed_ids(changes),
            timestamp: Utc::now(),
        })
    }

    pub fn removed(
        partition: PartitionKey,
        id: EntityId,
        position: Position,
        repair: &[PositionChange],
    ) -> Self {
        Self::Removed(RemovedEvent {
            partition,
            id,
            position,
            shifted: changed_ids(repair),
            timestamp: Utc::now(),
        })
    }

    pub fn repacked(partition: PartitionKey, changes: &[PositionChange]) -> Self {
        Self::Repacked(RepackedEvent {
            partition,
            changed: changed_ids(changes),
            timestamp: Utc::now(),
        })
    }

    /// Partition the event belongs to
    pub fn partition(&self) -> PartitionKey {
        match self {
            Self::Appended(e) => e.partition,
            Self::Moved(e) => e.partition,
            Self::Removed(e) => e.partition,
            Self::Repacked(e) => e.partition,
        }
    }
}

/// Event publisher trait for position events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PositionEvent) -> anyhow::Result<()>;
}

/// Publisher that drops every event
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: PositionEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
