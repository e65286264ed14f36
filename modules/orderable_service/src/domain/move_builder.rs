//! Staged single-step moves
//!
//! A move binds a source position and a partition, in either order, and
//! performs no I/O until `up_one` or `down_one` runs. Each stage is consumed
//! by the next, so a staged move executes at most once.

use super::service::OrderableService;
use crate::contract::{Direction, MoveRequest, Orderable, OrderingError, PartitionKey, Position};

/// A move bound to a source position, waiting for its partition
#[must_use = "a move does nothing until it is constrained and executed"]
pub struct MoveBuilder<'a, T: Orderable> {
    service: &'a OrderableService<T>,
    position: Position,
}

impl<'a, T: Orderable> MoveBuilder<'a, T> {
    pub(crate) fn new(service: &'a OrderableService<T>, position: Position) -> Self {
        Self { service, position }
    }

    /// Restrict the move to entities of `partition`
    pub fn constrained_by(self, partition: PartitionKey) -> ConstrainedMove<'a, T> {
        ConstrainedMove {
            service: self.service,
            request: MoveRequest::new(partition, self.position),
        }
    }
}

/// A move bound to a partition, waiting for its source position
#[must_use = "a move does nothing until it is given a position and executed"]
pub struct PartitionScope<'a, T: Orderable> {
    service: &'a OrderableService<T>,
    partition: PartitionKey,
}

impl<'a, T: Orderable> PartitionScope<'a, T> {
    pub(crate) fn new(service: &'a OrderableService<T>, partition: PartitionKey) -> Self {
        Self { service, partition }
    }

    /// Move whatever entity occupies `position` when the move runs
    pub fn item_at(self, position: Position) -> ConstrainedMove<'a, T> {
        ConstrainedMove {
            service: self.service,
            request: MoveRequest::new(self.partition, position),
        }
    }
}

/// A fully specified move
#[must_use = "call up_one() or down_one() to execute the move"]
pub struct ConstrainedMove<'a, T: Orderable> {
    service: &'a OrderableService<T>,
    request: MoveRequest,
}

impl<'a, T: Orderable> ConstrainedMove<'a, T> {
    pub fn request(&self) -> MoveRequest {
        self.request
    }

    /// Swap with the entity one position above; returns the refreshed partition
    pub async fn up_one(self) -> Result<Vec<T>, OrderingError> {
        self.service.execute_move(self.request, Direction::Up).await
    }

    /// Swap with the entity one position below; returns the refreshed partition
    pub async fn down_one(self) -> Result<Vec<T>, OrderingError> {
        self.service.execute_move(self.request, Direction::Down).await
    }
}
