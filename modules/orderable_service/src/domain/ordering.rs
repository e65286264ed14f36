//! Pure position computations
//!
//! Each function takes a partition snapshot and returns the compare-and-set
//! writes that keep the partition dense. Nothing here performs I/O.

use crate::contract::{
    Direction, EntityId, MoveRequest, Orderable, OrderingError, Position, PositionChange,
};

/// Swap the item at `request.position` with the one above it
pub fn compute_up_swap<T: Orderable>(
    snapshot: &[T],
    request: MoveRequest,
) -> Result<Vec<PositionChange>, OrderingError> {
    compute_swap(snapshot, request, Direction::Up)
}

/// Swap the item at `request.position` with the one below it
pub fn compute_down_swap<T: Orderable>(
    snapshot: &[T],
    request: MoveRequest,
) -> Result<Vec<PositionChange>, OrderingError> {
    compute_swap(snapshot, request, Direction::Down)
}

/// Shared adjacent-swap computation.
///
/// Entities outside `request.partition` are ignored. The sole item of a
/// partition is both top and bottom, so either direction is `InvalidMove`.
pub fn compute_swap<T: Orderable>(
    snapshot: &[T],
    request: MoveRequest,
    direction: Direction,
) -> Result<Vec<PositionChange>, OrderingError> {
    let at = |position: Position| {
        snapshot
            .iter()
            .find(|e| e.partition_key() == request.partition && e.position() == position)
    };

    let source = at(request.position).ok_or(OrderingError::NotFound {
        partition: request.partition,
        position: request.position,
    })?;

    let invalid = || OrderingError::InvalidMove {
        partition: request.partition,
        position: request.position,
        direction,
    };

    let target = match direction {
        Direction::Up => request.position.checked_sub(1).ok_or_else(invalid)?,
        Direction::Down => request.position.checked_add(1).ok_or_else(invalid)?,
    };
    let neighbor = at(target).ok_or_else(invalid)?;

    Ok(vec![
        PositionChange::new(source.id(), request.position, target),
        PositionChange::new(neighbor.id(), target, request.position),
    ])
}

/// Shift every entity after `removed` down by one
pub fn compute_removal_repair<T: Orderable>(
    snapshot: &[T],
    removed: EntityId,
) -> Result<Vec<PositionChange>, OrderingError> {
    let victim = snapshot
        .iter()
        .find(|e| e.id() == removed)
        .ok_or(OrderingError::EntityNotFound { id: removed })?;
    let partition = victim.partition_key();
    let gap = victim.position();

    let mut changes: Vec<PositionChange> = snapshot
        .iter()
        .filter(|e| e.partition_key() == partition && e.position() > gap)
        .map(|e| PositionChange::new(e.id(), e.position(), e.position() - 1))
        .collect();
    changes.sort_by_key(|c| c.from);
    Ok(changes)
}

/// Renumber a snapshot to `0..n` in `(position, id)` order.
///
/// Only entities whose position actually changes are returned.
pub fn compute_repack<T: Orderable>(snapshot: &[T]) -> Vec<PositionChange> {
    let mut ordered: Vec<&T> = snapshot.iter().collect();
    ordered.sort_by_key(|e| (e.position(), e.id()));

    ordered
        .into_iter()
        .zip(0..)
        .filter(|(e, slot)| e.position() != *slot)
        .map(|(e, slot)| PositionChange::new(e.id(), e.position(), slot))
        .collect()
}
