//! Contract error types for the orderable service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::{Direction, EntityId, PartitionKey, Position};
use thiserror::Error;

/// Orderable service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// No entity occupies the source position within the partition
    #[error("no item at position {position} in partition {partition}")]
    NotFound {
        partition: PartitionKey,
        position: Position,
    },

    /// No entity with the given id
    #[error("item not found: {id}")]
    EntityNotFound { id: EntityId },

    /// No content is published under the url name
    #[error("no content with url name '{url_name}'")]
    UrlNameNotFound { url_name: String },

    /// There is no active content to land on
    #[error("no active content")]
    NoContent,

    /// The move would leave the partition's position bounds
    #[error("cannot move item at position {position} {direction} in partition {partition}")]
    InvalidMove {
        partition: PartitionKey,
        position: Position,
        direction: Direction,
    },

    /// The store detected a conflicting concurrent write
    #[error("Conflict: {reason}")]
    ConcurrencyConflict { reason: String },

    /// The underlying persistence call failed
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// The partition read from the store is not dense
    #[error("partition {partition} is inconsistent: {details}")]
    Inconsistent {
        partition: PartitionKey,
        details: String,
    },

    /// Input rejected before touching the store
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl OrderingError {
    /// True when a move hit the top or bottom of its partition.
    ///
    /// Callers rendering a list usually treat this as a no-op.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::InvalidMove { .. })
    }

    /// True for failures caused by concurrent writers; the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}
