//! Partition invariants and content draft validation

use crate::config::Config;
use crate::contract::{Content, ContentDetails, Orderable, OrderingError, PartitionKey, Position};
use std::collections::BTreeMap;

/// A way in which a partition fails to be dense
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DensityViolation {
    /// Several entities share one position
    Duplicate { position: Position, count: usize },
    /// No entity holds a position below the partition size
    Gap { position: Position },
    /// An entity holds a position at or past the partition size
    OutOfRange { position: Position },
}

impl std::fmt::Display for DensityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { position, count } => {
                write!(f, "{} items share position {}", count, position)
            }
            Self::Gap { position } => write!(f, "position {} is empty", position),
            Self::OutOfRange { position } => write!(f, "position {} is out of range", position),
        }
    }
}

/// Every violation of `positions == {0, .., n-1}` in a single-partition snapshot
pub fn density_violations<T: Orderable>(snapshot: &[T]) -> Vec<DensityViolation> {
    let mut counts: BTreeMap<Position, usize> = BTreeMap::new();
    for entity in snapshot {
        *counts.entry(entity.position()).or_default() += 1;
    }

    let len = snapshot.len();
    let mut violations = Vec::new();
    for (&position, &count) in &counts {
        if count > 1 {
            violations.push(DensityViolation::Duplicate { position, count });
        }
        if position as usize >= len {
            violations.push(DensityViolation::OutOfRange { position });
        }
    }
    for position in (0..len).filter_map(|p| Position::try_from(p).ok()) {
        if !counts.contains_key(&position) {
            violations.push(DensityViolation::Gap { position });
        }
    }
    violations
}

pub fn is_dense<T: Orderable>(snapshot: &[T]) -> bool {
    density_violations(snapshot).is_empty()
}

/// Fail with `Inconsistent` unless the snapshot of `partition` is dense
pub fn ensure_dense<T: Orderable>(
    partition: PartitionKey,
    snapshot: &[T],
) -> Result<(), OrderingError> {
    let violations = density_violations(snapshot);
    if violations.is_empty() {
        return Ok(());
    }

    let details = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(OrderingError::Inconsistent { partition, details })
}

/// Fail with `Validation` when a partition cannot take another entity
pub fn ensure_capacity(
    partition: PartitionKey,
    current: usize,
    config: &Config,
) -> Result<(), OrderingError> {
    if current >= config.max_partition_size {
        return Err(OrderingError::Validation {
            message: format!(
                "partition {} is full ({} items)",
                partition, config.max_partition_size
            ),
        });
    }
    Ok(())
}

/// Validate a content draft before it is appended
pub fn validate_content(content: &Content, config: &Config) -> Result<(), OrderingError> {
    validate_details(&content.details(), config)
}

/// Validate the editable fields of a content record
pub fn validate_details(details: &ContentDetails, config: &Config) -> Result<(), OrderingError> {
    let name = details.name.trim();
    if name.is_empty() {
        return Err(OrderingError::Validation {
            message: "name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > config.max_name_length {
        return Err(OrderingError::Validation {
            message: format!(
                "name must be at most {} characters",
                config.max_name_length
            ),
        });
    }
    validate_url_name(&details.url_name)
}

/// Accepts slugs like `about-us` or `terms_2024`: alphanumeric start,
/// then alphanumerics, `-` and `_`
pub fn validate_url_name(url_name: &str) -> Result<(), OrderingError> {
    let Some(first) = url_name.chars().next() else {
        return Err(OrderingError::Validation {
            message: "url_name cannot be empty".to_string(),
        });
    };

    if !first.is_alphanumeric() {
        return Err(OrderingError::Validation {
            message: format!(
                "url_name '{}' must start with alphanumeric character",
                url_name
            ),
        });
    }

    if !url_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(OrderingError::Validation {
            message: format!(
                "url_name '{}' contains invalid characters. Only alphanumeric, '-' and '_' are allowed",
                url_name
            ),
        });
    }

    Ok(())
}
