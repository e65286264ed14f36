//! Domain layer - business logic and services

pub mod catalog;
pub mod events;
pub mod move_builder;
pub mod ordering;
pub mod repository;
pub mod service;
pub mod validation;

pub use catalog::ContentCatalog;
pub use events::{EventPublisher, NoOpEventPublisher, PositionEvent};
pub use move_builder::{ConstrainedMove, MoveBuilder, PartitionScope};
pub use repository::{ContentRepository, PositionStore, StoreError, StoreResult};
pub use service::{ContentService, OrderableService};
