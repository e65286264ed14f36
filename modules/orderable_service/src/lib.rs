//! Orderable Service Module
//!
//! Keeps CMS content in a stable, dense, user-controllable display order per
//! menu and moves items one step up or down within their menu.

// Public exports
pub mod contract;
pub use contract::{
    Content, ContentDetails, ContentOrderingApi, ContentUpdate, Direction, EntityId, MoveRequest,
    Orderable, OrderingError, PartitionKey, Position, PositionChange,
};

pub mod module;
pub use module::OrderableServiceModule;

pub mod config;
pub use config::Config;

pub mod domain;
pub mod infra;

// Transport adapters (hidden from public API docs)
#[doc(hidden)]
pub mod api;
