//! Contract models for the orderable service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};

/// Identifier assigned by the persistence layer
pub type EntityId = i64;

/// Grouping key; positions are only compared inside one partition
pub type PartitionKey = i64;

/// Zero-based dense rank within a partition
pub type Position = u32;

/// A record that keeps a stable display order inside its partition.
///
/// Positions of a partition always form `0..n` with no gaps or duplicates.
/// `set_position` is reserved for the orderable service and `assign_id` for
/// position stores; no other code path should call them.
pub trait Orderable: Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;
    fn partition_key(&self) -> PartitionKey;
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
    fn assign_id(&mut self, id: EntityId);
}

/// Text content shown under a menu of the storefront CMS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// Store-assigned identifier (0 until persisted)
    pub id: EntityId,
    /// Owning menu; the partition key
    pub menu_id: PartitionKey,
    /// Display position within the menu
    pub position: Position,
    /// Title shown in menus
    pub name: String,
    /// URL slug
    pub url_name: String,
    /// Body text
    pub text: String,
    /// Whether the content is visible on the storefront
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Build an unsaved, active content record for `menu_id`.
    ///
    /// The position is assigned on append and the id by the store.
    pub fn draft(
        menu_id: PartitionKey,
        name: impl Into<String>,
        url_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            menu_id,
            position: 0,
            name: name.into(),
            url_name: url_name.into(),
            text: text.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Content {
    /// The fields an editor may change
    pub fn details(&self) -> ContentDetails {
        ContentDetails {
            name: self.name.clone(),
            url_name: self.url_name.clone(),
            text: self.text.clone(),
            is_active: self.is_active,
        }
    }
}

/// Editable fields of a content record. Position and menu are not among them:
/// only the orderable service moves content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDetails {
    pub name: String,
    pub url_name: String,
    pub text: String,
    pub is_active: bool,
}

impl ContentDetails {
    /// Overlay the fields set in `update`
    pub fn merged(mut self, update: ContentUpdate) -> Self {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(url_name) = update.url_name {
            self.url_name = url_name;
        }
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self
    }
}

/// Partial edit of a content record; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentUpdate {
    pub name: Option<String>,
    pub url_name: Option<String>,
    pub text: Option<String>,
    pub is_active: Option<bool>,
}

impl ContentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url_name.is_none()
            && self.text.is_none()
            && self.is_active.is_none()
    }
}

impl Orderable for Content {
    fn id(&self) -> EntityId {
        self.id
    }

    fn partition_key(&self) -> PartitionKey {
        self.menu_id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
        self.updated_at = Utc::now();
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Direction of a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards position 0
    Up,
    /// Towards the end of the partition
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A staged move: "the item at `position` within `partition`"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub partition: PartitionKey,
    pub position: Position,
}

impl MoveRequest {
    pub fn new(partition: PartitionKey, position: Position) -> Self {
        Self {
            partition,
            position,
        }
    }
}

/// One compare-and-set position write.
///
/// `from` is the position the engine read; a store must refuse the change
/// when the row no longer holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionChange {
    pub id: EntityId,
    pub from: Position,
    pub to: Position,
}

impl PositionChange {
    pub fn new(id: EntityId, from: Position, to: Position) -> Self {
        Self { id, from, to }
    }
}
