//! In-memory position store
//!
//! One lock guards the whole table, so every write is atomic with respect to
//! every reader. Compare-and-set semantics match the SeaORM store.

use crate::contract::{Content, ContentDetails, EntityId, Orderable, PartitionKey, PositionChange};
use crate::domain::repository::{ContentRepository, PositionStore, StoreError, StoreResult};
use crate::domain::validation;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};

struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

pub struct InMemoryPositionStore<T: Orderable> {
    table: RwLock<Table<T>>,
}

impl<T: Orderable> InMemoryPositionStore<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Seed the store with already-persisted entities, ids and positions as
    /// given. No density check is made, so legacy data can be loaded.
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        let rows: BTreeMap<EntityId, T> = entities.into_iter().map(|e| (e.id(), e)).collect();
        let next_id = rows.keys().next_back().map_or(1, |id| id + 1);
        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }

    /// Every stored entity, ordered by id
    pub fn all(&self) -> Vec<T> {
        self.table.read().rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().rows.is_empty()
    }
}

impl<T: Orderable> Default for InMemoryPositionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate `changes` against the current rows and return the updated copies.
///
/// `excluded` is treated as already deleted.
fn stage<T: Orderable>(
    rows: &BTreeMap<EntityId, T>,
    partition: PartitionKey,
    changes: &[PositionChange],
    excluded: Option<EntityId>,
) -> StoreResult<Vec<T>> {
    let mut staged = Vec::with_capacity(changes.len());
    for change in changes {
        let current = rows
            .get(&change.id)
            .filter(|e| Some(e.id()) != excluded)
            .filter(|e| e.partition_key() == partition)
            .ok_or_else(|| {
                StoreError::Conflict(format!(
                    "item {} is no longer in partition {}",
                    change.id, partition
                ))
            })?;
        if current.position() != change.from {
            return Err(StoreError::Conflict(format!(
                "item {} moved from position {} to {}",
                change.id,
                change.from,
                current.position()
            )));
        }

        let mut updated = current.clone();
        updated.set_position(change.to);
        staged.push(updated);
    }

    let touched: HashSet<EntityId> = staged.iter().map(|e| e.id()).collect();
    let mut taken = HashSet::new();
    let untouched = rows.values().filter(|e| {
        e.partition_key() == partition
            && !touched.contains(&e.id())
            && Some(e.id()) != excluded
    });
    for entity in untouched.chain(staged.iter()) {
        if !taken.insert(entity.position()) {
            return Err(StoreError::Conflict(format!(
                "position {} would be duplicated in partition {}",
                entity.position(),
                partition
            )));
        }
    }

    Ok(staged)
}

#[async_trait]
impl<T: Orderable> PositionStore<T> for InMemoryPositionStore<T> {
    async fn entities_in(&self, partition: PartitionKey) -> StoreResult<Vec<T>> {
        let table = self.table.read();
        let mut entities: Vec<T> = table
            .rows
            .values()
            .filter(|e| e.partition_key() == partition)
            .cloned()
            .collect();
        entities.sort_by_key(|e| (e.position(), e.id()));
        Ok(entities)
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn insert(&self, entity: &T) -> StoreResult<T> {
        let mut table = self.table.write();
        let partition = entity.partition_key();
        let members = table
            .rows
            .values()
            .filter(|e| e.partition_key() == partition);

        let mut size = 0usize;
        let mut taken = false;
        for member in members {
            size += 1;
            taken |= member.position() == entity.position();
        }
        if taken {
            return Err(StoreError::Conflict(format!(
                "position {} is already taken in partition {}",
                entity.position(),
                partition
            )));
        }
        if entity.position() as usize != size {
            return Err(StoreError::Conflict(format!(
                "position {} is not the next free slot of partition {} ({})",
                entity.position(),
                partition,
                size
            )));
        }

        let mut created = entity.clone();
        created.assign_id(table.next_id);
        table.next_id += 1;
        table.rows.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn apply_position_changes(
        &self,
        partition: PartitionKey,
        changes: &[PositionChange],
    ) -> StoreResult<()> {
        let mut table = self.table.write();
        let staged = stage(&table.rows, partition, changes, None)?;
        for entity in staged {
            table.rows.insert(entity.id(), entity);
        }
        Ok(())
    }

    async fn remove(
        &self,
        partition: PartitionKey,
        id: EntityId,
        repair: &[PositionChange],
    ) -> StoreResult<()> {
        let mut table = self.table.write();
        let present = table
            .rows
            .get(&id)
            .is_some_and(|e| e.partition_key() == partition);
        if !present {
            return Err(StoreError::Conflict(format!(
                "item {} is no longer in partition {}",
                id, partition
            )));
        }

        let staged = stage(&table.rows, partition, repair, Some(id))?;
        let touched: HashSet<EntityId> = staged.iter().map(|e| e.id()).collect();
        let remaining: Vec<T> = table
            .rows
            .values()
            .filter(|e| e.partition_key() == partition && e.id() != id && !touched.contains(&e.id()))
            .cloned()
            .chain(staged.iter().cloned())
            .collect();
        if !validation::is_dense(&remaining) {
            return Err(StoreError::Conflict(format!(
                "removing item {} would leave partition {} with a gap",
                id, partition
            )));
        }

        table.rows.remove(&id);
        for entity in staged {
            table.rows.insert(entity.id(), entity);
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryPositionStore<Content> {
    async fn find_by_url_name(&self, url_name: &str) -> StoreResult<Option<Content>> {
        let table = self.table.read();
        Ok(table.rows.values().find(|c| c.url_name == url_name).cloned())
    }

    async fn first_in_order(&self) -> StoreResult<Option<Content>> {
        let table = self.table.read();
        Ok(table
            .rows
            .values()
            .filter(|c| c.is_active)
            .min_by_key(|c| (c.position, c.menu_id, c.id))
            .cloned())
    }

    async fn update_details(
        &self,
        id: EntityId,
        details: &ContentDetails,
    ) -> StoreResult<Option<Content>> {
        let mut table = self.table.write();
        let Some(content) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        content.name = details.name.clone();
        content.url_name = details.url_name.clone();
        content.text = details.text.clone();
        content.is_active = details.is_active;
        content.updated_at = chrono::Utc::now();
        Ok(Some(content.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::tests::{menu, Item};

    #[tokio::test]
    async fn test_insert_assigns_ids_and_rejects_taken_slot() {
        let store = InMemoryPositionStore::<Item>::new();
        let first = store
            .insert(&Item { id: 0, menu: 1, position: 0 })
            .await
            .unwrap();
        assert_eq!(first.id, 1);

        let err = store
            .insert(&Item { id: 0, menu: 1, position: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let other_menu = store
            .insert(&Item { id: 0, menu: 2, position: 0 })
            .await
            .unwrap();
        assert_eq!(other_menu.id, 2);

        // Position 2 would leave slot 1 of menu 1 empty
        let err = store
            .insert(&Item { id: 0, menu: 1, position: 2 })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_stale_change_is_rejected_atomically() {
        let store = InMemoryPositionStore::with_entities(menu(1, &[10, 11, 12]));
        let changes = [PositionChange::new(10, 0, 1), PositionChange::new(11, 2, 0)];

        let err = store.apply_position_changes(1, &changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.entities_in(1).await.unwrap(), menu(1, &[10, 11, 12]));
    }

    #[tokio::test]
    async fn test_change_creating_duplicate_is_rejected() {
        let store = InMemoryPositionStore::with_entities(menu(1, &[10, 11, 12]));

        let err = store
            .apply_position_changes(1, &[PositionChange::new(10, 0, 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_remove_applies_repair() {
        let store = InMemoryPositionStore::with_entities(menu(1, &[10, 11, 12]));

        store
            .remove(1, 10, &[PositionChange::new(11, 1, 0), PositionChange::new(12, 2, 1)])
            .await
            .unwrap();
        assert_eq!(store.entities_in(1).await.unwrap(), menu(1, &[11, 12]));

        let err = store.remove(1, 10, &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_remove_with_incomplete_repair_is_rejected() {
        let store = InMemoryPositionStore::with_entities(menu(1, &[10, 11, 12]));

        // 12 would stay at position 2 and leave slot 1 empty
        let err = store
            .remove(1, 10, &[PositionChange::new(11, 1, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_content_lookups_and_details_update() {
        let store = InMemoryPositionStore::<Content>::new();
        let about = store
            .insert(&Content::draft(1, "About", "about", ""))
            .await
            .unwrap();
        let mut terms = Content::draft(2, "Terms", "terms", "");
        terms.is_active = false;
        store.insert(&terms).await.unwrap();

        assert_eq!(store.find_by_url_name("about").await.unwrap(), Some(about.clone()));
        assert_eq!(store.find_by_url_name("missing").await.unwrap(), None);
        assert_eq!(store.first_in_order().await.unwrap(), Some(about.clone()));

        let details = ContentDetails {
            is_active: false,
            ..about.details()
        };
        let updated = store.update_details(about.id, &details).await.unwrap().unwrap();
        assert!(!updated.is_active);
        assert_eq!((updated.menu_id, updated.position), (1, 0));
        assert_eq!(store.first_in_order().await.unwrap(), None);

        assert_eq!(store.update_details(99, &details).await.unwrap(), None);
    }
}
