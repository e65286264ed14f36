//! Store failures pass through the service unchanged and leave partitions intact

use async_trait::async_trait;
use orderable_service::domain::repository::{PositionStore, StoreError, StoreResult};
use orderable_service::infra::storage::InMemoryPositionStore;
use orderable_service::{Content, EntityId, OrderingError, PartitionKey, PositionChange};
use parking_lot::Mutex;
use std::sync::Arc;

mod common;
use common::*;

/// Which write the flaky store should fail
#[derive(Clone, Copy)]
enum Failure {
    None,
    ApplyUnavailable,
    ApplyConflict,
    ReadUnavailable,
}

/// Wraps the in-memory store and injects failures on demand
struct FlakyStore {
    inner: InMemoryPositionStore<Content>,
    failure: Mutex<Failure>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: InMemoryPositionStore::new(),
            failure: Mutex::new(Failure::None),
        }
    }

    fn fail_with(&self, failure: Failure) {
        *self.failure.lock() = failure;
    }

    fn current(&self) -> Failure {
        *self.failure.lock()
    }
}

#[async_trait]
impl PositionStore<Content> for FlakyStore {
    async fn entities_in(&self, partition: PartitionKey) -> StoreResult<Vec<Content>> {
        if let Failure::ReadUnavailable = self.current() {
            return Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")));
        }
        self.inner.entities_in(partition).await
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Content>> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, entity: &Content) -> StoreResult<Content> {
        self.inner.insert(entity).await
    }

    async fn apply_position_changes(
        &self,
        partition: PartitionKey,
        changes: &[PositionChange],
    ) -> StoreResult<()> {
        match self.current() {
            Failure::ApplyUnavailable => {
                Err(StoreError::Unavailable(anyhow::anyhow!("disk I/O error")))
            }
            Failure::ApplyConflict => Err(StoreError::Conflict(
                "row version changed".to_string(),
            )),
            _ => self.inner.apply_position_changes(partition, changes).await,
        }
    }

    async fn remove(
        &self,
        partition: PartitionKey,
        id: EntityId,
        repair: &[PositionChange],
    ) -> StoreResult<()> {
        match self.current() {
            Failure::ApplyUnavailable => {
                Err(StoreError::Unavailable(anyhow::anyhow!("disk I/O error")))
            }
            _ => self.inner.remove(partition, id, repair).await,
        }
    }
}

/// Store where another writer always takes the slot just before our insert
struct RacingStore {
    inner: InMemoryPositionStore<Content>,
}

#[async_trait]
impl PositionStore<Content> for RacingStore {
    async fn entities_in(&self, partition: PartitionKey) -> StoreResult<Vec<Content>> {
        self.inner.entities_in(partition).await
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Content>> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, entity: &Content) -> StoreResult<Content> {
        let mut rival = Content::draft(entity.menu_id, "Rival", "rival", "");
        rival.position = entity.position;
        self.inner.insert(&rival).await?;
        self.inner.insert(entity).await
    }

    async fn apply_position_changes(
        &self,
        partition: PartitionKey,
        changes: &[PositionChange],
    ) -> StoreResult<()> {
        self.inner.apply_position_changes(partition, changes).await
    }

    async fn remove(
        &self,
        partition: PartitionKey,
        id: EntityId,
        repair: &[PositionChange],
    ) -> StoreResult<()> {
        self.inner.remove(partition, id, repair).await
    }
}

#[tokio::test]
async fn test_unavailable_store_passes_through() {
    print_test_header(
        "test_unavailable_store_passes_through",
        "An infrastructure failure during the swap surfaces as StoreUnavailable",
    );
    let store = Arc::new(FlakyStore::new());
    let service = service_over(store.clone());
    seed_menu(&service, MAIN_MENU, &["A", "B", "C"]).await;

    store.fail_with(Failure::ApplyUnavailable);
    let err = service
        .begin_move(1)
        .constrained_by(MAIN_MENU)
        .up_one()
        .await
        .unwrap_err();
    match &err {
        OrderingError::StoreUnavailable { reason } => assert!(reason.contains("disk I/O error")),
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }
    assert!(!err.is_retryable());

    store.fail_with(Failure::None);
    assert_eq!(
        names(&service.ordered(MAIN_MENU).await.unwrap()),
        vec!["A", "B", "C"]
    );
}

#[tokio::test]
async fn test_conflict_passes_through_without_retry() {
    let store = Arc::new(FlakyStore::new());
    let service = service_over(store.clone());
    seed_menu(&service, MAIN_MENU, &["A", "B"]).await;

    store.fail_with(Failure::ApplyConflict);
    let err = service
        .begin_move(0)
        .constrained_by(MAIN_MENU)
        .down_one()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderingError::ConcurrencyConflict {
            reason: "row version changed".to_string()
        }
    );
    assert!(err.is_retryable());

    store.fail_with(Failure::None);
    assert_eq!(
        names(&service.ordered(MAIN_MENU).await.unwrap()),
        vec!["A", "B"]
    );
}

#[tokio::test]
async fn test_read_failure_stops_before_any_write() {
    let store = Arc::new(FlakyStore::new());
    let service = service_over(store.clone());
    let seeded = seed_menu(&service, MAIN_MENU, &["A", "B"]).await;

    store.fail_with(Failure::ReadUnavailable);
    assert!(matches!(
        service.next_position(MAIN_MENU).await,
        Err(OrderingError::StoreUnavailable { .. })
    ));
    assert!(matches!(
        service.remove(seeded[0].id).await,
        Err(OrderingError::StoreUnavailable { .. })
    ));

    store.fail_with(Failure::None);
    assert_eq!(service.ordered(MAIN_MENU).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_remove_keeps_entity() {
    let store = Arc::new(FlakyStore::new());
    let service = service_over(store.clone());
    let seeded = seed_menu(&service, MAIN_MENU, &["A", "B", "C"]).await;

    store.fail_with(Failure::ApplyUnavailable);
    assert!(service.remove(seeded[0].id).await.is_err());

    store.fail_with(Failure::None);
    let menu = service.ordered(MAIN_MENU).await.unwrap();
    assert_eq!(names(&menu), vec!["A", "B", "C"]);
    assert_dense(&menu);
}

#[tokio::test]
async fn test_append_race_surfaces_conflict() {
    print_test_header(
        "test_append_race_surfaces_conflict",
        "Two creations handed the same next position: the loser gets ConcurrencyConflict",
    );
    let store = Arc::new(RacingStore {
        inner: InMemoryPositionStore::new(),
    });
    let service = service_over(store.clone());

    let err = service
        .append(Content::draft(MAIN_MENU, "A", "a", ""))
        .await
        .unwrap_err();
    assert!(err.is_retryable(), "got {:?}", err);

    let menu = store.inner.entities_in(MAIN_MENU).await.unwrap();
    assert_eq!(names(&menu), vec!["Rival"]);
    assert_dense(&menu);
}
