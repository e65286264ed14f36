//! SeaORM repository implementations

use super::entity;
use super::mapper::{new_active_model, parked_column, position_column};
use crate::contract::{Content, ContentDetails, EntityId, PartitionKey, PositionChange};
use crate::domain::repository::{ContentRepository, PositionStore, StoreError, StoreResult};
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, TransactionTrait,
};
use std::sync::Arc;

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
            _ => StoreError::Unavailable(err.into()),
        }
    }
}

fn unavailable(err: anyhow::Error) -> StoreError {
    StoreError::Unavailable(err)
}

// ===== Content Store =====

pub struct SeaOrmContentStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmContentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Write `changes` in two phases on `conn`.
///
/// Phase one moves each row from its expected position to a negative parked
/// slot, which doubles as the compare-and-set check. Phase two moves parked
/// rows to their final slots. The unique `(menu_id, position)` index holds
/// after every statement.
async fn write_changes<C: ConnectionTrait>(
    conn: &C,
    partition: PartitionKey,
    changes: &[PositionChange],
) -> StoreResult<()> {
    for change in changes {
        let parked = entity::Entity::update_many()
            .col_expr(
                entity::Column::Position,
                Expr::value(parked_column(change.to).map_err(unavailable)?),
            )
            .filter(entity::Column::Id.eq(change.id))
            .filter(entity::Column::MenuId.eq(partition))
            .filter(entity::Column::Position.eq(position_column(change.from).map_err(unavailable)?))
            .exec(conn)
            .await?;

        if parked.rows_affected != 1 {
            return Err(StoreError::Conflict(format!(
                "content {} is no longer at position {} in menu {}",
                change.id, change.from, partition
            )));
        }
    }

    for change in changes {
        entity::Entity::update_many()
            .col_expr(
                entity::Column::Position,
                Expr::value(position_column(change.to).map_err(unavailable)?),
            )
            .col_expr(entity::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(entity::Column::Id.eq(change.id))
            .filter(entity::Column::Position.eq(parked_column(change.to).map_err(unavailable)?))
            .exec(conn)
            .await?;
    }

    Ok(())
}

/// Ids of `partition`, selected `FOR UPDATE`.
///
/// Writers that depend on the partition's size take this first, so an append
/// and a removal on the same menu wait for each other. SQLite has no row
/// locks and serializes writers on its database lock instead.
fn partition_lock(partition: PartitionKey) -> Select<entity::Entity> {
    entity::Entity::find()
        .select_only()
        .column(entity::Column::Id)
        .filter(entity::Column::MenuId.eq(partition))
        .lock_exclusive()
}

async fn lock_partition<C: ConnectionTrait>(
    conn: &C,
    partition: PartitionKey,
) -> StoreResult<Vec<EntityId>> {
    Ok(partition_lock(partition).into_tuple().all(conn).await?)
}

/// Whether the stored positions of `partition` are exactly `0..n`
async fn partition_is_dense<C: ConnectionTrait>(conn: &C, partition: PartitionKey) -> StoreResult<bool> {
    let positions: Vec<i32> = entity::Entity::find()
        .select_only()
        .column(entity::Column::Position)
        .filter(entity::Column::MenuId.eq(partition))
        .order_by_asc(entity::Column::Position)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(positions.into_iter().zip(0..).all(|(stored, slot)| stored == slot))
}

#[async_trait]
impl PositionStore<Content> for SeaOrmContentStore {
    async fn entities_in(&self, partition: PartitionKey) -> StoreResult<Vec<Content>> {
        let results = entity::Entity::find()
            .filter(entity::Column::MenuId.eq(partition))
            .order_by_asc(entity::Column::Position)
            .order_by_asc(entity::Column::Id)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(|e| Content::try_from(e).map_err(unavailable))
            .collect()
    }

    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Content>> {
        let result = entity::Entity::find_by_id(id).one(&*self.db).await?;

        match result {
            Some(entity) => Ok(Some(Content::try_from(entity).map_err(unavailable)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, content: &Content) -> StoreResult<Content> {
        let active = new_active_model(content).map_err(unavailable)?;
        let txn = self.db.begin().await?;

        let size = lock_partition(&txn, content.menu_id).await?.len();
        if size != content.position as usize {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "position {} is not the next free slot of menu {} ({})",
                content.position, content.menu_id, size
            )));
        }

        // The unique (menu_id, position) index rejects a concurrent twin
        let result = entity::Entity::insert(active)
            .exec_with_returning(&txn)
            .await?;
        txn.commit().await?;

        Content::try_from(result).map_err(unavailable)
    }

    async fn apply_position_changes(
        &self,
        partition: PartitionKey,
        changes: &[PositionChange],
    ) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        if let Err(e) = write_changes(&txn, partition, changes).await {
            txn.rollback().await?;
            return Err(e);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn remove(
        &self,
        partition: PartitionKey,
        id: EntityId,
        repair: &[PositionChange],
    ) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        lock_partition(&txn, partition).await?;

        let deleted = entity::Entity::delete_many()
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::MenuId.eq(partition))
            .exec(&txn)
            .await?;

        if deleted.rows_affected != 1 {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "content {} is no longer in menu {}",
                id, partition
            )));
        }

        if let Err(e) = write_changes(&txn, partition, repair).await {
            txn.rollback().await?;
            return Err(e);
        }

        if !partition_is_dense(&txn, partition).await? {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "removing content {} would leave menu {} with a gap",
                id, partition
            )));
        }

        txn.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for SeaOrmContentStore {
    async fn find_by_url_name(&self, url_name: &str) -> StoreResult<Option<Content>> {
        let result = entity::Entity::find()
            .filter(entity::Column::UrlName.eq(url_name))
            .order_by_asc(entity::Column::Id)
            .one(&*self.db)
            .await?;

        result
            .map(|e| Content::try_from(e).map_err(unavailable))
            .transpose()
    }

    async fn first_in_order(&self) -> StoreResult<Option<Content>> {
        let result = entity::Entity::find()
            .filter(entity::Column::IsActive.eq(true))
            .order_by_asc(entity::Column::Position)
            .order_by_asc(entity::Column::MenuId)
            .order_by_asc(entity::Column::Id)
            .one(&*self.db)
            .await?;

        result
            .map(|e| Content::try_from(e).map_err(unavailable))
            .transpose()
    }

    async fn update_details(
        &self,
        id: EntityId,
        details: &ContentDetails,
    ) -> StoreResult<Option<Content>> {
        let txn = self.db.begin().await?;

        let updated = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(details.name.clone()))
            .col_expr(entity::Column::UrlName, Expr::value(details.url_name.clone()))
            .col_expr(entity::Column::Text, Expr::value(details.text.clone()))
            .col_expr(entity::Column::IsActive, Expr::value(details.is_active))
            .col_expr(entity::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(entity::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let result = entity::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        result
            .map(|e| Content::try_from(e).map_err(unavailable))
            .transpose()
    }
}
