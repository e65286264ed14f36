//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Content table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning menu; unique together with `position`
    pub menu_id: i64,

    /// Display position; negative only while a swap is in flight
    pub position: i32,

    pub name: String,

    pub url_name: String,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTimeUtc,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
