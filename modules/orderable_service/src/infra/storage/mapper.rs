//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{Content, Position};

impl TryFrom<entity::Model> for Content {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let position = Position::try_from(entity.position).map_err(|_| {
            anyhow::anyhow!(
                "content {} has invalid stored position {}",
                entity.id,
                entity.position
            )
        })?;

        Ok(Self {
            id: entity.id,
            menu_id: entity.menu_id,
            position,
            name: entity.name,
            url_name: entity.url_name,
            text: entity.text,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Stored column value for a position
pub fn position_column(position: Position) -> anyhow::Result<i32> {
    i32::try_from(position).map_err(|_| anyhow::anyhow!("position {} exceeds column range", position))
}

/// Temporary negative slot a row occupies between the two phases of a swap
pub fn parked_column(position: Position) -> anyhow::Result<i32> {
    Ok(-position_column(position)? - 1)
}

/// Active model for a new row; the id is left to the database
pub fn new_active_model(model: &Content) -> anyhow::Result<entity::ActiveModel> {
    use sea_orm::ActiveValue::*;

    Ok(entity::ActiveModel {
        id: NotSet,
        menu_id: Set(model.menu_id),
        position: Set(position_column(model.position)?),
        name: Set(model.name.clone()),
        url_name: Set(model.url_name.clone()),
        text: Set(model.text.clone()),
        is_active: Set(model.is_active),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parked_slots_never_collide_with_real_ones() {
        assert_eq!(parked_column(0).unwrap(), -1);
        assert_eq!(parked_column(4).unwrap(), -5);
        assert!(position_column(u32::MAX).is_err());
    }

    #[test]
    fn test_negative_stored_position_is_rejected() {
        let now = chrono::Utc::now();
        let row = entity::Model {
            id: 3,
            menu_id: 1,
            position: -1,
            name: "About".to_string(),
            url_name: "about".to_string(),
            text: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(Content::try_from(row).is_err());
    }
}
