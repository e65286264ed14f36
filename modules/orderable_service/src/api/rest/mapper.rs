//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract::{self, PartitionKey};

impl From<contract::Content> for ContentDto {
    fn from(content: contract::Content) -> Self {
        Self {
            id: content.id,
            menu_id: content.menu_id,
            position: content.position,
            name: content.name,
            url_name: content.url_name,
            text: content.text,
            is_active: content.is_active,
            created_at: content.created_at,
            updated_at: content.updated_at,
        }
    }
}

impl CreateContentRequest {
    /// Unsaved content for `menu_id`
    pub fn into_draft(self, menu_id: PartitionKey) -> contract::Content {
        let mut draft = contract::Content::draft(menu_id, self.name, self.url_name, self.text);
        draft.is_active = self.is_active;
        draft
    }
}

impl From<UpdateContentRequest> for contract::ContentUpdate {
    fn from(req: UpdateContentRequest) -> Self {
        Self {
            name: req.name,
            url_name: req.url_name,
            text: req.text,
            is_active: req.is_active,
        }
    }
}

impl ContentListResponse {
    pub fn new(menu_id: PartitionKey, contents: Vec<contract::Content>) -> Self {
        let items: Vec<ContentDto> = contents.into_iter().map(Into::into).collect();
        let total = items.len();
        Self {
            menu_id,
            items,
            total,
        }
    }
}
