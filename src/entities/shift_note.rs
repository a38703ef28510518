//! Shift note entity - free-text annotation on a shift.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shift note database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shift_notes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the note
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Drawer the note is attached to
    pub drawer_id: i64,
    /// Note text, trimmed
    pub note: String,
    /// Employee who wrote the note
    pub created_by: i64,
    /// When the note was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ShiftNote` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each note belongs to one drawer
    #[sea_orm(
        belongs_to = "super::cash_drawer::Entity",
        from = "Column::DrawerId",
        to = "super::cash_drawer::Column::Id"
    )]
    CashDrawer,
}

impl Related<super::cash_drawer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDrawer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
