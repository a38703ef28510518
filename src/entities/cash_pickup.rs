//! Cash pickup entity - cash added to an open drawer, e.g. a change float top-up.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash pickup database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_pickups")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the pickup
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Drawer the cash was added to
    pub drawer_id: i64,
    /// Amount added, always positive
    pub amount: f64,
    /// Why the cash was added
    pub reason: String,
    /// Employee who performed the pickup
    pub picked_up_by: i64,
    /// When the pickup was recorded
    pub picked_up_at: DateTimeUtc,
}

/// Defines relationships between `CashPickup` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each pickup belongs to one drawer
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
