//! Cash drop entity - cash withdrawn from an open drawer, e.g. a bank deposit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash drop database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_drops")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the drop
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Drawer the cash was taken from
    pub drawer_id: i64,
    /// Amount removed, always positive
    pub amount: f64,
    /// Why the cash was removed
    pub reason: String,
    /// Employee who performed the drop
    pub dropped_by: i64,
    /// When the drop was recorded
    pub dropped_at: DateTimeUtc,
}

/// Defines relationships between `CashDrop` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each drop belongs to one drawer
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
