//! Transaction entity - a completed (or pending/voided) sale.
//!
//! Each transaction has a `total_amount`, a `tip`, a `status` (`"COMPLETED"`, `"PENDING"`
//! or `"VOIDED"`) and one or more payments. Only completed transactions count towards
//! drawer reconciliation and shift statistics.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Drawer the sale is attributed to, if any
    pub drawer_id: Option<i64>,
    /// Employee who rang the sale
    pub employee_id: i64,
    /// Sale total
    pub total_amount: f64,
    /// Tip on top of the total
    pub tip: f64,
    /// `"COMPLETED"`, `"PENDING"` or `"VOIDED"`
    pub status: String,
    /// When the transaction was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction may belong to one drawer
    #[sea_orm(
        belongs_to = "super::cash_drawer::Entity",
        from = "Column::DrawerId",
        to = "super::cash_drawer::Column::Id"
    )]
    CashDrawer,
    /// One transaction has many payment legs
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::cash_drawer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDrawer.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
