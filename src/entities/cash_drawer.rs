//! Cash drawer entity - one cashier shift from open to close.
//!
//! A drawer is open while `closed_at` is `None`. Closing stamps `closed_at` together
//! with the counted `closing_amount`, the `expected_amount` shown to the cashier,
//! the signed `difference` and the optional denomination tally. Closed drawers are
//! never written again.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash drawer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_drawers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the drawer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee who owns this shift
    pub employee_id: i64,
    /// Float placed in the drawer at open
    pub opening_amount: f64,
    /// When the shift was opened
    pub opened_at: DateTimeUtc,
    /// Cash counted at close
    pub closing_amount: Option<f64>,
    /// Expected cash at close (opening + cash sales + net drops/pickups)
    pub expected_amount: Option<f64>,
    /// `closing_amount - expected_amount`, negative for a shortage
    pub difference: Option<f64>,
    /// Denomination label to count, stored as a JSON object
    pub denomination_breakdown: Option<Json>,
    /// When the shift was closed; `None` while the drawer is active
    pub closed_at: Option<DateTimeUtc>,
}

impl Model {
    /// Returns true while the drawer has not been closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

/// Defines relationships between `CashDrawer` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each drawer belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// Cash removed mid-shift
    #[sea_orm(has_many = "super::cash_drop::Entity")]
    CashDrops,
    /// Cash added mid-shift
    #[sea_orm(has_many = "super::cash_pickup::Entity")]
    CashPickups,
    /// Free-text annotations
    #[sea_orm(has_many = "super::shift_note::Entity")]
    ShiftNotes,
    /// Sales attributed to this drawer
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::cash_drop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDrops.def()
    }
}

impl Related<super::cash_pickup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashPickups.def()
    }
}

impl Related<super::shift_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShiftNotes.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
