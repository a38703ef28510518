//! Employee entity - the cashiers and managers who own cash drawers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across employees
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text role, e.g. `"cashier"` or `"manager"`
    pub role: String,
    /// Inactive employees cannot open drawers
    pub is_active: bool,
    /// When the employee record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee owns many cash drawers over time
    #[sea_orm(has_many = "super::cash_drawer::Entity")]
    CashDrawers,
}

impl Related<super::cash_drawer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashDrawers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
