//! Mid-shift cash movements.
//!
//! A drop takes cash out of the drawer (bank deposit, safe transfer). A pickup puts
//! cash in (change float top-up). Both are only accepted on an open drawer, need a
//! positive amount and a non-empty reason, and are never edited afterwards.

use crate::{
    core::{
        drawer, employee,
        money::{self, MoneyInput},
    },
    entities::{CashDrop, CashPickup, cash_drop, cash_pickup},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

fn validate_reason(reason: &str) -> Result<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Reason cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Records cash removed from an open drawer.
///
/// # Errors
/// * [`Error::Validation`] / [`Error::InvalidAmount`] - missing or non-positive amount,
///   empty reason, or the drawer is closed
/// * [`Error::DrawerNotFound`] / [`Error::EmployeeNotFound`]
pub async fn add_cash_drop(
    db: &DatabaseConnection,
    drawer_id: i64,
    amount: Option<&MoneyInput>,
    reason: &str,
    dropped_by: i64,
) -> Result<cash_drop::Model> {
    let amount = money::parse_positive(amount, "amount")?;
    let reason = validate_reason(reason)?;

    let txn = db.begin().await?;
    drawer::require_open_drawer(&txn, drawer_id).await?;
    employee::require_active_employee(&txn, dropped_by).await?;

    let drop = cash_drop::ActiveModel {
        drawer_id: Set(drawer_id),
        amount: Set(amount),
        reason: Set(reason),
        dropped_by: Set(dropped_by),
        dropped_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(drawer_id, drop_id = drop.id, amount, "Cash drop recorded");
    Ok(drop)
}

/// Records cash added to an open drawer.
///
/// # Errors
/// Same as [`add_cash_drop`].
pub async fn add_cash_pickup(
    db: &DatabaseConnection,
    drawer_id: i64,
    amount: Option<&MoneyInput>,
    reason: &str,
    picked_up_by: i64,
) -> Result<cash_pickup::Model> {
    let amount = money::parse_positive(amount, "amount")?;
    let reason = validate_reason(reason)?;

    let txn = db.begin().await?;
    drawer::require_open_drawer(&txn, drawer_id).await?;
    employee::require_active_employee(&txn, picked_up_by).await?;

    let pickup = cash_pickup::ActiveModel {
        drawer_id: Set(drawer_id),
        amount: Set(amount),
        reason: Set(reason),
        picked_up_by: Set(picked_up_by),
        picked_up_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(drawer_id, pickup_id = pickup.id, amount, "Cash pickup recorded");
    Ok(pickup)
}

/// Drops for a drawer, oldest first.
pub async fn drops_for_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<Vec<cash_drop::Model>> {
    CashDrop::find()
        .filter(cash_drop::Column::DrawerId.eq(drawer_id))
        .order_by_asc(cash_drop::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Pickups for a drawer, oldest first.
pub async fn pickups_for_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<Vec<cash_pickup::Model>> {
    CashPickup::find()
        .filter(cash_pickup::Column::DrawerId.eq(drawer_id))
        .order_by_asc(cash_pickup::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
