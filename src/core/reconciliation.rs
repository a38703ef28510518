//! Expected cash, net cash movement and variance for a drawer.
//!
//! ```text
//! expected_amount     = opening_amount + Σ cash legs of completed sales
//! net_cash_movement   = Σ pickups - Σ drops
//! total_expected_cash = expected_amount + net_cash_movement
//! variance            = counted - total_expected_cash
//! ```
//!
//! Pickups add cash to the drawer (change float top-ups) and drops remove it.
//! A positive variance is an overage, a negative one a shortage. All results are
//! rounded to cents.

use crate::{
    core::{
        money::round_cents,
        movement,
        sale::{self, SaleRecord},
    },
    entities::cash_drawer,
    errors::Result,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// Cash position of a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Float at open
    pub opening_amount: f64,
    /// Cash legs of completed sales
    pub cash_sales: f64,
    /// `opening_amount + cash_sales`
    pub expected_amount: f64,
    /// Sum of drops
    pub total_drops: f64,
    /// Sum of pickups
    pub total_pickups: f64,
    /// `total_pickups - total_drops`
    pub net_cash_movement: f64,
    /// `expected_amount + net_cash_movement`
    pub total_expected_cash: f64,
}

/// Sum of the cash legs of completed sales. Non-cash legs of split payments are ignored.
#[must_use]
pub fn cash_sales(sales: &[SaleRecord]) -> f64 {
    round_cents(
        sales
            .iter()
            .filter(|s| s.is_completed())
            .map(SaleRecord::cash_amount)
            .sum(),
    )
}

/// `opening_amount + cash_sales`.
#[must_use]
pub fn expected_amount(opening_amount: f64, cash_sales: f64) -> f64 {
    round_cents(opening_amount + cash_sales)
}

/// Drops count negative, pickups positive. Independent of order.
#[must_use]
pub fn net_cash_movement(drops: &[f64], pickups: &[f64]) -> f64 {
    let dropped: f64 = drops.iter().sum();
    let picked_up: f64 = pickups.iter().sum();
    round_cents(picked_up - dropped)
}

/// `counted - expected`, sign preserved.
#[must_use]
pub fn variance(counted: f64, expected: f64) -> f64 {
    round_cents(counted - expected)
}

impl Reconciliation {
    /// Builds the reconciliation from already-loaded parts.
    #[must_use]
    pub fn from_parts(opening_amount: f64, sales: &[SaleRecord], drops: &[f64], pickups: &[f64]) -> Self {
        let cash_sales = cash_sales(sales);
        let expected_amount = expected_amount(opening_amount, cash_sales);
        let net_cash_movement = net_cash_movement(drops, pickups);
        Self {
            opening_amount,
            cash_sales,
            expected_amount,
            total_drops: round_cents(drops.iter().sum()),
            total_pickups: round_cents(pickups.iter().sum()),
            net_cash_movement,
            total_expected_cash: round_cents(expected_amount + net_cash_movement),
        }
    }

    /// Variance of a counted amount against the total expected cash.
    #[must_use]
    pub fn variance_for(&self, counted: f64) -> f64 {
        variance(counted, self.total_expected_cash)
    }
}

/// Loads a drawer's sales, drops and pickups and reconciles them.
pub async fn reconcile_drawer<C: ConnectionTrait>(
    db: &C,
    drawer: &cash_drawer::Model,
) -> Result<Reconciliation> {
    let sales = sale::load_sales_for_drawers(db, &[drawer.id]).await?;
    let drops: Vec<f64> = movement::drops_for_drawer(db, drawer.id)
        .await?
        .into_iter()
        .map(|d| d.amount)
        .collect();
    let pickups: Vec<f64> = movement::pickups_for_drawer(db, drawer.id)
        .await?
        .into_iter()
        .map(|p| p.amount)
        .collect();

    Ok(Reconciliation::from_parts(
        drawer.opening_amount,
        &sales,
        &drops,
        &pickups,
    ))
}
