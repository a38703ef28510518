//! Cash drawer business logic - the shift lifecycle.
//!
//! A drawer moves through three states: no active drawer, open, closed. Opening is
//! rejected while the employee still has an open drawer; closing is accepted exactly
//! once. Both transitions run inside a database transaction so a failure leaves the
//! prior state untouched.
//!
//! The one-open-drawer rule is checked here first, which yields a validation error
//! the cashier can act on. If two opens race past that check, the partial unique
//! index created in [`crate::config::database`] rejects the loser and the insert is
//! reported as [`Error::Conflict`].

use crate::{
    core::{
        denomination::DenominationBreakdown,
        employee, money, movement, note,
        reconciliation::{self, Reconciliation},
        sale,
    },
    entities::{CashDrawer, cash_drawer, cash_drop, cash_pickup, shift_note},
    errors::{Error, Result},
};
use sea_orm::{DbErr, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Lifecycle state of a drawer as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerStatus {
    /// `closed_at` is unset
    Open,
    /// Finalized, immutable
    Closed,
}

impl DrawerStatus {
    /// Status of the given drawer.
    #[must_use]
    pub const fn of(drawer: &cash_drawer::Model) -> Self {
        if drawer.is_open() { Self::Open } else { Self::Closed }
    }
}

/// Restricts [`list_drawers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawerFilter {
    /// Only drawers owned by this employee
    pub employee_id: Option<i64>,
    /// Only drawers in this state
    pub status: Option<DrawerStatus>,
}

/// A drawer with its nested collections. The collections are always present,
/// empty when nothing has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerDetails {
    /// The drawer row
    #[serde(flatten)]
    pub drawer: cash_drawer::Model,
    /// Open or closed
    pub status: DrawerStatus,
    /// Cash removed mid-shift
    pub cash_drops: Vec<cash_drop::Model>,
    /// Cash added mid-shift
    pub cash_pickups: Vec<cash_pickup::Model>,
    /// Annotations
    pub shift_notes: Vec<shift_note::Model>,
    /// Ids of the transactions attributed to the drawer, oldest first
    pub transactions: Vec<i64>,
    /// Sum of the stored denomination breakdown, if one was recorded
    pub denomination_total: Option<f64>,
}

/// Input to [`close_drawer`], already parsed from the wire.
#[derive(Debug, Clone, Default)]
pub struct CloseDrawer {
    /// Cash counted by the cashier
    pub closing_amount: f64,
    /// Expected cash shown to the cashier; computed when `None`
    pub expected_amount: Option<f64>,
    /// Physical tally, advisory only
    pub breakdown: Option<DenominationBreakdown>,
}

/// Result of a successful close.
#[derive(Debug, Clone)]
pub struct ClosedDrawer {
    /// The finalized drawer row
    pub drawer: cash_drawer::Model,
    /// Reconciliation at the moment of closing
    pub reconciliation: Reconciliation,
    /// `denomination total - closing amount` when a tally was given and disagrees
    pub denomination_mismatch: Option<f64>,
}

/// Finds a drawer by id.
pub async fn get_drawer_by_id<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<Option<cash_drawer::Model>> {
    CashDrawer::find_by_id(drawer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a drawer by id or fails with [`Error::DrawerNotFound`].
pub async fn require_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<cash_drawer::Model> {
    get_drawer_by_id(db, drawer_id)
        .await?
        .ok_or(Error::DrawerNotFound { id: drawer_id })
}

/// Finds a drawer that is still open; a closed drawer is a validation error.
pub async fn require_open_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<cash_drawer::Model> {
    let drawer = require_drawer(db, drawer_id).await?;
    if !drawer.is_open() {
        return Err(Error::validation(format!(
            "Cash drawer {drawer_id} is already closed"
        )));
    }
    Ok(drawer)
}

/// Returns the employee's open drawer, if any.
pub async fn find_active_drawer<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
) -> Result<Option<cash_drawer::Model>> {
    CashDrawer::find()
        .filter(cash_drawer::Column::EmployeeId.eq(employee_id))
        .filter(cash_drawer::Column::ClosedAt.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists drawers, newest first.
pub async fn list_drawers<C: ConnectionTrait>(
    db: &C,
    filter: DrawerFilter,
) -> Result<Vec<cash_drawer::Model>> {
    let mut query = CashDrawer::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(cash_drawer::Column::EmployeeId.eq(employee_id));
    }
    query = match filter.status {
        Some(DrawerStatus::Open) => query.filter(cash_drawer::Column::ClosedAt.is_null()),
        Some(DrawerStatus::Closed) => query.filter(cash_drawer::Column::ClosedAt.is_not_null()),
        None => query,
    };
    query
        .order_by_desc(cash_drawer::Column::OpenedAt)
        .order_by_desc(cash_drawer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts an open drawer without the application-level check. A unique index
/// violation surfaces as [`Error::Conflict`].
pub(crate) async fn insert_open_drawer<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    opening_amount: f64,
) -> Result<cash_drawer::Model> {
    let drawer = cash_drawer::ActiveModel {
        employee_id: Set(employee_id),
        opening_amount: Set(opening_amount),
        opened_at: Set(chrono::Utc::now()),
        closing_amount: Set(None),
        expected_amount: Set(None),
        difference: Set(None),
        denomination_breakdown: Set(None),
        closed_at: Set(None),
        ..Default::default()
    };

    drawer.insert(db).await.map_err(|e| {
        Error::conflict_on_unique(
            e,
            &format!("Employee {employee_id} opened another drawer concurrently"),
        )
    })
}

/// Opens a drawer for the employee with the given float.
///
/// # Errors
/// * [`Error::Validation`] / [`Error::InvalidAmount`] - amount missing, not a number or negative,
///   or the employee already has an open drawer
/// * [`Error::EmployeeNotFound`] - unknown or inactive employee
/// * [`Error::Conflict`] - another open for the same employee won a race
pub async fn open_drawer(
    db: &DatabaseConnection,
    employee_id: i64,
    opening_amount: Option<&money::MoneyInput>,
) -> Result<cash_drawer::Model> {
    let opening_amount = money::parse_non_negative(opening_amount, "openingAmount")?;

    let txn = db.begin().await?;

    employee::require_active_employee(&txn, employee_id).await?;

    if let Some(active) = find_active_drawer(&txn, employee_id).await? {
        return Err(Error::validation(format!(
            "Employee {employee_id} already has an open cash drawer ({})",
            active.id
        )));
    }

    let drawer = insert_open_drawer(&txn, employee_id, opening_amount).await?;
    txn.commit().await?;

    info!(
        drawer_id = drawer.id,
        employee_id,
        opening_amount,
        "Cash drawer opened"
    );
    Ok(drawer)
}

/// Closes an open drawer.
///
/// `difference = closing_amount - expected_amount`, with the sign preserved. When the
/// request carries no expected amount the total expected cash is computed from the
/// drawer's sales, drops and pickups. A denomination tally that disagrees with the
/// counted amount is reported, never rejected.
///
/// # Errors
/// * [`Error::DrawerNotFound`] - unknown drawer
/// * [`Error::Validation`] - the drawer is already closed
/// * [`Error::InvalidAmount`] - negative or non-finite amounts
pub async fn close_drawer(
    db: &DatabaseConnection,
    drawer_id: i64,
    request: CloseDrawer,
) -> Result<ClosedDrawer> {
    let closing_amount = money::ensure_finite(request.closing_amount)?;
    if closing_amount < 0.0 {
        return Err(Error::InvalidAmount {
            amount: closing_amount,
        });
    }
    if let Some(expected) = request.expected_amount {
        money::ensure_finite(expected)?;
    }

    let txn = db.begin().await?;

    let drawer = require_open_drawer(&txn, drawer_id).await?;
    let reconciliation = reconciliation::reconcile_drawer(&txn, &drawer).await?;

    let (expected_amount, difference) = match request.expected_amount {
        Some(shown) => {
            let shown = money::round_cents(shown);
            if (shown - reconciliation.total_expected_cash).abs() >= 0.005 {
                warn!(
                    drawer_id,
                    shown,
                    computed = reconciliation.total_expected_cash,
                    "Expected amount from client differs from computed expected cash"
                );
            }
            (shown, reconciliation::variance(closing_amount, shown))
        }
        None => (
            reconciliation.total_expected_cash,
            reconciliation.variance_for(closing_amount),
        ),
    };

    let denomination_mismatch = request.breakdown.as_ref().and_then(|breakdown| {
        let check = breakdown.check_against(closing_amount);
        check.mismatch
    });
    if let Some(mismatch) = denomination_mismatch {
        warn!(
            drawer_id,
            closing_amount,
            mismatch,
            "Denomination tally does not match counted closing amount"
        );
    }

    let mut active: cash_drawer::ActiveModel = drawer.into();
    active.closing_amount = Set(Some(closing_amount));
    active.expected_amount = Set(Some(expected_amount));
    active.difference = Set(Some(difference));
    active.denomination_breakdown = Set(request.breakdown.as_ref().map(DenominationBreakdown::to_json));
    active.closed_at = Set(Some(chrono::Utc::now()));

    // The filter turns a concurrent close into "no row updated".
    let closed = CashDrawer::update(active)
        .filter(cash_drawer::Column::ClosedAt.is_null())
        .exec(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                Error::validation(format!("Cash drawer {drawer_id} is already closed"))
            }
            other => Error::Database(other),
        })?;

    txn.commit().await?;

    info!(
        drawer_id,
        closing_amount,
        expected_amount,
        difference = %money::format_signed(difference),
        "Cash drawer closed"
    );

    Ok(ClosedDrawer {
        drawer: closed,
        reconciliation,
        denomination_mismatch,
    })
}

/// Loads the nested collections of one drawer.
pub async fn load_drawer_details<C: ConnectionTrait>(
    db: &C,
    drawer: cash_drawer::Model,
) -> Result<DrawerDetails> {
    let cash_drops = movement::drops_for_drawer(db, drawer.id).await?;
    let cash_pickups = movement::pickups_for_drawer(db, drawer.id).await?;
    let shift_notes = note::notes_for_drawer(db, drawer.id).await?;
    let transactions = sale::transaction_ids_for_drawer(db, drawer.id).await?;
    let denomination_total = drawer
        .denomination_breakdown
        .as_ref()
        .map(DenominationBreakdown::from_json)
        .transpose()?
        .map(|breakdown| breakdown.total());

    Ok(DrawerDetails {
        status: DrawerStatus::of(&drawer),
        drawer,
        cash_drops,
        cash_pickups,
        shift_notes,
        transactions,
        denomination_total,
    })
}

/// Lists drawers with their nested collections.
pub async fn list_drawer_details<C: ConnectionTrait>(
    db: &C,
    filter: DrawerFilter,
) -> Result<Vec<DrawerDetails>> {
    let drawers = list_drawers(db, filter).await?;
    let mut details = Vec::with_capacity(drawers.len());
    for drawer in drawers {
        details.push(load_drawer_details(db, drawer).await?);
    }
    Ok(details)
}
