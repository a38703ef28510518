//! Sales attributed to a cash drawer.
//!
//! A sale is a transaction row plus one payment row per tender leg. Only the cash
//! leg of a completed sale moves money into the drawer; card and mobile legs are
//! reported but never counted as cash on hand.

use crate::{
    core::{drawer, employee, money},
    entities::{Payment, Transaction, payment, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Tender method of a payment leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash, the only method that affects the drawer
    Cash,
    /// Credit card
    CreditCard,
    /// Debit card
    DebitCard,
    /// `GCash` e-wallet
    Gcash,
    /// `PayMaya` e-wallet
    Paymaya,
    /// Anything else (vouchers, bank transfer)
    Other,
}

impl PaymentMethod {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::Gcash => "GCASH",
            Self::Paymaya => "PAYMAYA",
            Self::Other => "OTHER",
        }
    }

    /// Credit or debit card.
    #[must_use]
    pub const fn is_card(self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }

    /// `GCash` or `PayMaya`.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Gcash | Self::Paymaya)
    }

    /// Parses a stored method; unknown values read as [`PaymentMethod::Other`].
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(Self::Other)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "DEBIT_CARD" => Ok(Self::DebitCard),
            "GCASH" => Ok(Self::Gcash),
            "PAYMAYA" => Ok(Self::Paymaya),
            "OTHER" => Ok(Self::Other),
            other => Err(Error::validation(format!("Unknown payment method '{other}'"))),
        }
    }
}

/// Lifecycle of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Paid in full; counts towards reconciliation
    #[default]
    Completed,
    /// Still being rung up
    Pending,
    /// Cancelled
    Voided,
}

impl TransactionStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Voided => "VOIDED",
        }
    }
}

/// One tender leg of a new sale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    /// Tender method
    pub method: PaymentMethod,
    /// Amount paid with it
    pub amount: f64,
}

/// A sale to attribute to an open drawer.
#[derive(Debug, Clone)]
pub struct NewSale {
    /// Open drawer receiving the sale
    pub drawer_id: i64,
    /// Employee ringing the sale
    pub employee_id: i64,
    /// Sale total
    pub total_amount: f64,
    /// Tip
    pub tip: f64,
    /// Status, normally completed
    pub status: TransactionStatus,
    /// Tender legs
    pub payments: Vec<NewPayment>,
}

/// A transaction together with its payment legs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// The transaction row
    #[serde(flatten)]
    pub transaction: transaction::Model,
    /// Its payment legs
    pub payments: Vec<payment::Model>,
}

impl SaleRecord {
    /// True when the sale counts towards reconciliation and statistics.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.transaction.status == TransactionStatus::Completed.as_str()
    }

    /// Sum of the legs whose method satisfies `predicate`.
    pub fn leg_total(&self, predicate: impl Fn(PaymentMethod) -> bool) -> f64 {
        self.payments
            .iter()
            .filter(|p| predicate(PaymentMethod::from_stored(&p.method)))
            .map(|p| p.amount)
            .sum()
    }

    /// The cash leg only.
    #[must_use]
    pub fn cash_amount(&self) -> f64 {
        self.leg_total(|m| m == PaymentMethod::Cash)
    }
}

fn validate_sale(sale: &NewSale) -> Result<()> {
    for amount in [sale.total_amount, sale.tip] {
        money::ensure_finite(amount)?;
        if amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if sale.status == TransactionStatus::Completed && sale.payments.is_empty() {
        return Err(Error::validation("A completed sale needs at least one payment"));
    }
    for payment in &sale.payments {
        money::ensure_finite(payment.amount)?;
        if payment.amount <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: payment.amount,
            });
        }
    }
    Ok(())
}

/// Records a sale and its payment legs against an open drawer.
///
/// # Errors
/// * [`Error::Validation`] / [`Error::InvalidAmount`] - bad amounts, missing payments,
///   or the drawer is closed
/// * [`Error::DrawerNotFound`] / [`Error::EmployeeNotFound`]
pub async fn record_sale(db: &DatabaseConnection, sale: NewSale) -> Result<SaleRecord> {
    validate_sale(&sale)?;

    let txn = db.begin().await?;
    drawer::require_open_drawer(&txn, sale.drawer_id).await?;
    employee::require_active_employee(&txn, sale.employee_id).await?;

    let transaction = transaction::ActiveModel {
        drawer_id: Set(Some(sale.drawer_id)),
        employee_id: Set(sale.employee_id),
        total_amount: Set(sale.total_amount),
        tip: Set(sale.tip),
        status: Set(sale.status.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut payments = Vec::with_capacity(sale.payments.len());
    for leg in &sale.payments {
        let payment = payment::ActiveModel {
            transaction_id: Set(transaction.id),
            method: Set(leg.method.as_str().to_string()),
            amount: Set(leg.amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        payments.push(payment);
    }
    txn.commit().await?;

    info!(
        drawer_id = sale.drawer_id,
        transaction_id = transaction.id,
        total = sale.total_amount,
        legs = payments.len(),
        "Sale recorded"
    );
    Ok(SaleRecord {
        transaction,
        payments,
    })
}

/// Loads every sale attributed to any of the given drawers, oldest first.
pub async fn load_sales_for_drawers<C: ConnectionTrait>(
    db: &C,
    drawer_ids: &[i64],
) -> Result<Vec<SaleRecord>> {
    if drawer_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = Transaction::find()
        .filter(transaction::Column::DrawerId.is_in(drawer_ids.iter().copied()))
        .order_by_asc(transaction::Column::Id)
        .find_with_related(Payment)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(transaction, payments)| SaleRecord {
            transaction,
            payments,
        })
        .collect())
}

/// Ids of the transactions attributed to a drawer, oldest first.
pub async fn transaction_ids_for_drawer<C: ConnectionTrait>(
    db: &C,
    drawer_id: i64,
) -> Result<Vec<i64>> {
    Transaction::find()
        .select_only()
        .column(transaction::Column::Id)
        .filter(transaction::Column::DrawerId.eq(drawer_id))
        .order_by_asc(transaction::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "CREDIT_CARD".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CreditCard
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::from_stored("bitcoin"), PaymentMethod::Other);
        assert!(PaymentMethod::DebitCard.is_card());
        assert!(PaymentMethod::Paymaya.is_mobile());
        assert!(!PaymentMethod::Cash.is_card());
    }

    #[tokio::test]
    async fn test_split_sale_cash_leg_only() -> Result<()> {
        let (db, employee, drawer) = setup_with_open_drawer(0.0).await?;
        let sale = record_test_sale(
            &db,
            drawer.id,
            employee.id,
            500.0,
            &[(PaymentMethod::Cash, 300.0), (PaymentMethod::Gcash, 200.0)],
        )
        .await?;

        assert_eq!(sale.payments.len(), 2);
        assert_eq!(sale.cash_amount(), 300.0);
        assert_eq!(sale.leg_total(PaymentMethod::is_mobile), 200.0);
        assert_eq!(sale.leg_total(PaymentMethod::is_card), 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sale_validation() -> Result<()> {
        let (db, employee, drawer) = setup_with_open_drawer(0.0).await?;

        let no_payments = record_sale(
            &db,
            NewSale {
                drawer_id: drawer.id,
                employee_id: employee.id,
                total_amount: 10.0,
                tip: 0.0,
                status: TransactionStatus::Completed,
                payments: vec![],
            },
        )
        .await;
        assert!(matches!(no_payments, Err(Error::Validation { .. })));

        let nan_leg = record_test_sale(
            &db,
            drawer.id,
            employee.id,
            10.0,
            &[(PaymentMethod::Cash, f64::NAN)],
        )
        .await;
        assert!(matches!(nan_leg, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_sale_on_closed_drawer_rejected() -> Result<()> {
        let (db, employee, drawer) = setup_with_open_drawer(0.0).await?;
        close_test_drawer(&db, drawer.id, 0.0).await?;
        let result = record_cash_sale(&db, drawer.id, employee.id, 10.0).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_sales_scoped_to_drawers() -> Result<()> {
        let (db, maria, maria_drawer) = setup_with_open_drawer(0.0).await?;
        let jose = create_test_employee(&db, "Jose").await?;
        let jose_drawer = open_test_drawer(&db, jose.id, 0.0).await?;

        let first = record_cash_sale(&db, maria_drawer.id, maria.id, 10.0).await?;
        record_cash_sale(&db, jose_drawer.id, jose.id, 20.0).await?;
        let second = record_cash_sale(&db, maria_drawer.id, maria.id, 30.0).await?;

        let sales = load_sales_for_drawers(&db, &[maria_drawer.id]).await?;
        assert_eq!(sales, vec![first.clone(), second.clone()]);

        let ids = transaction_ids_for_drawer(&db, maria_drawer.id).await?;
        assert_eq!(ids, vec![first.transaction.id, second.transaction.id]);

        assert!(load_sales_for_drawers(&db, &[]).await?.is_empty());
        Ok(())
    }
}
