//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    config::settings::default_denominations,
    core::{
        denomination::DenominationBreakdown,
        drawer::{self, CloseDrawer},
        employee,
        money::MoneyInput,
        sale::{self, NewPayment, NewSale, PaymentMethod, SaleRecord, TransactionStatus},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an active cashier with the given name.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, name, "cashier").await
}

/// Opens a drawer for an existing employee.
pub async fn open_test_drawer(
    db: &DatabaseConnection,
    employee_id: i64,
    opening_amount: f64,
) -> Result<entities::cash_drawer::Model> {
    drawer::open_drawer(db, employee_id, Some(&MoneyInput::from(opening_amount))).await
}

/// Closes a drawer with a counted amount, letting the service compute the expected cash.
pub async fn close_test_drawer(
    db: &DatabaseConnection,
    drawer_id: i64,
    closing_amount: f64,
) -> Result<entities::cash_drawer::Model> {
    let closed = drawer::close_drawer(
        db,
        drawer_id,
        CloseDrawer {
            closing_amount,
            ..Default::default()
        },
    )
    .await?;
    Ok(closed.drawer)
}

/// Sets up a database with one employee ("Maria") holding an open drawer.
/// Returns (db, employee, drawer) for common test scenarios.
pub async fn setup_with_open_drawer(
    opening_amount: f64,
) -> Result<(
    DatabaseConnection,
    entities::employee::Model,
    entities::cash_drawer::Model,
)> {
    let db = setup_test_db().await?;
    let employee = create_test_employee(&db, "Maria").await?;
    let drawer = open_test_drawer(&db, employee.id, opening_amount).await?;
    Ok((db, employee, drawer))
}

/// Records a completed sale with the given payment legs and no tip.
pub async fn record_test_sale(
    db: &DatabaseConnection,
    drawer_id: i64,
    employee_id: i64,
    total_amount: f64,
    legs: &[(PaymentMethod, f64)],
) -> Result<SaleRecord> {
    sale::record_sale(
        db,
        NewSale {
            drawer_id,
            employee_id,
            total_amount,
            tip: 0.0,
            status: TransactionStatus::Completed,
            payments: legs
                .iter()
                .map(|(method, amount)| NewPayment {
                    method: *method,
                    amount: *amount,
                })
                .collect(),
        },
    )
    .await
}

/// Records a completed sale paid entirely in cash.
pub async fn record_cash_sale(
    db: &DatabaseConnection,
    drawer_id: i64,
    employee_id: i64,
    amount: f64,
) -> Result<SaleRecord> {
    record_test_sale(db, drawer_id, employee_id, amount, &[(PaymentMethod::Cash, amount)]).await
}

/// Records a cash sale with an explicit status.
pub async fn record_sale_with_status(
    db: &DatabaseConnection,
    drawer_id: i64,
    employee_id: i64,
    amount: f64,
    status: TransactionStatus,
) -> Result<SaleRecord> {
    sale::record_sale(
        db,
        NewSale {
            drawer_id,
            employee_id,
            total_amount: amount,
            tip: 0.0,
            status,
            payments: vec![NewPayment {
                method: PaymentMethod::Cash,
                amount,
            }],
        },
    )
    .await
}

/// Builds a validated breakdown against the default denominations.
pub fn test_breakdown(pairs: &[(&str, u32)]) -> Result<DenominationBreakdown> {
    let counts: BTreeMap<String, u32> = pairs
        .iter()
        .map(|(label, count)| ((*label).to_string(), *count))
        .collect();
    DenominationBreakdown::from_counts(&counts, &default_denominations())
}
