//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. On top of the generated tables a partial
//! unique index guarantees that an employee never has two open drawers at once, even when
//! two open requests race past the application-level check.

use crate::entities::{CashDrawer, CashDrop, CashPickup, Employee, Payment, ShiftNote, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://cash_drawer.sqlite?mode=rwc";

/// Partial unique index backing the one-open-drawer-per-employee invariant.
const ONE_OPEN_DRAWER_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_cash_drawers_one_open_per_employee ON cash_drawers (employee_id) \
     WHERE closed_at IS NULL";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!(url = %database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()> {
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables (parents before children) and the open-drawer index.
///
/// Safe to call on every start: existing tables and the index are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Employee).await?;
    create_table(db, &schema, CashDrawer).await?;
    create_table(db, &schema, CashDrop).await?;
    create_table(db, &schema, CashPickup).await?;
    create_table(db, &schema, ShiftNote).await?;
    create_table(db, &schema, Transaction).await?;
    create_table(db, &schema, Payment).await?;

    db.execute_unprepared(ONE_OPEN_DRAWER_INDEX).await?;

    Ok(())
}
