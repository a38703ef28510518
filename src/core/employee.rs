//! Employee business logic - lookups and seeding from configuration.

use crate::{
    config::settings::EmployeeConfig,
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates an active employee, rejecting blank names. A name already taken is
/// [`Error::Conflict`].
pub async fn create_employee(
    db: &DatabaseConnection,
    name: &str,
    role: &str,
) -> Result<employee::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Employee name cannot be empty"));
    }

    let employee = employee::ActiveModel {
        name: Set(name.to_string()),
        role: Set(role.trim().to_string()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    employee
        .insert(db)
        .await
        .map_err(|e| Error::conflict_on_unique(e, &format!("Employee '{name}' already exists")))
}

/// Finds an employee by id regardless of status.
pub async fn get_employee_by_id<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the employee if it exists and is active.
pub async fn require_active_employee<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
) -> Result<employee::Model> {
    get_employee_by_id(db, employee_id)
        .await?
        .filter(|e| e.is_active)
        .ok_or(Error::EmployeeNotFound { id: employee_id })
}

/// All active employees ordered by name.
pub async fn get_active_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::IsActive.eq(true))
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks an employee inactive; existing drawers are untouched.
pub async fn deactivate_employee(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<employee::Model> {
    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or(Error::EmployeeNotFound { id: employee_id })?;
    let mut active: employee::ActiveModel = existing.into();
    active.is_active = Set(false);
    Ok(active.update(db).await?)
}

/// Inserts configured employees that do not exist yet (matched by name).
/// Returns how many were created.
pub async fn seed_employees(db: &DatabaseConnection, employees: &[EmployeeConfig]) -> Result<usize> {
    let mut created = 0;
    for config in employees {
        let exists = Employee::find()
            .filter(employee::Column::Name.eq(config.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            create_employee(db, &config.name, &config.role).await?;
            created += 1;
        }
    }
    info!(created, configured = employees.len(), "Employee seeding complete");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_employee_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_employee(&db, "   ", "cashier").await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_employees_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let configs = vec![
            EmployeeConfig {
                name: "Maria".to_string(),
                role: "cashier".to_string(),
            },
            EmployeeConfig {
                name: "Jose".to_string(),
                role: "manager".to_string(),
            },
        ];

        assert_eq!(seed_employees(&db, &configs).await?, 2);
        assert_eq!(seed_employees(&db, &configs).await?, 0);

        let employees = get_active_employees(&db).await?;
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].name, "Jose");
        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_employee_is_not_required_active() -> Result<()> {
        let db = setup_test_db().await?;
        let employee = create_test_employee(&db, "Ana").await?;
        deactivate_employee(&db, employee.id).await?;

        let result = require_active_employee(&db, employee.id).await;
        assert!(matches!(result, Err(Error::EmployeeNotFound { .. })));

        let missing = require_active_employee(&db, 999).await;
        assert!(matches!(missing, Err(Error::EmployeeNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_employee(&db, "Maria").await?;
        let result = create_employee(&db, " Maria ", "manager").await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        Ok(())
    }
}
