//! Employee endpoints.

use super::{
    AppState,
    extract::{ValidJson, ValidPath},
};
use crate::{core::employee, entities::employee::Model, errors::Result};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Body of `POST /employees`.
#[derive(Debug, Deserialize)]
pub struct NewEmployeeRequest {
    /// Display name, unique
    #[serde(default)]
    pub name: String,
    /// Defaults to `cashier`
    pub role: Option<String>,
}

/// `GET /employees` - active employees by name.
pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Model>>> {
    Ok(Json(employee::get_active_employees(&state.db).await?))
}

/// `POST /employees`
pub async fn create_employee(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewEmployeeRequest>,
) -> Result<(StatusCode, Json<Model>)> {
    let role = body.role.as_deref().unwrap_or("cashier");
    let created = employee::create_employee(&state.db, &body.name, role).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /employees/:id/deactivate`
pub async fn deactivate_employee(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Model>> {
    Ok(Json(employee::deactivate_employee(&state.db, id).await?))
}
