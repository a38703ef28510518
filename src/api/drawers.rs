//! Cash drawer endpoints.

use super::{
    ActingEmployee, AppState, EmployeeScope,
    extract::{ValidJson, ValidPath, ValidQuery},
};
use crate::{
    core::{
        denomination::DenominationBreakdown,
        drawer::{self, CloseDrawer, DrawerDetails, DrawerFilter, DrawerStatus},
        money::{self, MoneyInput},
        movement, note,
        reconciliation::{self, Reconciliation},
    },
    entities::{cash_drop, cash_pickup, shift_note},
    errors::Result,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query of `GET /cash-drawers`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `open` or `closed`
    pub status: Option<DrawerStatus>,
}

/// Body of `POST /cash-drawers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    /// Float placed in the drawer
    pub opening_amount: Option<MoneyInput>,
}

/// Body of `POST /cash-drawers/:id/close`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRequest {
    /// Cash counted
    pub closing_amount: Option<MoneyInput>,
    /// Expected cash the cashier was shown
    pub expected_amount: Option<MoneyInput>,
    /// Label to count
    pub denomination_breakdown: Option<BTreeMap<String, u32>>,
}

/// Response of a close.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseResponse {
    #[serde(flatten)]
    drawer: DrawerDetails,
    reconciliation: Reconciliation,
    denomination_mismatch: Option<f64>,
}

/// Body of the cash drop and pickup endpoints.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    /// Amount moved
    pub amount: Option<MoneyInput>,
    /// Why
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /cash-drawers/:id/shift-notes`.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    /// Note text
    #[serde(default)]
    pub note: String,
}

/// `GET /cash-drawers`
pub async fn list_drawers(
    State(state): State<AppState>,
    EmployeeScope(employee_id): EmployeeScope,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Vec<DrawerDetails>>> {
    let filter = DrawerFilter {
        employee_id,
        status: query.status,
    };
    Ok(Json(drawer::list_drawer_details(&state.db, filter).await?))
}

/// `GET /cash-drawers/:id`
pub async fn get_drawer(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<DrawerDetails>> {
    let found = drawer::require_drawer(&state.db, id).await?;
    Ok(Json(drawer::load_drawer_details(&state.db, found).await?))
}

/// `GET /cash-drawers/:id/reconciliation` - live cash position, open or closed.
pub async fn get_reconciliation(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Reconciliation>> {
    let found = drawer::require_drawer(&state.db, id).await?;
    Ok(Json(reconciliation::reconcile_drawer(&state.db, &found).await?))
}

/// `POST /cash-drawers`
pub async fn open_drawer(
    State(state): State<AppState>,
    ActingEmployee(employee_id): ActingEmployee,
    ValidJson(body): ValidJson<OpenRequest>,
) -> Result<(StatusCode, Json<DrawerDetails>)> {
    let opened = drawer::open_drawer(&state.db, employee_id, body.opening_amount.as_ref()).await?;
    let details = drawer::load_drawer_details(&state.db, opened).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// `POST /cash-drawers/:id/close`
pub async fn close_drawer(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<CloseRequest>,
) -> Result<Json<CloseResponse>> {
    let closing_amount = money::parse_non_negative(body.closing_amount.as_ref(), "closingAmount")?;
    let expected_amount = body
        .expected_amount
        .as_ref()
        .map(|input| money::parse_amount(Some(input), "expectedAmount"))
        .transpose()?;
    let breakdown = body
        .denomination_breakdown
        .as_ref()
        .map(|counts| DenominationBreakdown::from_counts(counts, &state.settings.denominations))
        .transpose()?;

    let closed = drawer::close_drawer(
        &state.db,
        id,
        CloseDrawer {
            closing_amount,
            expected_amount,
            breakdown,
        },
    )
    .await?;

    Ok(Json(CloseResponse {
        drawer: drawer::load_drawer_details(&state.db, closed.drawer).await?,
        reconciliation: closed.reconciliation,
        denomination_mismatch: closed.denomination_mismatch,
    }))
}

/// `POST /cash-drawers/:id/cash-drops`
pub async fn add_cash_drop(
    State(state): State<AppState>,
    ActingEmployee(employee_id): ActingEmployee,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<MovementRequest>,
) -> Result<(StatusCode, Json<cash_drop::Model>)> {
    let drop =
        movement::add_cash_drop(&state.db, id, body.amount.as_ref(), &body.reason, employee_id)
            .await?;
    Ok((StatusCode::CREATED, Json(drop)))
}

/// `POST /cash-drawers/:id/cash-pickups`
pub async fn add_cash_pickup(
    State(state): State<AppState>,
    ActingEmployee(employee_id): ActingEmployee,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<MovementRequest>,
) -> Result<(StatusCode, Json<cash_pickup::Model>)> {
    let pickup =
        movement::add_cash_pickup(&state.db, id, body.amount.as_ref(), &body.reason, employee_id)
            .await?;
    Ok((StatusCode::CREATED, Json(pickup)))
}

/// `POST /cash-drawers/:id/shift-notes`
pub async fn add_shift_note(
    State(state): State<AppState>,
    ActingEmployee(employee_id): ActingEmployee,
    ValidPath(id): ValidPath<i64>,
    ValidJson(body): ValidJson<NoteRequest>,
) -> Result<(StatusCode, Json<shift_note::Model>)> {
    let note = note::add_shift_note(&state.db, id, &body.note, employee_id).await?;
    Ok((StatusCode::CREATED, Json(note)))
}
