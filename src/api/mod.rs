//! HTTP interface - axum router, shared state and request extractors.
//!
//! Handlers stay thin: they parse the request, call into [`crate::core`] and return
//! JSON. Every failure is a [`crate::errors::Error`] converted by [`error`].

/// Cash drawer lifecycle endpoints
pub mod drawers;
/// Customer display endpoints
pub mod display;
/// Employee endpoints
pub mod employees;
/// Error to response mapping
pub mod error;
/// Extractors that reject with the JSON error body
pub mod extract;
/// Shift history and denomination endpoints
pub mod reports;
/// Sale attribution endpoint
pub mod sales;

use crate::{config::settings::Settings, core::display::DisplayChannel, errors::Error};
use axum::{
    Router,
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Header carrying the id of the employee performing the request.
pub const EMPLOYEE_HEADER: &str = "x-employee-id";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Customer display channel
    pub display: DisplayChannel,
}

impl AppState {
    /// Creates the state; the display channel takes its TTL from the settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Arc<Settings>) -> Self {
        let display = DisplayChannel::new(settings.display.event_ttl_secs);
        Self {
            db,
            settings,
            display,
        }
    }
}

fn employee_from_header(parts: &Parts) -> Result<Option<i64>, Error> {
    let Some(value) = parts.headers.get(EMPLOYEE_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| Error::validation(format!("{EMPLOYEE_HEADER} must be an employee id")))
}

/// The employee performing a mutating request. Required.
#[derive(Debug, Clone, Copy)]
pub struct ActingEmployee(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ActingEmployee {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        employee_from_header(parts)?
            .map(Self)
            .ok_or_else(|| Error::validation(format!("{EMPLOYEE_HEADER} header is required")))
    }
}

/// The employee scope of a read request, if the header was sent.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeScope(pub Option<i64>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for EmployeeScope {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        employee_from_header(parts).map(Self)
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/cash-drawers",
            get(drawers::list_drawers).post(drawers::open_drawer),
        )
        .route("/cash-drawers/:id", get(drawers::get_drawer))
        .route(
            "/cash-drawers/:id/reconciliation",
            get(drawers::get_reconciliation),
        )
        .route("/cash-drawers/:id/close", post(drawers::close_drawer))
        .route("/cash-drawers/:id/cash-drops", post(drawers::add_cash_drop))
        .route(
            "/cash-drawers/:id/cash-pickups",
            post(drawers::add_cash_pickup),
        )
        .route(
            "/cash-drawers/:id/shift-notes",
            post(drawers::add_shift_note),
        )
        .route("/denominations", get(reports::list_denominations))
        .route("/denominations/tally", post(reports::tally_denominations))
        .route("/shift-history", get(reports::shift_history))
        .route("/transactions", post(sales::record_sale))
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/:id/deactivate",
            post(employees::deactivate_employee),
        )
        .route("/display/events", post(display::publish_event))
        .route("/display/events/latest", get(display::latest_event))
        .route("/display/events/next", get(display::next_event))
        .route("/display/events/:id/ack", post(display::ack_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Result, test_utils::setup_test_db};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn test_state() -> Result<AppState> {
        let db = setup_test_db().await?;
        Ok(AppState::new(db, Arc::new(Settings::default())))
    }

    pub async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        employee: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = employee {
            builder = builder.header(EMPLOYEE_HEADER, id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
