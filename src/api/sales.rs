//! Sale attribution endpoint.

use super::{ActingEmployee, AppState, extract::ValidJson};
use crate::{
    core::{
        money::{self, MoneyInput},
        sale::{self, NewPayment, NewSale, SaleRecord, TransactionStatus},
    },
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Body of `POST /transactions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Open drawer receiving the sale
    pub drawer_id: i64,
    /// Sale total
    pub total_amount: Option<MoneyInput>,
    /// Tip, zero when absent
    pub tip: Option<MoneyInput>,
    /// Defaults to completed
    #[serde(default)]
    pub status: TransactionStatus,
    /// Tender legs
    #[serde(default)]
    pub payments: Vec<NewPayment>,
}

/// `POST /transactions`
pub async fn record_sale(
    State(state): State<AppState>,
    ActingEmployee(employee_id): ActingEmployee,
    ValidJson(body): ValidJson<SaleRequest>,
) -> Result<(StatusCode, Json<SaleRecord>)> {
    let total_amount = money::parse_non_negative(body.total_amount.as_ref(), "totalAmount")?;
    let tip = match body.tip.as_ref() {
        Some(input) => money::parse_non_negative(Some(input), "tip")?,
        None => 0.0,
    };

    let record = sale::record_sale(
        &state.db,
        NewSale {
            drawer_id: body.drawer_id,
            employee_id,
            total_amount,
            tip,
            status: body.status,
            payments: body.payments,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}
