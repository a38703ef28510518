//! Read-mostly endpoints: supported denominations, tally and shift history.

use super::{
    AppState,
    extract::{ValidJson, ValidQuery},
};
use crate::{
    config::settings::DenominationConfig,
    core::{
        denomination::{self, DenominationCheck},
        history::{self, DateRange, ShiftFilter, ShiftHistory},
        money::{self, MoneyInput},
    },
    errors::Result,
};
use axum::{
    Json,
    extract::State,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Body of `POST /denominations/tally`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyRequest {
    /// Label to count
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
    /// Counted closing amount to compare with
    pub closing_amount: Option<MoneyInput>,
}

/// Query of `GET /shift-history`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// `today`, `last7days`, `last30days`, `all` or `custom`
    pub range: Option<String>,
    /// First day of a custom range, `YYYY-MM-DD`
    pub start: Option<NaiveDate>,
    /// Last day of a custom range, `YYYY-MM-DD`
    pub end: Option<NaiveDate>,
    /// Only this employee's shifts
    pub employee_id: Option<i64>,
}

/// `GET /denominations`
pub async fn list_denominations(State(state): State<AppState>) -> Json<Vec<DenominationConfig>> {
    Json(state.settings.denominations.clone())
}

/// `POST /denominations/tally`
pub async fn tally_denominations(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TallyRequest>,
) -> Result<Json<DenominationCheck>> {
    let closing_amount = body
        .closing_amount
        .as_ref()
        .map(|input| money::parse_non_negative(Some(input), "closingAmount"))
        .transpose()?;
    let check = denomination::tally(&body.counts, &state.settings.denominations, closing_amount)?;
    Ok(Json(check))
}

/// `GET /shift-history`
pub async fn shift_history(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<HistoryQuery>,
) -> Result<Json<ShiftHistory>> {
    let filter = ShiftFilter {
        range: DateRange::parse(query.range.as_deref(), query.start, query.end)?,
        employee_id: query.employee_id,
    };
    Ok(Json(history::shift_history(&state.db, filter, Utc::now()).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::super::test_support::{send, test_state};
    use crate::{errors::Result, test_utils::*};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_tally_reports_mismatch() -> Result<()> {
        let state = test_state().await?;
        let (status, body) = send(
            &state,
            "POST",
            "/denominations/tally",
            None,
            Some(json!({ "counts": { "1000": 2, "500": 1, "0.25": 4 }, "closingAmount": "2500" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCounted"].as_f64(), Some(2501.0));
        assert_eq!(body["mismatch"].as_f64(), Some(1.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_tally_rejects_unknown_label() -> Result<()> {
        let state = test_state().await?;
        let (status, body) = send(
            &state,
            "POST",
            "/denominations/tally",
            None,
            Some(json!({ "counts": { "3": 1 } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Unsupported"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_denominations() -> Result<()> {
        let state = test_state().await?;
        let (status, body) = send(&state, "GET", "/denominations", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 12);
        assert_eq!(list[0]["kind"], "bill");
        Ok(())
    }

    #[tokio::test]
    async fn test_shift_history_over_http() -> Result<()> {
        let state = test_state().await?;
        let maria = create_test_employee(&state.db, "Maria").await?;
        let drawer = open_test_drawer(&state.db, maria.id, 1000.0).await?;
        record_cash_sale(&state.db, drawer.id, maria.id, 250.0).await?;
        close_test_drawer(&state.db, drawer.id, 1240.0).await?;
        // Still open, never part of history.
        let jose = create_test_employee(&state.db, "Jose").await?;
        open_test_drawer(&state.db, jose.id, 500.0).await?;

        let (status, body) = send(&state, "GET", "/shift-history?range=today", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shifts"].as_array().unwrap().len(), 1);
        assert_eq!(body["summary"]["cashSales"].as_f64(), Some(250.0));
        assert_eq!(body["summary"]["totalDifference"].as_f64(), Some(-10.0));
        assert_eq!(body["summary"]["netShortage"], true);
        assert_eq!(
            body["byEmployee"][maria.id.to_string()]["shiftCount"],
            json!(1)
        );

        let (status, _) = send(&state, "GET", "/shift-history?range=fortnight", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &state,
            "GET",
            "/shift-history?range=custom&start=2024-06-10",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }
}
