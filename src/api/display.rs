//! Customer display endpoints. The display short-polls `latest` and acknowledges
//! what it has shown.

use super::{
    AppState,
    extract::{ValidJson, ValidPath, ValidQuery},
};
use crate::{
    core::display::{DisplayEvent, DisplayPayload},
    errors::Result,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_WAIT_SECS: u64 = 25;
const MAX_WAIT_SECS: u64 = 60;

/// Query of `GET /display/events/next`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuery {
    /// Last event id the display has seen
    pub after: Option<u64>,
    /// How long to hold the request open, capped at a minute
    pub timeout_secs: Option<u64>,
}

/// `POST /display/events`
pub async fn publish_event(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<DisplayPayload>,
) -> Result<(StatusCode, Json<DisplayEvent>)> {
    let event = state.display.publish(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /display/events/latest` - 204 when nothing is pending.
pub async fn latest_event(State(state): State<AppState>) -> Response {
    match state.display.latest(Utc::now()).await {
        Some(event) => Json(event).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `GET /display/events/next` - long poll, 204 when nothing newer arrived in time.
pub async fn next_event(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NextQuery>,
) -> Response {
    let wait = Duration::from_secs(
        query
            .timeout_secs
            .unwrap_or(DEFAULT_WAIT_SECS)
            .min(MAX_WAIT_SECS),
    );
    match state.display.next_after(query.after, wait).await {
        Some(event) => Json(event).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `POST /display/events/:id/ack`
pub async fn ack_event(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<StatusCode> {
    state.display.ack(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::super::test_support::{send, test_state};
    use crate::errors::Result;
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_publish_poll_ack() -> Result<()> {
        let state = test_state().await?;

        let (status, body) = send(&state, "GET", "/display/events/latest", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, event) = send(
            &state,
            "POST",
            "/display/events",
            None,
            Some(json!({
                "type": "pendingPayment",
                "total": 450,
                "tendered": 500,
                "change": 50,
                "method": "CASH"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = event["id"].as_u64().unwrap();

        let (status, latest) = send(&state, "GET", "/display/events/latest", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["payload"]["type"], "pendingPayment");
        assert_eq!(latest["payload"]["change"].as_f64(), Some(50.0));

        let (status, _) = send(&state, "POST", &format!("/display/events/{}/ack", id + 1), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&state, "POST", &format!("/display/events/{id}/ack"), None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&state, "GET", "/display/events/latest", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        Ok(())
    }

    #[tokio::test]
    async fn test_long_poll_returns_newer_event() -> Result<()> {
        let state = test_state().await?;
        let (_, event) = send(
            &state,
            "POST",
            "/display/events",
            None,
            Some(json!({ "type": "pendingOrder", "items": [], "subtotal": 80, "total": 80 })),
        )
        .await;
        let id = event["id"].as_u64().unwrap();

        let (status, body) = send(&state, "GET", "/display/events/next?after=0", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"].as_u64(), Some(id));

        let (status, _) = send(
            &state,
            "GET",
            &format!("/display/events/next?after={id}&timeoutSecs=0"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() -> Result<()> {
        let state = test_state().await?;
        let (status, _) = send(
            &state,
            "POST",
            "/display/events",
            None,
            Some(json!({ "type": "pendingOrder", "items": [], "subtotal": -1, "total": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }
}
