//! Maps [`Error`] onto HTTP responses.
//!
//! The body is always `{ "error": <kind>, "message": <text> }` so the front end can
//! show the message in a toast without parsing status codes.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl Error {
    /// HTTP status and machine-readable kind for this error.
    #[must_use]
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => {
                (StatusCode::BAD_REQUEST, "validation")
            }
            Self::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            Self::DrawerNotFound { .. }
            | Self::EmployeeNotFound { .. }
            | Self::DisplayEventNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            _ if self.is_unavailable() => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            if status == StatusCode::SERVICE_UNAVAILABLE {
                "Database is unavailable, please retry".to_string()
            } else {
                "Internal server error".to_string()
            }
        } else {
            info!(error = %self, "Request rejected");
            self.to_string()
        };
        (
            status,
            Json(ErrorBody {
                error: kind,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, RuntimeErr};

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::validation("x").status().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidAmount { amount: -1.0 }.status().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Conflict {
                message: "race".to_string()
            }
            .status()
            .0,
            StatusCode::CONFLICT
        );
        assert_eq!(Error::DrawerNotFound { id: 1 }.status().0, StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Database(DbErr::Conn(RuntimeErr::Internal("down".to_string())))
                .status()
                .0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::Database(DbErr::Custom("boom".to_string())).status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
