//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::BudgetError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &BudgetError) -> StatusCode {
    match err {
        BudgetError::InputInvalid { .. }
        | BudgetError::UnknownScenario { .. }
        | BudgetError::ConfigMissing { .. }
        | BudgetError::ConfigInvalid { .. }
        | BudgetError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        BudgetError::NotFound { .. } => StatusCode::NOT_FOUND,
        BudgetError::Database { .. }
        | BudgetError::DatabaseQuery { .. }
        | BudgetError::Report { .. }
        | BudgetError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<BudgetError> for WebError {
    fn from(err: BudgetError) -> Self {
        let status = status_from_error(&err);
        if status.is_server_error() {
            log::error!("request failed: {err}");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let template = super::templates::ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, template.fragment()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status() {
        assert_eq!(
            status_from_error(&BudgetError::input("rent", "too high")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_from_error(&BudgetError::UnknownScenario {
                kind: "x".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_from_error(&BudgetError::NotFound {
                what: "calculation #3".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_from_error(&BudgetError::DatabaseQuery {
                reason: "locked".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn web_error_keeps_message() {
        let err = WebError::from(BudgetError::input("tuition", "is required"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("tuition"));
    }
}
