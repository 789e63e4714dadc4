use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error answers of the catalog and watch endpoints.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    MethodNotAllowed(&'static str),
    /// Store failure reported as `{ error: context, message }`.
    Internal { context: &'static str, message: String },
    /// Store failure reported as `{ error: "Error interno del servidor", details }`.
    Server(String),
}

pub const SERVER_ERROR: &str = "Error interno del servidor";

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(context: &'static str) -> impl FnOnce(crate::error::PlaygroundError) -> Self {
        move |e| ApiError::Internal {
            context,
            message: e.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } | ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(error) | ApiError::NotFound(error) | ApiError::Conflict(error) => {
                ErrorBody {
                    error,
                    message: None,
                    details: None,
                }
            }
            ApiError::MethodNotAllowed(error) => ErrorBody {
                error: error.to_string(),
                message: None,
                details: None,
            },
            ApiError::Internal { context, message } => ErrorBody {
                error: context.to_string(),
                message: Some(message),
                details: None,
            },
            ApiError::Server(details) => ErrorBody {
                error: SERVER_ERROR.to_string(),
                message: None,
                details: Some(details),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaygroundError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::MethodNotAllowed("Method not allowed").status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::Server("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_carries_context_and_message() {
        let err = ApiError::internal("Error al agregar video")(PlaygroundError::Store(
            "disk full".into(),
        ));
        match err {
            ApiError::Internal { context, message } => {
                assert_eq!(context, "Error al agregar video");
                assert_eq!(message, "Store error: disk full");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_body_skips_absent_fields() {
        let body = ErrorBody {
            error: "Video no encontrado".into(),
            message: None,
            details: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Video no encontrado"}"#
        );
    }
}
