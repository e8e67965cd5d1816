//! API error types and their JSON bodies.
//!
//! General errors render as `{"error": "<message>"}`; field validation
//! errors as `{"<field>": ["<message>"]}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::accounts::AccountError;
use crate::blood_requests::BloodRequestError;
use crate::core_state::CoreError;
use crate::donors::DonorError;

pub const UNAUTHORIZED_MESSAGE: &str = "Authentication credentials were not provided.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Notification failed: {0}")]
    Notification(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Notification(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Unauthorized => error_body(UNAUTHORIZED_MESSAGE),
            ApiError::InvalidCredentials => error_body("Invalid Credentials"),
            ApiError::Forbidden => error_body(FORBIDDEN_MESSAGE),
            ApiError::NotFound(detail) | ApiError::BadRequest(detail) => error_body(detail),
            ApiError::Validation { field, message } => {
                let mut fields = Map::new();
                fields.insert((*field).to_string(), json!([message]));
                Value::Object(fields)
            }
            ApiError::Notification(detail) => {
                tracing::error!(detail, "Activation notice failed");
                error_body("Failed to send confirmation email.")
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                error_body("An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<BloodRequestError> for ApiError {
    fn from(err: BloodRequestError) -> Self {
        match err {
            BloodRequestError::NotFound(_) | BloodRequestError::DonationNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            BloodRequestError::SelfAcceptance => ApiError::BadRequest(err.to_string()),
            BloodRequestError::Validation { field, message } => {
                ApiError::Validation { field, message }
            }
            BloodRequestError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation { field, message } => ApiError::Validation { field, message },
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::InvalidActivation => ApiError::BadRequest(err.to_string()),
            AccountError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            AccountError::Forbidden => ApiError::Forbidden,
            AccountError::NotificationFailed(detail) => ApiError::Notification(detail),
            AccountError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DonorError> for ApiError {
    fn from(err: DonorError) -> Self {
        match err {
            DonorError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DonorError::Forbidden => ApiError::Forbidden,
            DonorError::AlreadyExists => ApiError::BadRequest(err.to_string()),
            DonorError::Validation { field, message } => ApiError::Validation { field, message },
            DonorError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401_with_message() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn validation_uses_field_keyed_list() {
        let response = ApiError::Validation {
            field: "email",
            message: "Email already exists.".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"email": ["Email already exists."]}));
    }

    #[tokio::test]
    async fn self_acceptance_maps_to_400() {
        let response = ApiError::from(BloodRequestError::SelfAcceptance).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "You cannot accept your own request."})
        );
    }

    #[tokio::test]
    async fn missing_request_maps_to_404() {
        let response = ApiError::from(BloodRequestError::NotFound(3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn profile_not_found_message() {
        let err = AccountError::NotFound {
            entity: "UserProfile",
            id: 1,
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "UserProfile not found.");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn notification_failure_is_500_with_fixed_message() {
        let response =
            ApiError::from(AccountError::NotificationFailed("smtp".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to send confirmation email.");
    }

    #[tokio::test]
    async fn forbidden_is_403() {
        let response = ApiError::from(DonorError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], FORBIDDEN_MESSAGE);
    }
}
