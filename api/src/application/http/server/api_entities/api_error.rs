use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dachef_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "E_BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "E_NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "E_CONFLICT"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "E_BAD_GATEWAY"),
            ApiError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL_SERVER_ERROR")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let message = error.to_string();

        if error.is_user_input() {
            return ApiError::BadRequest(message);
        }

        match error {
            CoreError::Detection(_) => ApiError::BadRequest(message),
            CoreError::InvalidTransition { .. } => ApiError::Conflict(message),
            CoreError::RecipeParse(_) | CoreError::ExternalServiceError(_) => {
                ApiError::BadGateway(message)
            }
            CoreError::SessionNotFound | CoreError::NotFound => ApiError::NotFound(message),
            _ => ApiError::InternalServerError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ApiErrorResponse {
            code: code.to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor that also runs `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(ValidateJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use dachef_core::domain::workflow::entities::{WorkflowAction, WorkflowStage};

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn user_input_errors_are_bad_requests() {
        for error in [
            CoreError::NoImageSelected,
            CoreError::EmptySelection,
            CoreError::UnknownItem("Egg".to_string()),
        ] {
            assert!(error.is_user_input());
            assert!(matches!(ApiError::from(error), ApiError::BadRequest(_)));
        }
    }

    #[test]
    fn core_errors_map_to_status_codes() {
        let cases = [
            (
                CoreError::InvalidTransition {
                    from: WorkflowStage::AwaitingImage,
                    action: WorkflowAction::Confirm,
                },
                StatusCode::CONFLICT,
            ),
            (CoreError::RecipeParse("eof".to_string()), StatusCode::BAD_GATEWAY),
            (CoreError::SessionNotFound, StatusCode::NOT_FOUND),
            (CoreError::NotFound, StatusCode::NOT_FOUND),
            (
                CoreError::PartialWrite { failed: 1, total: 3 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CoreError::ObjectStorageError("denied".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn message_comes_from_the_core_error() {
        assert_eq!(
            ApiError::from(CoreError::PartialWrite { failed: 1, total: 3 }),
            ApiError::InternalServerError("1 of 3 writes failed".to_string())
        );
    }

    #[tokio::test]
    async fn validate_json_accepts_valid_body() {
        let ValidateJson(named) = ValidateJson::<Named>::from_request(json_request(r#"{"name":"Soup"}"#), &())
            .await
            .unwrap();

        assert_eq!(named.name, "Soup");
    }

    #[tokio::test]
    async fn validate_json_rejects_rule_violations() {
        let result = ValidateJson::<Named>::from_request(json_request(r#"{"name":""}"#), &()).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn validate_json_rejects_malformed_body() {
        let result = ValidateJson::<Named>::from_request(json_request("{"), &()).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
