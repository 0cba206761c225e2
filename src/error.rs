use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::auth::AuthError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid password")] InvalidCredentials,
    #[error("unauthorized")] Unauthorized,
    #[error("recipe not found")] RecipeNotFound,
    #[error("not found")] NotFound,
    #[error("{0}")] BadRequest(String),
    #[error("save failed")] PersistenceFailure,
    #[error("internal error")] Internal,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::RecipeNotFound(_) => ApiError::RecipeNotFound,
            StoreError::Io { .. } | StoreError::Serialize(_) | StoreError::Protected(_) => ApiError::PersistenceFailure,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RecipeNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PersistenceFailure | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // login and save failures carry the success flag the client checks
        let success = matches!(self, ApiError::InvalidCredentials | ApiError::PersistenceFailure).then_some(false);
        HttpResponse::build(self.status_code()).json(ApiErrorBody { success, error: self.to_string() })
    }
}
