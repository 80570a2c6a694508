use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::reference::ReferenceError;

/// Every way a request can fail, mapped to a status at the endpoint boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required field or a body that does not parse
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A foreign reference was rejected by its owner, or the owner was down
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Falha ao acessar o banco de dados: {0}")]
    Store(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Store(format!("{e:#}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body: `{"erro": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub erro: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            erro: message.to_string(),
        }
    }
}

/// Body returned by successful deletes: `{"mensagem": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            mensagem: message.into(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Reference(ReferenceError::Rejected { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Reference(ReferenceError::Unreachable { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Reference(ReferenceError::Unreachable {
                dependency, reason, ..
            }) => warn!("Dependency {} unreachable: {}", dependency, reason),
            ApiError::Store(message) => error!("{}", message),
            _ => {}
        }

        let status = self.status();
        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}
