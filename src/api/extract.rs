use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::model::Id;

/// Raw JSON request body.
///
/// Rejections (wrong content type, syntax errors) come back as a 400 in the
/// `{"erro": ...}` shape instead of axum's plain-text default.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::Validation(format!(
                "Corpo da requisição inválido: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Record id from the `:id` path segment.
///
/// A segment that is not an integer cannot name a record, so it is a 404.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub Id);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Id>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RecordId(id)),
            Err(_) => Err(ApiError::NotFound("Recurso não encontrado".to_string())),
        }
    }
}

/// Message for a create body that lacks required fields
pub fn missing_fields_message(fields: &[&str]) -> String {
    match fields {
        [single] => format!("Campo '{}' é obrigatório", single),
        _ => format!("Campos obrigatórios: {}", fields.join(", ")),
    }
}

/// Reject a create body unless every required key is present and non-null.
///
/// A key sent as `null` counts as missing, even though the key itself is in
/// the body: a null required field could never be stored.
pub fn require_fields(body: &Value, fields: &[&str]) -> Result<(), ApiError> {
    let complete = body.as_object().is_some_and(|object| {
        fields
            .iter()
            .all(|field| object.get(*field).is_some_and(|value| !value.is_null()))
    });

    if complete {
        Ok(())
    } else {
        Err(ApiError::Validation(missing_fields_message(fields)))
    }
}

/// Deserialize a body into its typed payload
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("Corpo da requisição inválido: {}", e)))
}
