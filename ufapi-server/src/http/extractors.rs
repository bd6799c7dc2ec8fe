//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use super::error::ApiError;
use crate::models::UfPayload;

/// UF id from the path.
///
/// An id that is not an integer cannot match any row, so it is
/// answered as not found.
pub struct UfId(pub i64);

impl<S> FromRequestParts<S> for UfId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;

        raw.parse().map(Self).map_err(|_| {
            tracing::warn!(id = %raw, "non-integer UF id");
            ApiError::not_found()
        })
    }
}

/// JSON request body that must be an object.
pub struct UfBody(pub UfPayload);

impl<S> FromRequest<S> for UfBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;

        Ok(Self(UfPayload::from_value(value)?))
    }
}
