//! UF endpoints
//!
//! | route                | handler             |
//! |----------------------|---------------------|
//! | `GET    /ufs/`       | `list_ufs`          |
//! | `POST   /ufs/`       | `create_uf`         |
//! | `GET    /ufs/{id}/`  | `retrieve_uf`       |
//! | `PUT    /ufs/{id}/`  | `update_uf`         |
//! | `PATCH  /ufs/{id}/`  | `partial_update_uf` |
//! | `DELETE /ufs/{id}/`  | `destroy_uf`        |

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::http::error::ApiError;
use crate::http::extractors::{UfBody, UfId};
use crate::http::server::AppState;
use crate::models::{FederativeUnit, UfChanges};

const LIST_FAILED: &str = "Erro ao listar UFs.";
const CREATE_FAILED: &str = "Erro interno ao criar UF.";
const RETRIEVE_FAILED: &str = "Erro ao buscar UF.";
const DESTROY_FAILED: &str = "Erro ao deletar UF.";
const NOTHING_UPDATED: &str = "UF não encontrada ou nenhum dado alterado.";

/// PUT and PATCH differ only in validation and wording.
#[derive(Debug, Clone, Copy)]
enum UpdateKind {
    Full,
    Partial,
}

impl UpdateKind {
    fn failed(self) -> &'static str {
        match self {
            Self::Full => "Erro interno ao atualizar UF.",
            Self::Partial => "Erro interno ao atualizar UF parcialmente.",
        }
    }

    fn vanished(self) -> &'static str {
        match self {
            Self::Full => "UF atualizada, mas não pôde ser recuperada.",
            Self::Partial => "UF atualizada parcialmente, mas não pôde ser recuperada.",
        }
    }
}

/// GET /ufs/ - every UF ordered by name
async fn list_ufs(State(state): State<AppState>) -> Result<Json<Vec<FederativeUnit>>, ApiError> {
    let ufs = state
        .store
        .list_all()
        .await
        .map_err(ApiError::store(LIST_FAILED))?;
    Ok(Json(ufs))
}

/// POST /ufs/ - create a UF
async fn create_uf(
    State(state): State<AppState>,
    UfBody(payload): UfBody,
) -> Result<(StatusCode, Json<FederativeUnit>), ApiError> {
    let new = payload.into_new()?;
    let uf = state
        .store
        .create(new)
        .await
        .map_err(ApiError::store(CREATE_FAILED))?;

    Ok((StatusCode::CREATED, Json(uf)))
}

/// GET /ufs/{id}/ - a single UF
async fn retrieve_uf(
    State(state): State<AppState>,
    UfId(id): UfId,
) -> Result<Json<FederativeUnit>, ApiError> {
    state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(RETRIEVE_FAILED))?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// PUT /ufs/{id}/ - replace every field
async fn update_uf(
    State(state): State<AppState>,
    UfId(id): UfId,
    UfBody(payload): UfBody,
) -> Result<Response, ApiError> {
    let changes = UfChanges::from(payload.into_new()?);
    apply_update(&state, id, changes, UpdateKind::Full).await
}

/// PATCH /ufs/{id}/ - change the supplied fields only
async fn partial_update_uf(
    State(state): State<AppState>,
    UfId(id): UfId,
    UfBody(payload): UfBody,
) -> Result<Response, ApiError> {
    let changes = payload.into_changes()?;
    apply_update(&state, id, changes, UpdateKind::Partial).await
}

/// Run the update, then answer with the re-fetched record.
///
/// Zero affected rows is reported as not found, whether the id is
/// unknown or no field was supplied.
async fn apply_update(
    state: &AppState,
    id: i64,
    changes: UfChanges,
    kind: UpdateKind,
) -> Result<Response, ApiError> {
    let affected = state
        .store
        .update(id, changes)
        .await
        .map_err(ApiError::store(kind.failed()))?;

    if affected == 0 {
        return Err(ApiError::NotFound {
            message: NOTHING_UPDATED,
        });
    }

    let refetched = state
        .store
        .get_by_id(id)
        .await
        .map_err(ApiError::store(kind.failed()))?;

    match refetched {
        Some(uf) => Ok(Json(uf).into_response()),
        None => {
            // Deleted between the two statements; the update itself succeeded
            tracing::error!(id, "UF updated but could not be retrieved");
            Ok((StatusCode::OK, Json(json!({ "error": kind.vanished() }))).into_response())
        }
    }
}

/// DELETE /ufs/{id}/ - remove a UF
async fn destroy_uf(
    State(state): State<AppState>,
    UfId(id): UfId,
) -> Result<StatusCode, ApiError> {
    let affected = state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store(DESTROY_FAILED))?;

    if affected > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found())
    }
}

/// UF routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ufs/", get(list_ufs).post(create_uf))
        .route(
            "/ufs/{id}/",
            get(retrieve_uf)
                .put(update_uf)
                .patch(partial_update_uf)
                .delete(destroy_uf),
        )
}
