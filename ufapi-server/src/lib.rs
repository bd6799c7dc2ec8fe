//! ufapi-server: CRUD HTTP API for Brazilian federative units
//!
//! Two layers:
//! - [`db`]: hand-written SQL against the `uf` table behind the
//!   [`UfStore`] trait, plus an in-memory store with the same contract
//! - [`http`]: request validation and status-code translation on axum

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, MemoryUfStore, UfRepo, UfStore};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{FederativeUnit, FieldErrors, NewUf, UfChanges, UfPayload};
