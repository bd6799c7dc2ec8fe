//! Domain models with validation at construction
//!
//! Request bodies are validated field by field into `NewUf` / `UfChanges`.
//! Invalid input returns a `FieldErrors` report, never a panic.

pub mod validation;
pub mod uf;

pub use validation::{FieldErrors, messages};
pub use uf::{FederativeUnit, NewUf, UfChanges, UfPayload};
