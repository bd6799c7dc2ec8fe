//! Store abstraction shared by the PostgreSQL repository and the
//! in-memory store.

use async_trait::async_trait;

use super::DbError;
use crate::models::{FederativeUnit, NewUf, UfChanges};

/// Data access for the `uf` table.
///
/// Every method is a single statement against the store.
#[async_trait]
pub trait UfStore: Send + Sync {
    /// Insert a record; the store assigns the id.
    async fn create(&self, new: NewUf) -> Result<FederativeUnit, DbError>;

    /// All records ordered by name ascending.
    async fn list_all(&self) -> Result<Vec<FederativeUnit>, DbError>;

    /// `None` when no record has this id.
    async fn get_by_id(&self, id: i64) -> Result<Option<FederativeUnit>, DbError>;

    /// Update the supplied fields; returns the number of rows changed.
    ///
    /// Returns 0 without touching the store when `changes` is empty.
    async fn update(&self, id: i64, changes: UfChanges) -> Result<u64, DbError>;

    /// Remove the record; returns the number of rows removed.
    async fn delete(&self, id: i64) -> Result<u64, DbError>;

    /// Cheap round trip to check the store is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}
