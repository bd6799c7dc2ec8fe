//! In-process UF store
//!
//! Same contract as the PostgreSQL repository (unique columns, name
//! ordering, zero-row results) without a database. Used by the router
//! tests and by `ufapi serve --in-memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DbError, UfStore};
use crate::models::{FederativeUnit, NewUf, UfChanges};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, FederativeUnit>,
}

impl Table {
    /// First unique column `candidate` collides with, ignoring row `skip`.
    fn conflict(&self, candidate: &FederativeUnit, skip: Option<i64>) -> Option<DbError> {
        self.rows
            .values()
            .filter(|row| Some(row.id) != skip)
            .find_map(|row| {
                let column = if row.name == candidate.name {
                    "nome"
                } else if row.abbreviation == candidate.abbreviation {
                    "sigla"
                } else if row.ibge_code == candidate.ibge_code {
                    "codigo_ibge"
                } else {
                    return None;
                };
                Some(DbError::ConstraintViolation {
                    constraint: format!("uf_{column}_key"),
                    message: format!("duplicate key value violates unique constraint \"uf_{column}_key\""),
                })
            })
    }
}

/// UF store held in memory
#[derive(Default)]
pub struct MemoryUfStore {
    table: RwLock<Table>,
}

impl MemoryUfStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UfStore for MemoryUfStore {
    async fn create(&self, new: NewUf) -> Result<FederativeUnit, DbError> {
        let mut table = self.table.write().await;
        let uf = FederativeUnit {
            id: table.last_id + 1,
            name: new.name,
            abbreviation: new.abbreviation,
            ibge_code: new.ibge_code,
        };
        if let Some(err) = table.conflict(&uf, None) {
            tracing::error!(error = %err, "failed to create UF");
            return Err(err);
        }

        table.last_id = uf.id;
        table.rows.insert(uf.id, uf.clone());
        tracing::info!(id = uf.id, "UF created");
        Ok(uf)
    }

    async fn list_all(&self) -> Result<Vec<FederativeUnit>, DbError> {
        let table = self.table.read().await;
        let mut ufs: Vec<FederativeUnit> = table.rows.values().cloned().collect();
        ufs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ufs)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FederativeUnit>, DbError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: UfChanges) -> Result<u64, DbError> {
        if changes.is_empty() {
            tracing::warn!(id, "no fields provided for UF update");
            return Ok(0);
        }

        let mut table = self.table.write().await;
        let Some(current) = table.rows.get(&id) else {
            tracing::warn!(id, "UF not found for update");
            return Ok(0);
        };

        let updated = FederativeUnit {
            id,
            name: changes.name.unwrap_or_else(|| current.name.clone()),
            abbreviation: changes
                .abbreviation
                .unwrap_or_else(|| current.abbreviation.clone()),
            ibge_code: changes.ibge_code.unwrap_or(current.ibge_code),
        };
        if let Some(err) = table.conflict(&updated, Some(id)) {
            tracing::error!(id, error = %err, "failed to update UF");
            return Err(err);
        }

        table.rows.insert(id, updated);
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64, DbError> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
