//! UF repository
//!
//! Hand-written SQL against the `uf` table:
//! - create: INSERT ... RETURNING (single round trip)
//! - update: SET list built from static column names, values bound
//! - uniqueness is enforced by the table constraints

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::{DbError, UfStore};
use crate::models::{FederativeUnit, NewUf, UfChanges};

const INSERT_SQL: &str = r#"
    INSERT INTO uf (nome, sigla, codigo_ibge)
    VALUES ($1, $2, $3)
    RETURNING id, nome, sigla, codigo_ibge
"#;

const LIST_SQL: &str = "SELECT id, nome, sigla, codigo_ibge FROM uf ORDER BY nome";

const GET_SQL: &str = "SELECT id, nome, sigla, codigo_ibge FROM uf WHERE id = $1";

const DELETE_SQL: &str = "DELETE FROM uf WHERE id = $1";

/// Log a failed statement and classify the error.
fn failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| {
        let err = DbError::from(e);
        tracing::error!(operation, error = %err, "UF statement failed");
        err
    }
}

/// PostgreSQL-backed UF store
#[derive(Clone)]
pub struct UfRepo {
    pool: PgPool,
}

impl UfRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UfStore for UfRepo {
    async fn create(&self, new: NewUf) -> Result<FederativeUnit, DbError> {
        tracing::info!(
            nome = %new.name,
            sigla = %new.abbreviation,
            codigo_ibge = new.ibge_code,
            "creating UF"
        );
        tracing::debug!(sql = INSERT_SQL, "executing");

        let uf: FederativeUnit = sqlx::query_as(INSERT_SQL)
            .bind(&new.name)
            .bind(&new.abbreviation)
            .bind(new.ibge_code)
            .fetch_one(&self.pool)
            .await
            .map_err(failed("create"))?;

        tracing::info!(id = uf.id, "UF created");
        Ok(uf)
    }

    async fn list_all(&self) -> Result<Vec<FederativeUnit>, DbError> {
        tracing::debug!(sql = LIST_SQL, "executing");

        let ufs: Vec<FederativeUnit> = sqlx::query_as(LIST_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(failed("list_all"))?;

        tracing::info!(count = ufs.len(), "fetched UFs");
        Ok(ufs)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FederativeUnit>, DbError> {
        tracing::debug!(sql = GET_SQL, id, "executing");

        let uf: Option<FederativeUnit> = sqlx::query_as(GET_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(failed("get_by_id"))?;

        if uf.is_none() {
            tracing::warn!(id, "UF not found");
        }
        Ok(uf)
    }

    async fn update(&self, id: i64, changes: UfChanges) -> Result<u64, DbError> {
        if changes.is_empty() {
            tracing::warn!(id, "no fields provided for UF update");
            return Ok(0);
        }

        tracing::info!(
            id,
            nome = ?changes.name,
            sigla = ?changes.abbreviation,
            codigo_ibge = ?changes.ibge_code,
            "updating UF"
        );

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE uf SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = changes.name {
                set.push("nome = ").push_bind_unseparated(name);
            }
            if let Some(abbreviation) = changes.abbreviation {
                set.push("sigla = ").push_bind_unseparated(abbreviation);
            }
            if let Some(ibge_code) = changes.ibge_code {
                set.push("codigo_ibge = ").push_bind_unseparated(ibge_code);
            }
        }
        builder.push(" WHERE id = ").push_bind(id);
        tracing::debug!(sql = builder.sql(), "executing");

        let affected = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(failed("update"))?
            .rows_affected();

        if affected == 0 {
            tracing::warn!(id, "UF not found for update");
        } else {
            tracing::info!(id, affected, "UF updated");
        }
        Ok(affected)
    }

    async fn delete(&self, id: i64) -> Result<u64, DbError> {
        tracing::debug!(sql = DELETE_SQL, id, "executing");

        let affected = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(failed("delete"))?
            .rows_affected();

        if affected == 0 {
            tracing::warn!(id, "UF not found for deletion");
        } else {
            tracing::info!(id, affected, "UF deleted");
        }
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(failed("ping"))?;
        Ok(())
    }
}
