//! Schema setup for the `uf` table

use sqlx::PgPool;

use super::DbError;

const CREATE_UF_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS uf (
        id          BIGSERIAL    PRIMARY KEY,
        nome        VARCHAR(100) NOT NULL UNIQUE,
        sigla       VARCHAR(2)   NOT NULL UNIQUE,
        codigo_ibge INTEGER      NOT NULL UNIQUE
    )
"#;

/// Create the `uf` table if it does not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running UF migrations...");

    sqlx::query(CREATE_UF_TABLE).execute(pool).await?;

    tracing::info!("UF migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run failed");
        run(&pool).await.expect("second run failed");
    }
}
