//! Schema command: create the uf table and exit

use anyhow::{Context, Result};
use clap::Parser;

use ufapi_server::db::{create_pool_with_options, migrations};

use crate::config::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args.db.require_url()?;
    let pool = create_pool_with_options(database_url, args.db.pool_settings())
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    pool.close().await;
    Ok(())
}
