//! ufapi CLI - run and manage the UF API
//!
//! - `serve`: HTTP API over the `uf` table (or an in-memory store)
//! - `migrate`: create the `uf` table and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "ufapi",
    author,
    version,
    about = "CRUD HTTP API for Brazilian federative units (UFs)"
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the uf table if it does not exist
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["ufapi", "serve", "--in-memory"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.in_memory);
        assert!(!args.cors_permissive);
        assert!(!args.skip_migrations);
        assert_eq!(args.bind.port(), 8000);
    }

    #[test]
    fn debug_flag_is_global() {
        let cli = Cli::try_parse_from(["ufapi", "migrate", "--debug"]).unwrap();
        assert!(cli.debug);
    }
}
