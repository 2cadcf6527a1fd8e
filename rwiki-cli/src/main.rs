//! rwiki CLI - Réunion Wiki server and maintenance commands
//!
//! Entry point for the `rwiki` binary:
//! - `serve` runs the HTTP server
//! - `seed` populates an empty talent table with the launch roster
//! - `optimize` rebuilds indexes and compacts the database
//! - `hash-password` produces a bcrypt hash for ADMIN_PASSWORD_HASH

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "rwiki",
    author,
    version,
    about = "Annuaire communautaire de La Réunion",
    long_about = "Community directory for Réunion island: moderated site listings \
                  and a local talent directory, served as plain HTML."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Seed the talent table with the launch roster (no-op if non-empty)
    Seed(commands::maintenance::SeedArgs),
    /// Rebuild indexes, ANALYZE and VACUUM the database
    Optimize(commands::maintenance::OptimizeArgs),
    /// Hash an admin password for the ADMIN_PASSWORD_HASH variable
    HashPassword(commands::hash_password::HashPasswordArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the environment directly
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.debug)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Seed(args) => commands::maintenance::seed(args).await,
        Commands::Optimize(args) => commands::maintenance::optimize(args).await,
        Commands::HashPassword(args) => commands::hash_password::run(args),
    }
}
