//! `rwiki seed` and `rwiki optimize` - offline database maintenance.

use anyhow::{Context, Result};
use clap::Args;

use rwiki_server::db::{self, migrations, TalentRepo};

fn database_url(flag: Option<String>) -> Result<String> {
    if let Some(url) = flag {
        return Ok(url);
    }
    std::env::var("DATABASE_URL").context("DATABASE_URL is not set (or pass --database-url)")
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Database URL, overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

pub async fn seed(args: SeedArgs) -> Result<()> {
    let url = database_url(args.database_url)?;
    let pool = db::create_pool(&url).await?;
    migrations::run(&pool).await?;

    let inserted = TalentRepo::new(&pool).seed_defaults().await?;
    if inserted == 0 {
        println!("Talent table already populated, nothing to do.");
    } else {
        println!("Seeded {inserted} talents.");
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Database URL, overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

pub async fn optimize(args: OptimizeArgs) -> Result<()> {
    let url = database_url(args.database_url)?;
    let pool = db::create_pool(&url).await?;
    migrations::run(&pool).await?;
    migrations::create_indexes(&pool).await?;

    sqlx::query("ANALYZE").execute(&pool).await?;
    sqlx::query("PRAGMA optimize").execute(&pool).await?;
    // VACUUM needs its own connection outside any transaction
    sqlx::query("VACUUM").execute(&pool).await?;

    println!("Database optimized.");
    Ok(())
}
