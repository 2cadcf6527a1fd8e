//! `rwiki serve` - run the HTTP server.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;

use rwiki_core::AppConfig;
use rwiki_server::http::run_server;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overrides BIND_ADDR
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Database URL, overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    tracing::info!(
        database_url = %config.database_url,
        bind = %config.bind_addr,
        "starting rwiki server"
    );
    run_server(config).await?;
    Ok(())
}
