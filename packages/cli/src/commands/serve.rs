use super::open_workspace;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use livepage_workspace::{router, AppState, MetadataLoader};
use std::path::Path;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    let (mut config, store) = open_workspace(cwd)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    let static_dir = config.static_path(Path::new(cwd));
    let state = AppState::new(store, MetadataLoader::new(&static_dir));
    let app = router(state, Some(static_dir));
    let address = config.address();

    info!(%address, "starting server");
    println!("{}", "🌐 Starting Livepage server...".bright_blue().bold());
    println!("   Listening on http://{}", address.cyan());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;
        axum::serve(listener, app).await?;
        Ok::<(), anyhow::Error>(())
    })
}
