use anyhow::{bail, Context};
use livepage_workspace::{router, AppState, MetadataLoader, ProjectStore, WorkspaceConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let mut root_dir = std::env::current_dir()?;
    let mut port: Option<u16> = None;
    let mut host: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let value = args.get(i + 1).context("--port requires a value")?;
                port = Some(value.parse().context("Invalid port number")?);
                i += 2;
            }
            "--host" => {
                host = Some(args.get(i + 1).context("--host requires a value")?.clone());
                i += 2;
            }
            "--help" | "-h" => {
                println!("Usage: livepage-server [OPTIONS] [ROOT_DIR]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>       Port to listen on (default: config or 5000)");
                println!("  --host <HOST>           Interface to bind (default: 127.0.0.1)");
                println!("  -h, --help              Show this help message");
                println!();
                println!("Arguments:");
                println!("  [ROOT_DIR]              Directory holding livepage.config.json (default: current dir)");
                return Ok(());
            }
            arg if !arg.starts_with('-') => {
                root_dir = PathBuf::from(arg);
                i += 1;
            }
            other => bail!("Unknown argument: {}", other),
        }
    }

    let mut config = WorkspaceConfig::load(&root_dir)?;
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    let store = ProjectStore::open(config.projects_path(&root_dir))?;
    let static_dir = config.static_path(&root_dir);
    let state = AppState::new(store, MetadataLoader::new(&static_dir));
    let app = router(state, Some(static_dir));

    let address = config.address();
    info!(address = %address, root = ?root_dir, "Starting Livepage server");
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    axum::serve(listener, app).await?;
    Ok(())
}
