use super::open_workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use livepage_workspace::{CreateOptions, WorkspaceConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name
    pub name: String,

    /// Create a starter style.css
    #[arg(long)]
    pub css: bool,

    /// Create a starter script.js
    #[arg(long)]
    pub js: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
    if !config_path.exists() {
        let json = serde_json::to_string_pretty(&WorkspaceConfig::default())?;
        fs::write(&config_path, json)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    let (_, store) = open_workspace(cwd)?;
    println!("{}", "📝 Creating Livepage project...".bright_blue().bold());

    let options = CreateOptions {
        css: args.css,
        js: args.js,
    };
    let name = store.create(&args.name, options)?;
    let path = store.project_path(&name)?;
    info!(project = %name, path = %path.display(), "project created");

    println!("  {} Created index.html", "✓".green());
    if args.css {
        println!("  {} Created style.css", "✓".green());
    }
    if args.js {
        println!("  {} Created script.js", "✓".green());
    }
    println!();
    println!(
        "{} Project {} ready at {}",
        "✨".green(),
        name.bright_white().bold(),
        path.display()
    );
    Ok(())
}
