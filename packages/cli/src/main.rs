mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    edit, format, init, list, serve, style, EditArgs, FormatArgs, InitArgs, ServeArgs, StyleArgs,
};

/// Livepage CLI - edit static pages in place
#[derive(Parser, Debug)]
#[command(name = "livepage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace root holding livepage.config.json (defaults to current directory)
    #[arg(long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new project from the starter template
    Init(InitArgs),

    /// List projects
    List,

    /// Re-serialize a project's index.html the way the editor saves it
    Format(FormatArgs),

    /// Apply a JSON script of edit steps to a project
    Edit(EditArgs),

    /// Merge declarations into a rule of a project's style.css
    Style(StyleArgs),

    /// Start the HTTP API
    Serve(ServeArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match cli.root {
        Some(root) => root,
        None => match std::env::current_dir() {
            Ok(dir) => dir.display().to_string(),
            Err(err) => {
                eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
                std::process::exit(1);
            }
        },
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::List => list(&cwd),
        Command::Format(args) => format(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
        Command::Style(args) => style(args, &cwd),
        Command::Serve(args) => serve(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
