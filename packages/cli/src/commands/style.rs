use super::open_workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use livepage_stylesheet::merge_rule_text;

#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Project whose style.css is edited
    pub project: String,

    /// Rule selector, e.g. `#about` or `.hero`
    pub selector: String,

    /// Declarations to merge, e.g. "color: red; padding: 4px"
    pub declarations: String,

    /// Print the merged stylesheet instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn style(args: StyleArgs, cwd: &str) -> Result<()> {
    let (_, store) = open_workspace(cwd)?;
    let css = store.read_stylesheet(&args.project)?;
    let merged = merge_rule_text(&css, &args.selector, &args.declarations)?;

    if args.dry_run {
        print!("{}", merged);
        return Ok(());
    }
    store.write_stylesheet(&args.project, &merged)?;
    println!(
        "{} Updated {} in {}/style.css",
        "✓".green(),
        args.selector.cyan(),
        args.project.bright_white()
    );
    Ok(())
}
