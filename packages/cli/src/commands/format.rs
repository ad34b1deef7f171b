use super::open_workspace;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use livepage_editor::{pretty_print, serialize_document, OverlayMatcher};

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Project to format
    pub project: String,

    /// Write the result back to index.html instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

/// Canonical, indented form of a page: overlays stripped, scripts moved to
/// the end of the body.
pub fn format_markup(markup: &str, pretty: bool) -> Result<String> {
    let doc = livepage_dom::parse(markup).map_err(|e| anyhow!("Cannot parse markup: {}", e))?;
    let mut out = serialize_document(&doc, &OverlayMatcher::default());
    if pretty {
        out = pretty_print(&out);
        out.push('\n');
    }
    Ok(out)
}

pub fn format(args: FormatArgs, cwd: &str) -> Result<()> {
    let (config, store) = open_workspace(cwd)?;
    let markup = store.read_markup(&args.project)?;
    let formatted = format_markup(&markup, config.editor.pretty_print)?;

    if args.write {
        store.write_markup(&args.project, &formatted)?;
        println!(
            "{} Formatted {}/index.html",
            "✓".green(),
            args.project.bright_white()
        );
    } else {
        print!("{}", formatted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_moves_scripts_and_is_stable() {
        let markup = "<html><head><script src=\"a.js\"></script></head><body><div><p>x</p></div></body></html>";
        let once = format_markup(markup, true).unwrap();
        assert!(once.contains("<script src=\"a.js\"></script>\n  </body>"));
        assert!(once.starts_with("<!DOCTYPE html>"));
        assert_eq!(format_markup(&once, true).unwrap(), once);
    }
}
