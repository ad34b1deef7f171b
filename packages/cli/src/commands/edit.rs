//! Drive an edit session from a JSON script.
//!
//! A script is an array of steps, each an object tagged by `"op"`:
//!
//! ```json
//! [
//!   { "op": "select", "selector": "#about" },
//!   { "op": "move", "to": "toFirst" },
//!   { "op": "style", "property": "color", "value": "red" },
//!   { "op": "saveCss" }
//! ]
//! ```

use super::open_workspace;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use livepage_editor::{
    AttributeEdit, EditSession, KeyEvent, Mode, ProjectBackend, ReorderOp, StaticLayout,
};
use livepage_workspace::{FsBackend, MetadataLoader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Project to edit
    pub project: String,

    /// JSON file with the edit steps
    pub script: PathBuf,

    /// Save index.html after the last step
    #[arg(long)]
    pub save: bool,

    /// Keep going after a step fails
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditStep {
    Select { selector: String },
    Clear,
    Move { to: ReorderOp },
    Indent,
    Outdent,
    Delete,
    Add { tag: Option<String> },
    #[serde(rename_all = "camelCase")]
    Attributes {
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        inner_html: Option<String>,
    },
    Title { value: String },
    Style { property: String, value: String },
    InlineStyle,
    SaveCss,
    Save,
    Undo,
    Key(KeyEvent),
}

impl EditStep {
    fn describe(&self) -> String {
        match self {
            EditStep::Select { selector } => format!("select {}", selector),
            EditStep::Move { to } => format!("move {:?}", to),
            EditStep::Add { tag } => format!("add <{}>", tag.as_deref().unwrap_or("default")),
            EditStep::Style { property, value } => format!("style {}: {}", property, value),
            EditStep::Key(event) => format!("key {}", event.key),
            other => format!("{:?}", other).to_lowercase(),
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<EditStep>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read edit script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid edit script {}", path.display()))
}

/// Run one step. Returns a short note for the log line.
pub fn run_step(
    session: &mut EditSession,
    backend: &mut dyn ProjectBackend,
    step: &EditStep,
) -> Result<String> {
    debug!(op = %step.describe(), "edit step");
    let layout = StaticLayout::default();
    let note = match step {
        EditStep::Select { selector } => {
            let node = session
                .document()
                .ok_or_else(|| anyhow!("No document loaded"))?
                .query(selector)
                .ok_or_else(|| anyhow!("Nothing matches {}", selector))?;
            session.select(Some(node), &layout)?;
            session
                .selected_entry()
                .map(|entry| entry.label.clone())
                .unwrap_or_default()
        }
        EditStep::Clear => {
            session.clear_selection();
            String::new()
        }
        EditStep::Move { to } => changed(session.move_selected(*to)?),
        EditStep::Indent => changed(session.indent_selected()?),
        EditStep::Outdent => changed(session.outdent_selected()?),
        EditStep::Delete => {
            session.delete_selected()?;
            String::new()
        }
        EditStep::Add { tag } => {
            session.add_element(tag.as_deref())?;
            String::new()
        }
        EditStep::Attributes {
            attributes,
            inner_html,
        } => {
            session.apply_attributes(&AttributeEdit {
                attributes: attributes.clone(),
                inner_html: inner_html.clone(),
                title: None,
            })?;
            String::new()
        }
        EditStep::Title { value } => changed(session.set_title(value)?),
        EditStep::Style { property, value } => {
            session.stage_style(property, value)?;
            String::new()
        }
        EditStep::InlineStyle => {
            session.apply_inline_style()?;
            String::new()
        }
        EditStep::SaveCss => {
            let css = session.save_stylesheet(backend)?;
            format!("{} bytes", css.len())
        }
        EditStep::Save => {
            let markup = session.save_markup(backend)?;
            format!("{} bytes", markup.len())
        }
        EditStep::Undo => {
            session.undo()?;
            String::new()
        }
        EditStep::Key(event) => match session.handle_key(event, false, backend)? {
            Some(action) => format!("{:?}", action),
            None => "ignored".to_string(),
        },
    };
    Ok(note)
}

fn changed(moved: bool) -> String {
    if moved {
        String::new()
    } else {
        "no change".to_string()
    }
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let (config, store) = open_workspace(cwd)?;
    let steps = load_script(&args.script)?;
    let metadata = MetadataLoader::new(config.static_path(Path::new(cwd)));
    let mut backend = FsBackend::new(store);

    let mut session = EditSession::new(config.editor.clone());
    session.set_metadata(
        metadata.tags()?.unwrap_or_default(),
        metadata.css_schema()?.unwrap_or_default(),
    );
    session.open(&backend, &args.project, Mode::Edit)?;
    info!(project = %args.project, steps = steps.len(), "edit session opened");

    println!(
        "{} {} ({} steps)",
        "✏️  Editing".bright_blue().bold(),
        args.project.bright_white(),
        steps.len()
    );

    let mut failures = 0;
    for (index, step) in steps.iter().enumerate() {
        match run_step(&mut session, &mut backend, step) {
            Ok(note) if note.is_empty() => {
                println!("  {} {}. {}", "✓".green(), index + 1, step.describe());
            }
            Ok(note) => {
                println!(
                    "  {} {}. {} {}",
                    "✓".green(),
                    index + 1,
                    step.describe(),
                    note.dimmed()
                );
            }
            Err(err) => {
                failures += 1;
                warn!(step = index + 1, error = %err, "edit step failed");
                eprintln!(
                    "  {} {}. {} - {}",
                    "✗".red(),
                    index + 1,
                    step.describe(),
                    notice(&err).red()
                );
                if !args.keep_going {
                    return Err(anyhow!("Stopped at step {}", index + 1));
                }
            }
        }
    }

    if args.save {
        session.save_markup(&mut backend)?;
        println!("  {} Saved index.html", "✓".green());
    }

    println!();
    if failures == 0 {
        println!("{} Applied {} steps", "✅".green(), steps.len());
    } else {
        println!(
            "{} Applied {} steps, {} failed",
            "⚠️".yellow(),
            steps.len() - failures,
            failures
        );
    }
    Ok(())
}

/// User-facing notice for editor errors, plain message otherwise.
fn notice(err: &anyhow::Error) -> String {
    match err.downcast_ref::<livepage_editor::EditorError>() {
        Some(editor) => editor.notice(),
        None => err.to_string(),
    }
}
