use super::open_workspace;
use anyhow::Result;
use colored::Colorize;

pub fn list(cwd: &str) -> Result<()> {
    let (_, store) = open_workspace(cwd)?;
    let projects = store.list()?;
    if projects.is_empty() {
        println!("{}", "No projects yet. Run `livepage init <name>`.".yellow());
        return Ok(());
    }
    for name in projects {
        println!("  {}", name);
    }
    Ok(())
}
