//! The plugins command: list the resolved plugin list

use colored::Colorize;
use serde_json::json;

use crate::cli::ResolveArgs;
use crate::error::Result;
use crate::session::Session;

/// Run the plugins command
pub async fn run_plugins(input: &ResolveArgs, json: bool) -> Result<()> {
    let session = Session::open(input)?;
    let resolved = session.resolve().await?;

    if json {
        let plugins: Vec<_> = resolved
            .plugins()
            .iter()
            .map(|p| json!({ "name": p.name(), "description": p.description() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&plugins)?);
        return Ok(());
    }

    println!("{}", "Resolved Plugins".bold());
    for (index, plugin) in resolved.plugins().iter().enumerate() {
        let description = plugin.description().unwrap_or("");
        println!(
            "   {:>2}. {} {}",
            index + 1,
            plugin.name().cyan(),
            description.dimmed()
        );
    }
    println!();
    println!("{} plugin(s) total", resolved.plugins().len());
    Ok(())
}
