//! The config command: print the resolved configuration map

use colored::Colorize;
use serde_json::Value;

use crate::cli::ResolveArgs;
use crate::error::Result;
use crate::session::Session;

/// Run the config command
pub async fn run_config(input: &ResolveArgs, json: bool) -> Result<()> {
    let session = Session::open(input)?;
    let resolved = session.resolve().await?;
    let config = Value::Object(resolved.config().clone());

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if resolved.config().is_empty() {
        println!("{} No configuration resolved.", "=>".blue().bold());
        return Ok(());
    }

    for (plugin, options) in resolved.config() {
        println!("{}", plugin.cyan().bold());
        let rendered = serde_json::to_string_pretty(options)?;
        for line in rendered.lines() {
            println!("   {line}");
        }
    }
    Ok(())
}
