use crate::config::ScribeConfig;
use anyhow::Result;
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; delete it first to re-initialise.",
            config_path.display()
        );
    }

    let config = ScribeConfig::default();
    let rendered = toml::to_string_pretty(&config)?;
    std::fs::write(config_path, rendered)?;

    println!("Wrote default configuration to {}.", config_path.display());
    println!("Edit it, then start the server with `scribe serve`.");
    Ok(())
}
