use crate::config::{EstimatorConfig, CONFIG_FILE_NAME};
use crate::io;
use anyhow::{Context, Result};
use std::path::Path;

const HEADER: &str = "# isdc-estimator configuration\n\n";

/// Write a default configuration file into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let body = EstimatorConfig::default()
        .to_toml_string()
        .context("Failed to render default configuration")?;
    io::write_file(&config_path, &format!("{HEADER}{body}"))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}
