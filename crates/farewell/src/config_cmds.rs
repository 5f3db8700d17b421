use std::path::{Path, PathBuf};

use anyhow::Result;
use farewell_config::FarewellConfig;
use farewell_core::OutputFormat;

pub(crate) fn handle_config_show(config: &FarewellConfig, format: OutputFormat) -> Result<()> {
    let redacted = config.redacted_for_display();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&redacted)?);
        }
        OutputFormat::Text => {
            print!("{}", toml::to_string_pretty(&redacted)?);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => FarewellConfig::config_path()?,
    };
    FarewellConfig::save_default_template(&path, force)?;
    eprintln!("Wrote config template to: {}", path.display());
    eprintln!("  Set remote.bin_id and remote.api_key to enable syncing.");
    Ok(())
}
