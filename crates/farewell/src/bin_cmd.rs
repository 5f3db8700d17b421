use anyhow::{Context, Result, bail};
use farewell_config::FarewellConfig;
use farewell_config::config::{ENV_API_KEY, ENV_BIN_ID};
use farewell_core::OutputFormat;
use farewell_store::JsonBinClient;
use serde_json::json;

use crate::cli::BinCommands;

pub(crate) async fn handle_bin_command(
    command: BinCommands,
    config: &FarewellConfig,
    format: OutputFormat,
) -> Result<()> {
    match command {
        BinCommands::Create { name } => handle_create(config, &name, format).await,
    }
}

async fn handle_create(config: &FarewellConfig, name: &str, format: OutputFormat) -> Result<()> {
    if config.remote.api_key.trim().is_empty() {
        bail!("remote.api_key is not set (config file or {ENV_API_KEY})");
    }
    let client = JsonBinClient::from_config(&config.remote)?;
    let bin_id = client
        .create_bin(name)
        .await
        .context("Failed to create shared document")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "bin_id": bin_id }))?);
        }
        OutputFormat::Text => {
            println!("Created document {bin_id}");
            eprintln!("Set remote.bin_id = \"{bin_id}\" in the config, or export {ENV_BIN_ID}={bin_id}");
        }
    }
    Ok(())
}
