use anyhow::Result;
use clap::Parser;

mod bin_cmd;
mod cli;
mod config_cmds;
mod countdown_cmd;
mod logging;
mod messages_cmd;
mod output;
mod photos_cmd;
mod repository;

use cli::{Cli, Commands, ConfigCommands};
use farewell_config::{FarewellConfig, paths};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_format = cli.format.clone();

    // `config init` must work even when the current file does not load.
    let loaded = FarewellConfig::load(cli.config.as_deref());
    let file_log_dir = loaded
        .as_ref()
        .ok()
        .filter(|config| config.logging.file)
        .map(|_| paths::default_log_dir());
    let _log_guard = logging::init_tracing(file_log_dir.as_deref());

    match cli.command {
        Commands::Config {
            cmd: ConfigCommands::Init { force },
        } => {
            config_cmds::handle_config_init(cli.config.as_deref(), force)?;
        }
        Commands::Config {
            cmd: ConfigCommands::Show,
        } => {
            config_cmds::handle_config_show(&loaded?, output_format)?;
        }
        Commands::Messages { cmd } => {
            messages_cmd::handle_messages_command(cmd, &loaded?, cli.offline, output_format)
                .await?;
        }
        Commands::Photos { cmd } => {
            photos_cmd::handle_photos_command(cmd, &loaded?, cli.offline, output_format).await?;
        }
        Commands::Countdown => {
            countdown_cmd::handle_countdown(&loaded?, output_format)?;
        }
        Commands::Bin { cmd } => {
            bin_cmd::handle_bin_command(cmd, &loaded?, output_format).await?;
        }
    }

    Ok(())
}
