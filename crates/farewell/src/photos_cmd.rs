use anyhow::{Result, bail};
use farewell_config::FarewellConfig;
use farewell_core::seed::is_seed_photo_id;
use farewell_core::{OutputFormat, PhotoMemory};
use farewell_store::RemoteSync;
use serde_json::json;

use crate::cli::PhotosCommands;
use crate::output::{format_timestamp_ms, truncate_chars};
use crate::repository::{open_repository, remote_status, warn_if_partial};

pub(crate) async fn handle_photos_command(
    command: PhotosCommands,
    config: &FarewellConfig,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    match command {
        PhotosCommands::List => handle_list(config, offline, format).await,
        PhotosCommands::Add { url, caption } => {
            handle_add(config, offline, &url, &caption, format).await
        }
        PhotosCommands::Delete { id } => handle_delete(config, offline, &id, format).await,
    }
}

async fn handle_list(config: &FarewellConfig, offline: bool, format: OutputFormat) -> Result<()> {
    let repo = open_repository(config, offline)?;
    let photos: Vec<PhotoMemory> = repo.load().await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&photos)?),
        OutputFormat::Text => print_photos(&photos),
    }
    Ok(())
}

async fn handle_add(
    config: &FarewellConfig,
    offline: bool,
    url: &str,
    caption: &str,
    format: OutputFormat,
) -> Result<()> {
    let repo = open_repository(config, offline)?;
    let mut view: Vec<PhotoMemory> = repo.load().await;
    let (record, outcome) = repo.add_photo(&mut view, url, caption).await?;

    match format {
        OutputFormat::Json => {
            let body = json!({
                "record": record,
                "remote": remote_status(&outcome.remote),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("Added photo {}", record.id),
    }
    warn_if_partial(&repo, &outcome.remote);
    Ok(())
}

async fn handle_delete(
    config: &FarewellConfig,
    offline: bool,
    id: &str,
    format: OutputFormat,
) -> Result<()> {
    if is_seed_photo_id(id) {
        bail!("{id} is a built-in photo and cannot be deleted");
    }

    let repo = open_repository(config, offline)?;
    let mut view: Vec<PhotoMemory> = repo.load().await;
    let outcome = repo.delete_photo(&mut view, id).await;

    match format {
        OutputFormat::Json => {
            let body = json!({
                "id": id,
                "removed": outcome.removed,
                "remote": remote_status(&outcome.remote),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            let removed_remotely = outcome.remote == RemoteSync::Synced;
            if outcome.removed || removed_remotely {
                println!("Deleted photo {id}");
            } else {
                println!("No photo with id {id}; nothing to delete.");
            }
        }
    }
    warn_if_partial(&repo, &outcome.remote);
    Ok(())
}

fn print_photos(photos: &[PhotoMemory]) {
    if photos.is_empty() {
        println!("No photos found.");
        return;
    }
    println!("{:<20}  {:<16}  {:<40}  URL", "ID", "ADDED", "CAPTION");
    for photo in photos {
        println!(
            "{:<20}  {:<16}  {:<40}  {}",
            photo.id,
            format_timestamp_ms(photo.timestamp),
            truncate_chars(&photo.caption, 40),
            photo.url
        );
    }
}
