use anyhow::{Context, Result};
use farewell_config::FarewellConfig;
use farewell_core::{Message, OutputFormat};
use rand::seq::SliceRandom;
use regex::{Regex, RegexBuilder};
use serde_json::json;

use crate::cli::MessagesCommands;
use crate::output::truncate_chars;
use crate::repository::{open_repository, remote_status, warn_if_partial};

pub(crate) async fn handle_messages_command(
    command: MessagesCommands,
    config: &FarewellConfig,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    match command {
        MessagesCommands::List { shuffle, grep } => {
            handle_list(config, offline, shuffle, grep.as_deref(), format).await
        }
        MessagesCommands::Add { author, message } => {
            handle_add(config, offline, &author, &message, format).await
        }
    }
}

async fn handle_list(
    config: &FarewellConfig,
    offline: bool,
    shuffle: bool,
    grep: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let pattern = grep
        .map(|raw| {
            RegexBuilder::new(raw)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid --grep pattern: {raw}"))
        })
        .transpose()?;

    let repo = open_repository(config, offline)?;
    let mut messages: Vec<Message> = repo.load().await;
    if let Some(pattern) = &pattern {
        messages = filter_messages(messages, pattern);
    }
    if shuffle {
        messages.shuffle(&mut rand::rng());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&messages)?),
        OutputFormat::Text => print_messages(&messages),
    }
    Ok(())
}

async fn handle_add(
    config: &FarewellConfig,
    offline: bool,
    author: &str,
    message: &str,
    format: OutputFormat,
) -> Result<()> {
    let repo = open_repository(config, offline)?;
    let mut view: Vec<Message> = repo.load().await;
    let (record, outcome) = repo.add_message(&mut view, author, message).await?;

    match format {
        OutputFormat::Json => {
            let body = json!({
                "record": record,
                "remote": remote_status(&outcome.remote),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("Added message {} from {}", record.id, record.author),
    }
    warn_if_partial(&repo, &outcome.remote);
    Ok(())
}

/// Keep messages whose author or text matches `pattern`.
fn filter_messages(messages: Vec<Message>, pattern: &Regex) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|msg| pattern.is_match(&msg.author) || pattern.is_match(&msg.message))
        .collect()
}

fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages found.");
        return;
    }
    println!("{:<15}  {:<20}  MESSAGE", "ID", "AUTHOR");
    for msg in messages {
        println!(
            "{:<15}  {:<20}  {}",
            msg.id,
            truncate_chars(&msg.author, 20),
            truncate_chars(&msg.message, 80)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: i64, author: &str, message: &str) -> Message {
        Message {
            id,
            author: author.into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_filter_matches_author_or_text_case_insensitively() {
        let messages = vec![
            msg(1, "Ana", "Safe travels"),
            msg(2, "Ben", "Miss you already"),
            msg(3, "Travis", "See you soon"),
        ];
        let pattern = RegexBuilder::new("TRAV")
            .case_insensitive(true)
            .build()
            .unwrap();
        let ids: Vec<i64> = filter_messages(messages, &pattern)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_filter_keeps_order() {
        let messages = vec![msg(9, "a", "x"), msg(2, "b", "x"), msg(5, "c", "x")];
        let pattern = Regex::new("x").unwrap();
        let ids: Vec<i64> = filter_messages(messages, &pattern)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [9, 2, 5]);
    }
}
