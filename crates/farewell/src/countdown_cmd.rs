use anyhow::{Context, Result};
use chrono::Utc;
use farewell_config::FarewellConfig;
use farewell_core::OutputFormat;
use farewell_core::countdown::{TimeLeft, parse_target, time_left};
use serde_json::json;

pub(crate) fn handle_countdown(config: &FarewellConfig, format: OutputFormat) -> Result<()> {
    let target = parse_target(&config.page.homecoming).with_context(|| {
        format!(
            "page.homecoming is not a valid date-time: {}",
            config.page.homecoming
        )
    })?;
    let left = time_left(target, Utc::now());

    match format {
        OutputFormat::Json => {
            let body = json!({
                "recipient": config.page.recipient,
                "homecoming": target.to_rfc3339(),
                "days": left.days,
                "hours": left.hours,
                "minutes": left.minutes,
                "seconds": left.seconds,
                "is_done": left.is_done,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", describe(&left, &config.page.recipient)),
    }
    Ok(())
}

fn describe(left: &TimeLeft, recipient: &str) -> String {
    if left.is_done {
        return format!("Welcome Home, {recipient}!");
    }
    format!(
        "{recipient} comes home in {} days, {} hours, {} minutes, {} seconds",
        left.days, left.hours, left.minutes, left.seconds
    )
}
