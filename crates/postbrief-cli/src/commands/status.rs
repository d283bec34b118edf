//! `postbrief status` -- show configuration status.
//!
//! Reports which credentials are present and the resolved settings,
//! without contacting any service and without printing secret values.

use clap::Args;

use postbrief_types::Config;

/// Environment variables that must be set for the pipeline to start.
const REQUIRED_VARS: &[&str] = &[
    "GMAIL_CLIENT_ID",
    "GMAIL_CLIENT_SECRET",
    "GMAIL_REFRESH_TOKEN",
    "ANTHROPIC_API_KEY",
    "NOTION_API_KEY",
    "NOTION_DATABASE_ID",
    "SLACK_BOT_TOKEN",
    "SLACK_CHANNEL_ID",
];

/// Arguments for the `postbrief status` subcommand.
#[derive(Args)]
pub struct StatusArgs {}

pub async fn execute(_args: StatusArgs) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    println!("credentials:");
    for var in REQUIRED_VARS {
        let present = std::env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
        let marker = if present { "set" } else { "MISSING" };
        println!("  {var:<24} {marker}");
    }

    match Config::from_env() {
        Ok(config) => {
            println!();
            println!("schedule:");
            println!("  interval          {}s", config.schedule.interval_secs);
            println!("  lookback          {}h", config.schedule.lookback_hours);
            println!("  max emails        {}", config.schedule.max_emails);
            println!("  delete processed  {}", config.schedule.delete_processed);
            println!("retry:");
            println!("  max attempts      {}", config.retry.max_attempts);
            println!("  base delay        {}s", config.retry.base_delay_secs);
            println!("summary:");
            println!("  model             {}", config.llm.model);
            println!("  language          {}", config.summary.language);
            println!("  max chars         {}", config.summary.max_chars);
            println!();
            println!("configuration ok");
        }
        Err(err) => {
            println!();
            println!("configuration error: {err}");
        }
    }

    Ok(())
}
