//! memochat-view - print a grouped view of a memo chat history
//!
//! Reads a JSON array of chat messages from a file or stdin, groups them the
//! way the chat window does, and prints the result as text or JSON.

use std::fmt::Display;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;

use memochat_view::config;
use memochat_view::logging::init_logging;
use memochat_view::time_format::{
    format_message_time, format_relative_time_from_confirmations, now_local,
};
use memochat_view::{
    calculate_max_message_length, group_messages, ChatMessage, MessageHistory, ViewError,
};

#[derive(Parser)]
#[command(
    name = "memochat-view",
    version,
    about = "Group memo chat messages for display"
)]
struct Cli {
    /// JSON file with an array of chat messages (stdin when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
    /// Local identity used for the composer length budget
    #[arg(long, value_name = "NAME")]
    identity: Option<String>,
    /// Show times in UTC instead of the local timezone
    #[arg(long)]
    utc: bool,
    /// Print the grouped view model as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ViewError> {
    let settings = config::load_settings();
    let identity = cli.identity.or(settings.local_identity);
    let messages = read_messages(cli.input.as_ref())?;

    if cli.utc || settings.use_utc {
        print_view(messages, &Utc::now(), identity.as_deref(), cli.json)
    } else {
        print_view(messages, &now_local(), identity.as_deref(), cli.json)
    }
}

fn read_messages(path: Option<&PathBuf>) -> Result<Vec<ChatMessage>, ViewError> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|source| ViewError::Read {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&content)?)
}

fn print_view<Tz>(
    messages: Vec<ChatMessage>,
    now: &DateTime<Tz>,
    identity: Option<&str>,
    json: bool,
) -> Result<(), ViewError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut history = MessageHistory::new();
    history.merge(messages, now.timestamp());
    let groups = group_messages(history.messages(), now);

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for group in &groups {
        if let Some(label) = &group.date_label {
            println!("---- {} ----", label);
        }
        println!("{}  {}", group.sender, format_message_time(group.timestamp, now));
        for msg in &group.messages {
            let age = format_relative_time_from_confirmations(msg.confirmations);
            if age.is_empty() {
                println!("    {}", msg.text);
            } else {
                println!("    {}  ({})", msg.text, age);
            }
        }
    }

    println!(
        "\nMax message length: {} characters",
        calculate_max_message_length(identity)
    );
    Ok(())
}
