use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub mod plain;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "horoscope",
    version,
    about = "Terminal chat client for a single JSON prompt endpoint"
)]
pub struct Cli {
    /// Chat endpoint URL (POST {"prompt": ...})
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Title shown in the header bar
    #[arg(long)]
    pub title: Option<String>,

    /// Color theme (dark, light)
    #[arg(long)]
    pub theme: Option<String>,

    /// Request timeout in milliseconds, 0 waits forever
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Log filter (error,warn,info,debug,trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Use plain line mode (disable TUI)
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_tui: bool,
}

pub fn help_text() -> &'static str {
    "Type a message and press Enter to send it.\n/help  Show help\n/quit  Quit"
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainCommand {
    Help,
    Quit,
}

/// Commands understood by the plain line mode. Anything else is a draft.
pub fn parse_command(line: &str) -> Option<PlainCommand> {
    match line.trim() {
        "/help" => Some(PlainCommand::Help),
        "/quit" | "/exit" => Some(PlainCommand::Quit),
        _ => None,
    }
}
