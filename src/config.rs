//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    notify::{CommandNotifier, LogNotifier, Notifier},
    settings::store::default_settings_path,
};

/// How phase-end notifications are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifierKind {
    /// Write notifications to the log only
    Log,
    /// Show native desktop notifications
    Command,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomorin")]
#[command(about = "A headless Pomodoro timer with a status-bar title and notifications")]
#[command(version)]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Notification delivery
    #[arg(long, value_enum, default_value = "command")]
    pub notifier: NotifierKind,

    /// Print every status-bar title to stdout
    #[arg(long)]
    pub print_title: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_path)
    }

    pub fn notifier(&self) -> Box<dyn Notifier> {
        match self.notifier {
            NotifierKind::Log => Box::new(LogNotifier),
            NotifierKind::Command => Box::new(CommandNotifier),
        }
    }
}
