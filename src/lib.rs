//! Pomorin - a headless Pomodoro timer
//!
//! This library provides the work/short break/long break state machine, the
//! task that drives it once per second, a persisted settings store, desktop
//! notifications and a small HTTP control surface.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod presenter;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::Error;
pub use settings::{SettingKey, SettingValue, Settings};
pub use state::{AppState, TimerEngine, TimerState};
pub use tasks::{spawn_timer, TimerHandle};
pub use utils::signals::shutdown_signal;
