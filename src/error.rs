//! Error types shared by the settings store, timer handle and HTTP API

use thiserror::Error;

/// Errors surfaced to callers of the timer handle and the settings store.
///
/// Notification failures are deliberately absent: they are logged and
/// swallowed where they happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    #[error("setting {key} expects a {expected} value")]
    WrongKind {
        key: &'static str,
        expected: &'static str,
    },

    #[error("failed to persist settings: {0}")]
    Persist(String),

    #[error("timer task is not running")]
    TimerUnavailable,
}
