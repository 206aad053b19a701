//! Mutable timer session and its published snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerState;

/// The engine's mutable state. One instance lives for the whole process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    pub current_state: TimerState,
    /// Seconds left in the current phase
    pub remaining_seconds: u64,
    pub is_running: bool,
    /// Finished work phases; only ever increases
    pub completed_work_sessions: u32,
}

impl TimerSession {
    /// Fresh, paused session at the start of a work phase
    pub fn new(work_seconds: u64) -> Self {
        Self {
            current_state: TimerState::Work,
            remaining_seconds: work_seconds,
            is_running: false,
            completed_work_sessions: 0,
        }
    }
}

/// Observable fields handed to presenters after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub current_state: TimerState,
    pub state_description: String,
    pub remaining_seconds: u64,
    pub formatted_time: String,
    pub progress: f64,
    pub is_running: bool,
    pub completed_work_sessions: u32,
    pub skip_breaks: bool,
    pub auto_start: bool,
    pub updated_at: DateTime<Utc>,
}
