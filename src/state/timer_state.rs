//! Timer phase enumeration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the Pomodoro cycle. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerState {
    /// Human label shown next to the countdown
    pub fn description(self) -> &'static str {
        match self {
            TimerState::Work => "Work Time",
            TimerState::ShortBreak => "Short Break",
            TimerState::LongBreak => "Long Break",
        }
    }

    /// Notification body sent when this phase runs out
    pub fn completion_message(self) -> &'static str {
        match self {
            TimerState::Work => "Pomodoro timer ended!",
            TimerState::ShortBreak => "Short break ended!",
            TimerState::LongBreak => "Long break ended!",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
