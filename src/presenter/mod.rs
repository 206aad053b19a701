//! Status-bar title rendering

use crate::state::{TimerSnapshot, TimerState};

/// Title shown before the timer publishes its first snapshot
pub const DEFAULT_TITLE: &str = "Pomorin";

pub fn icon_for_state(state: TimerState) -> &'static str {
    match state {
        TimerState::Work => "🍅",
        TimerState::ShortBreak => "☕️",
        TimerState::LongBreak => "🛋️",
    }
}

/// Compact `"<icon> MM:SS"` title
pub fn status_title(snapshot: &TimerSnapshot) -> String {
    format!("{} {}", icon_for_state(snapshot.current_state), snapshot.formatted_time)
}

/// Holds the title currently on display
#[derive(Debug, Clone)]
pub struct StatusBar {
    title: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Re-render from `snapshot`, returning whether the text changed
    pub fn render(&mut self, snapshot: &TimerSnapshot) -> bool {
        let title = status_title(snapshot);
        if title == self.title {
            return false;
        }
        self.title = title;
        true
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
