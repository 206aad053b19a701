//! Pomodoro timer engine
//!
//! A single-owner state machine cycling work, short break and long break.
//! It owns no clock: whoever holds the engine calls [`TimerEngine::on_tick`]
//! once per second while [`TimerEngine::is_running`] is true, and stops
//! calling it as soon as that flips to false.
//!
//! ```text
//! Work --(n % interval != 0)--> ShortBreak --> Work
//! Work --(n % interval == 0)--> LongBreak  --> Work
//! Work --(skip breaks)--------> Work
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{TimerSession, TimerSnapshot, TimerState};
use crate::{
    error::Error,
    notify::{Notifier, NOTIFICATION_TITLE},
    settings::{SettingKey, SettingValue, Settings},
};

pub struct TimerEngine {
    session: TimerSession,
    settings: Settings,
    notifier: Box<dyn Notifier>,
    /// Bumped every time `start` arms a fresh tick source
    tick_generation: u64,
}

impl TimerEngine {
    /// Create a paused engine at the start of a work phase
    pub fn new(settings: Settings, notifier: Box<dyn Notifier>) -> Self {
        let session = TimerSession::new(settings.duration_seconds(TimerState::Work));
        Self {
            session,
            settings,
            notifier,
            tick_generation: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_state(&self) -> TimerState {
        self.session.current_state
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.session.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.session.completed_work_sessions
    }

    /// Identifies the tick source armed by the most recent `start`.
    ///
    /// A driver that sees this change while running must discard its old
    /// interval and begin a new one.
    pub fn tick_generation(&self) -> u64 {
        self.tick_generation
    }

    pub fn start(&mut self) {
        if self.session.is_running {
            return;
        }

        self.session.is_running = true;
        self.tick_generation += 1;
        info!(
            "Timer started: {} with {}s remaining",
            self.session.current_state, self.session.remaining_seconds
        );
    }

    /// Stop ticking. Safe to call in any state.
    pub fn pause(&mut self) {
        if self.session.is_running {
            info!("Timer paused with {}s remaining", self.session.remaining_seconds);
        }
        self.session.is_running = false;
    }

    /// Pause and refill the countdown for the current phase
    pub fn reset(&mut self) {
        self.pause();
        self.session.remaining_seconds = self.total_seconds();
        debug!(
            "Timer reset: {} at {}s",
            self.session.current_state, self.session.remaining_seconds
        );
    }

    /// Complete the current phase immediately, regardless of time left
    pub fn skip(&mut self) {
        info!("Skipping {}", self.session.current_state);
        self.complete_phase();
    }

    /// One second elapsed
    pub fn on_tick(&mut self) {
        if !self.session.is_running {
            debug!("Ignoring tick while paused");
            return;
        }

        if self.session.remaining_seconds > 0 {
            self.session.remaining_seconds -= 1;
        } else {
            self.complete_phase();
        }
    }

    /// React to a changed configuration value.
    ///
    /// Any duration change resets the active countdown, even when the
    /// changed duration belongs to a different phase.
    pub fn on_configuration_changed(&mut self, key: SettingKey) {
        if key.is_duration() {
            info!("{} changed, resetting {}", key, self.session.current_state);
            self.reset();
        }
    }

    /// Apply a normalized setting value and react to it
    pub fn set_setting(&mut self, key: SettingKey, value: SettingValue) -> Result<(), Error> {
        self.settings.apply(key, value)?;
        self.on_configuration_changed(key);
        Ok(())
    }

    pub fn toggle_skip_breaks(&mut self) -> bool {
        self.settings.skip_breaks = !self.settings.skip_breaks;
        info!("Skip breaks set to: {}", self.settings.skip_breaks);
        self.settings.skip_breaks
    }

    pub fn toggle_auto_start(&mut self) -> bool {
        self.settings.auto_start = !self.settings.auto_start;
        info!("Auto start set to: {}", self.settings.auto_start);
        self.settings.auto_start
    }

    /// Full length of the current phase in seconds
    pub fn total_seconds(&self) -> u64 {
        self.settings.duration_seconds(self.session.current_state)
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        total.saturating_sub(self.session.remaining_seconds) as f64 / total as f64
    }

    /// Remaining time as zero-padded `MM:SS`
    pub fn formatted_time(&self) -> String {
        let remaining = self.session.remaining_seconds;
        format!("{:02}:{:02}", remaining / 60, remaining % 60)
    }

    pub fn state_description(&self) -> &'static str {
        self.session.current_state.description()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            current_state: self.session.current_state,
            state_description: self.state_description().to_string(),
            remaining_seconds: self.session.remaining_seconds,
            formatted_time: self.formatted_time(),
            progress: self.progress(),
            is_running: self.session.is_running,
            completed_work_sessions: self.session.completed_work_sessions,
            skip_breaks: self.settings.skip_breaks,
            auto_start: self.settings.auto_start,
            updated_at: Utc::now(),
        }
    }

    /// Shared by natural completion and `skip`
    fn complete_phase(&mut self) {
        self.pause();

        let finished = self.session.current_state;
        if self.settings.send_notification {
            if let Err(e) = self
                .notifier
                .notify(NOTIFICATION_TITLE, finished.completion_message())
            {
                warn!("Failed to send notification: {}", e);
            }
        }

        let next = self.next_state(finished);
        info!(
            "{} finished, moving to {} (completed work sessions: {})",
            finished, next, self.session.completed_work_sessions
        );
        self.session.current_state = next;
        self.reset();

        if self.settings.auto_start {
            self.start();
        }
    }

    fn next_state(&mut self, finished: TimerState) -> TimerState {
        match finished {
            TimerState::Work => {
                self.session.completed_work_sessions += 1;
                let completed = self.session.completed_work_sessions;
                if self.settings.skip_breaks {
                    TimerState::Work
                } else if completed.checked_rem(self.settings.long_break_interval) == Some(0) {
                    TimerState::LongBreak
                } else {
                    TimerState::ShortBreak
                }
            }
            TimerState::ShortBreak | TimerState::LongBreak => TimerState::Work,
        }
    }
}
