//! Handle for sending commands to the timer task

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use super::timer::timer_task;
use crate::{
    error::Error,
    settings::{SettingKey, SettingValue, Settings, SettingsStore},
    state::{TimerEngine, TimerSnapshot},
};

/// User-facing control actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    Skip,
    ToggleSkipBreaks,
    ToggleAutoStart,
}

impl TimerAction {
    pub fn name(self) -> &'static str {
        match self {
            TimerAction::Start => "start",
            TimerAction::Pause => "pause",
            TimerAction::Reset => "reset",
            TimerAction::Skip => "skip",
            TimerAction::ToggleSkipBreaks => "toggle-skip-breaks",
            TimerAction::ToggleAutoStart => "toggle-auto-start",
        }
    }
}

impl fmt::Display for TimerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Messages marshaled onto the timer task
#[derive(Debug)]
pub enum TimerCommand {
    Action {
        action: TimerAction,
        reply: oneshot::Sender<TimerSnapshot>,
    },
    UpdateSetting {
        key: SettingKey,
        value: SettingValue,
        reply: oneshot::Sender<Result<Settings, Error>>,
    },
    GetSettings {
        reply: oneshot::Sender<Settings>,
    },
}

/// Non-owning, cloneable handle to the timer task.
///
/// Dropping every handle stops the task.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    pub fn new(
        commands: mpsc::Sender<TimerCommand>,
        snapshots: watch::Receiver<TimerSnapshot>,
    ) -> Self {
        Self {
            commands,
            snapshots,
        }
    }

    /// Run a control action and return the resulting snapshot
    pub async fn perform(&self, action: TimerAction) -> Result<TimerSnapshot, Error> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(TimerCommand::Action { action, reply })
            .await
            .map_err(|_| Error::TimerUnavailable)?;
        rx.await.map_err(|_| Error::TimerUnavailable)
    }

    pub async fn start(&self) -> Result<TimerSnapshot, Error> {
        self.perform(TimerAction::Start).await
    }

    pub async fn pause(&self) -> Result<TimerSnapshot, Error> {
        self.perform(TimerAction::Pause).await
    }

    pub async fn reset(&self) -> Result<TimerSnapshot, Error> {
        self.perform(TimerAction::Reset).await
    }

    pub async fn skip(&self) -> Result<TimerSnapshot, Error> {
        self.perform(TimerAction::Skip).await
    }

    /// Validate, persist and apply a setting
    pub async fn update_setting(
        &self,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<Settings, Error> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(TimerCommand::UpdateSetting { key, value, reply })
            .await
            .map_err(|_| Error::TimerUnavailable)?;
        rx.await.map_err(|_| Error::TimerUnavailable)?
    }

    pub async fn settings(&self) -> Result<Settings, Error> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(TimerCommand::GetSettings { reply })
            .await
            .map_err(|_| Error::TimerUnavailable)?;
        rx.await.map_err(|_| Error::TimerUnavailable)
    }

    /// Most recently published snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }
}

/// Spawn the timer task on the current runtime and return a handle to it
pub fn spawn_timer(engine: TimerEngine, store: Box<dyn SettingsStore>) -> TimerHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

    tokio::spawn(timer_task(engine, store, command_rx, snapshot_tx));

    TimerHandle::new(command_tx, snapshot_rx)
}
