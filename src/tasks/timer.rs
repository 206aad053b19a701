//! Timer background task
//!
//! The only place the engine is mutated. Commands from handles and the
//! one-second tick are serialized through a single `select!` loop.

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::handle::{TimerAction, TimerCommand};
use crate::{
    error::Error,
    settings::{SettingKey, SettingValue, Settings, SettingsStore},
    state::{TimerEngine, TimerSnapshot},
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Interval armed by a particular `start`
struct Ticker {
    generation: u64,
    interval: Interval,
}

/// Background task that owns the engine and drives its countdown
pub async fn timer_task(
    mut engine: TimerEngine,
    mut store: Box<dyn SettingsStore>,
    mut commands: mpsc::Receiver<TimerCommand>,
    snapshots: watch::Sender<TimerSnapshot>,
) {
    info!("Starting timer task");

    let mut ticker: Option<Ticker> = None;
    sync_ticker(&engine, &mut ticker);

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(command) => handle_command(&mut engine, store.as_mut(), &snapshots, command),
                    None => {
                        info!("All timer handles dropped, stopping timer task");
                        break;
                    }
                }
            }

            _ = next_tick(&mut ticker) => {
                engine.on_tick();
                publish(&engine, &snapshots);
            }
        }

        sync_ticker(&engine, &mut ticker);
    }
}

fn publish(engine: &TimerEngine, snapshots: &watch::Sender<TimerSnapshot>) {
    if let Err(e) = snapshots.send(engine.snapshot()) {
        warn!("Failed to publish timer snapshot: {}", e);
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Arm a fresh interval for each `start`, drop it on pause
fn sync_ticker(engine: &TimerEngine, ticker: &mut Option<Ticker>) {
    if !engine.is_running() {
        if ticker.take().is_some() {
            debug!("Tick source cancelled");
        }
        return;
    }

    let generation = engine.tick_generation();
    if ticker.as_ref().map(|t| t.generation) == Some(generation) {
        return;
    }

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    *ticker = Some(Ticker {
        generation,
        interval,
    });
    debug!("Tick source armed (generation {})", generation);
}

/// Apply a command, publish the result, then answer the caller
fn handle_command(
    engine: &mut TimerEngine,
    store: &mut dyn SettingsStore,
    snapshots: &watch::Sender<TimerSnapshot>,
    command: TimerCommand,
) {
    match command {
        TimerCommand::Action { action, reply } => {
            apply_action(engine, store, action);
            publish(engine, snapshots);
            if reply.send(engine.snapshot()).is_err() {
                debug!("Caller dropped before {} completed", action);
            }
        }
        TimerCommand::UpdateSetting { key, value, reply } => {
            let result = update_setting(engine, store, key, value);
            match &result {
                Ok(_) => publish(engine, snapshots),
                Err(e) => warn!("Rejected setting {}: {}", key, e),
            }
            if reply.send(result).is_err() {
                debug!("Caller dropped before setting {} was applied", key);
            }
        }
        TimerCommand::GetSettings { reply } => {
            if reply.send(engine.settings().clone()).is_err() {
                debug!("Caller dropped before settings were read");
            }
        }
    }
}

fn apply_action(engine: &mut TimerEngine, store: &mut dyn SettingsStore, action: TimerAction) {
    debug!("Timer action: {}", action);
    match action {
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Reset => engine.reset(),
        TimerAction::Skip => engine.skip(),
        TimerAction::ToggleSkipBreaks => {
            let value = engine.toggle_skip_breaks();
            persist(store, SettingKey::SkipBreaks, SettingValue::Bool(value));
        }
        TimerAction::ToggleAutoStart => {
            let value = engine.toggle_auto_start();
            persist(store, SettingKey::AutoStart, SettingValue::Bool(value));
        }
    }
}

/// Persist first so a failed write leaves the engine untouched
fn update_setting(
    engine: &mut TimerEngine,
    store: &mut dyn SettingsStore,
    key: SettingKey,
    value: SettingValue,
) -> Result<Settings, Error> {
    let value = key.normalize(value)?;
    store.set(key, value)?;
    engine.set_setting(key, value)?;
    info!("Setting {} updated to {:?}", key, value);
    Ok(engine.settings().clone())
}

fn persist(store: &mut dyn SettingsStore, key: SettingKey, value: SettingValue) {
    if let Err(e) = store.set(key, value) {
        warn!("Failed to persist {}: {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::LogNotifier,
        settings::MemoryStore,
        state::TimerState,
        tasks::spawn_timer,
    };

    fn spawn(settings: Settings) -> crate::tasks::TimerHandle {
        let engine = TimerEngine::new(settings, Box::new(LogNotifier));
        spawn_timer(engine, Box::new(MemoryStore::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_once_per_second_while_running() {
        let handle = spawn(Settings::default());
        handle.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.snapshot().remaining_seconds, 25 * 60 - 3);

        let paused = handle.pause().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().remaining_seconds, paused.remaining_seconds);
        assert!(!handle.snapshot().is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn natural_completion_with_auto_start_keeps_running() {
        let handle = spawn(Settings {
            work_minutes: 1,
            auto_start: true,
            ..Settings::default()
        });
        handle.start().await.unwrap();

        // 60 decrements plus the tick that observes zero
        tokio::time::sleep(Duration::from_millis(61_500)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_state, TimerState::ShortBreak);
        assert!(snapshot.is_running);
        assert_eq!(snapshot.completed_work_sessions, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.snapshot().remaining_seconds, 5 * 60 - 2);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_update_resets_running_break() {
        let handle = spawn(Settings::default());
        handle.skip().await.unwrap();
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let settings = handle
            .update_setting(SettingKey::PomodoroMinutes, SettingValue::Int(40))
            .await
            .unwrap();
        assert_eq!(settings.work_minutes, 40);

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.current_state, TimerState::ShortBreak);
        assert_eq!(snapshot.remaining_seconds, 5 * 60);
        assert!(!snapshot.is_running);
    }

    #[tokio::test]
    async fn updates_are_clamped_and_validated() {
        let handle = spawn(Settings::default());

        let settings = handle
            .update_setting(SettingKey::LongBreakInterval, SettingValue::Int(0))
            .await
            .unwrap();
        assert_eq!(settings.long_break_interval, 1);

        let err = handle
            .update_setting(SettingKey::SkipBreaks, SettingValue::Int(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WrongKind { .. }));
    }

    #[tokio::test]
    async fn toggles_flip_flags() {
        let handle = spawn(Settings::default());
        let snapshot = handle.perform(TimerAction::ToggleSkipBreaks).await.unwrap();
        assert!(snapshot.skip_breaks);

        let snapshot = handle.perform(TimerAction::ToggleAutoStart).await.unwrap();
        assert!(snapshot.auto_start);

        let settings = handle.settings().await.unwrap();
        assert!(settings.skip_breaks && settings.auto_start);
    }
}
