//! The timer task under a paused tokio clock.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pomorin::{
    notify::Notifier,
    settings::{JsonFileStore, MemoryStore, SettingKey, SettingValue, Settings},
    spawn_timer,
    tasks::TimerAction,
    TimerEngine, TimerState,
};

#[derive(Default, Clone)]
struct RecordingNotifier {
    bodies: Arc<Mutex<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, body: &str) -> Result<(), String> {
        self.bodies.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn full_cycle_runs_unattended_with_auto_start() {
    let notifier = RecordingNotifier::default();
    let settings = Settings {
        work_minutes: 1,
        short_break_minutes: 1,
        long_break_minutes: 1,
        long_break_interval: 2,
        auto_start: true,
        ..Settings::default()
    };
    let engine = TimerEngine::new(settings, Box::new(notifier.clone()));
    let handle = spawn_timer(engine, Box::new(MemoryStore::new()));
    let mut snapshots = handle.subscribe();

    handle.start().await.unwrap();

    // Each one-minute phase takes 61 ticks: 60 decrements and one at zero
    tokio::time::sleep(Duration::from_millis(4 * 61_000 + 500)).await;

    let snapshot = snapshots.borrow_and_update().clone();
    assert_eq!(snapshot.current_state, TimerState::Work);
    assert_eq!(snapshot.completed_work_sessions, 2);
    assert!(snapshot.is_running);
    assert_eq!(
        notifier.bodies.lock().unwrap().clone(),
        vec![
            "Pomodoro timer ended!",
            "Short break ended!",
            "Pomodoro timer ended!",
            "Long break ended!",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn without_auto_start_the_next_phase_waits() {
    let settings = Settings {
        work_minutes: 1,
        ..Settings::default()
    };
    let engine = TimerEngine::new(settings, Box::new(RecordingNotifier::default()));
    let handle = spawn_timer(engine, Box::new(MemoryStore::new()));

    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.current_state, TimerState::ShortBreak);
    assert_eq!(snapshot.remaining_seconds, 5 * 60);
    assert!(!snapshot.is_running);
}

#[tokio::test(start_paused = true)]
async fn restart_after_pause_waits_a_full_second() {
    let engine = TimerEngine::new(Settings::default(), Box::new(RecordingNotifier::default()));
    let handle = spawn_timer(engine, Box::new(MemoryStore::new()));

    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    handle.pause().await.unwrap();
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(handle.snapshot().remaining_seconds, 25 * 60 - 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.snapshot().remaining_seconds, 25 * 60 - 2);
}

#[tokio::test]
async fn settings_changes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    {
        let store = JsonFileStore::open(&path);
        let engine = TimerEngine::new(Settings::load(&store), Box::new(RecordingNotifier::default()));
        let handle = spawn_timer(engine, Box::new(store));
        handle
            .update_setting(SettingKey::LongBreakMinutes, SettingValue::Int(20))
            .await
            .unwrap();
        handle.perform(TimerAction::ToggleAutoStart).await.unwrap();
    }

    let settings = Settings::load(&JsonFileStore::open(&path));
    assert_eq!(settings.long_break_minutes, 20);
    assert!(settings.auto_start);
    assert_eq!(settings.work_minutes, 25);
}

#[tokio::test(start_paused = true)]
async fn failed_persist_leaves_the_running_countdown_alone() {
    let dir = tempfile::tempdir().unwrap();

    // A directory cannot be written as a settings file
    let store = JsonFileStore::open(dir.path());
    let engine = TimerEngine::new(Settings::load(&store), Box::new(RecordingNotifier::default()));
    let handle = spawn_timer(engine, Box::new(store));

    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let err = handle
        .update_setting(SettingKey::PomodoroMinutes, SettingValue::Int(40))
        .await
        .unwrap_err();
    assert!(matches!(err, pomorin::Error::Persist(_)));

    let snapshot = handle.snapshot();
    assert!(snapshot.is_running);
    assert_eq!(snapshot.remaining_seconds, 25 * 60 - 2);
    assert_eq!(handle.settings().await.unwrap().work_minutes, 25);
}
