//! Pomorin - a headless Pomodoro timer
//!
//! Runs the timer task, the status-bar title renderer and the local control
//! server until SIGINT/SIGTERM.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomorin::{
    api::create_router,
    config::Config,
    settings::{JsonFileStore, Settings},
    state::{AppState, TimerEngine},
    tasks::{spawn_timer, status_bar_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomorin={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomorin v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonFileStore::open(config.settings_path());
    let settings = Settings::load(&store);
    info!(
        "Configuration: work={}min, short={}min, long={}min, long break every {} sessions",
        settings.work_minutes,
        settings.short_break_minutes,
        settings.long_break_minutes,
        settings.long_break_interval
    );

    // The timer task is the single owner of the engine
    let engine = TimerEngine::new(settings, config.notifier());
    let timer = spawn_timer(engine, Box::new(store));

    tokio::spawn(status_bar_task(timer.subscribe(), config.print_title));

    let state = Arc::new(AppState::new(timer, config.port, config.host.clone()));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start, /pause, /reset, /skip");
    info!("  POST /toggle/skip-breaks, /toggle/auto-start");
    info!("  GET  /settings, PUT /settings/:key");
    info!("  GET  /status, /health");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Pomorin shutdown complete");
    Ok(())
}
