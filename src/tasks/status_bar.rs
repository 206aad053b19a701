//! Status-bar title background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{presenter::StatusBar, state::TimerSnapshot};

/// Re-render the status-bar title on every published snapshot
pub async fn status_bar_task(mut snapshots: watch::Receiver<TimerSnapshot>, print: bool) {
    info!("Starting status bar task");

    let mut bar = StatusBar::new();
    show(bar.title(), print);

    loop {
        let changed = {
            let snapshot = snapshots.borrow_and_update();
            bar.render(&snapshot)
        };
        if changed {
            show(bar.title(), print);
        }

        if snapshots.changed().await.is_err() {
            debug!("Timer task stopped, status bar task exiting");
            break;
        }
    }
}

fn show(title: &str, print: bool) {
    debug!("Status bar title: {}", title);
    if print {
        println!("{}", title);
    }
}
