//! Background tasks module
//!
//! The timer task owns the engine; every other part of the program talks to
//! it through a [`TimerHandle`].

pub mod handle;
pub mod status_bar;
pub mod timer;

// Re-export main types and functions
pub use handle::{spawn_timer, TimerAction, TimerCommand, TimerHandle};
pub use status_bar::status_bar_task;
pub use timer::timer_task;
