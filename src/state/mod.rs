//! Timer state management
//!
//! The phase enumeration, the mutable session, and the engine that drives it.

pub mod engine;
pub mod session;
pub mod timer_state;
pub mod app_state;

pub use app_state::AppState;
pub use engine::TimerEngine;
pub use session::{TimerSession, TimerSnapshot};
pub use timer_state::TimerState;
