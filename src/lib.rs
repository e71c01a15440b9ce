//! Pomodoro Timer - A single-screen terminal focus timer
//!
//! This library provides the countdown, slider, display and sound logic of
//! the timer together with the terminal front end that drives it.

pub mod app;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{TimerController, TimerState};
pub use tasks::CountdownEngine;
pub use utils::signals::shutdown_signal;
