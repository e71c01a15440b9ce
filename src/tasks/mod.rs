//! Background tasks module
//!
//! This module contains the countdown task that drives the timer.

pub mod countdown;

// Re-export main types
pub use countdown::{CountdownEngine, CountdownEvent, CountdownId, TICK_INTERVAL};
