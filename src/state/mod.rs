//! State management module
//!
//! This module contains the timer state, the slider and display models, and
//! the controller that ties them to the countdown and the sounds.

pub mod controller;
pub mod display;
pub mod slider;
pub mod timer_state;

// Re-export main types
pub use controller::{SliderGesture, TimerController, Visibility};
pub use display::DisplayBinding;
pub use slider::{ChangeOrigin, Slider, SliderEvent};
pub use timer_state::{minutes_to_millis, TimerState};
