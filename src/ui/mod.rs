//! Terminal user interface module
//!
//! This module contains input translation, drawing and terminal handling for
//! the single timer screen.

pub mod debouncer;
pub mod input;
pub mod render;
pub mod terminal;

// Re-export main types
pub use debouncer::Debouncer;
pub use input::{start_crossterm_stream, InputSource, InputState, UiEvent};
pub use render::{draw, status_line, Frame, SliderLayout};
