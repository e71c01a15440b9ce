//! Translation of terminal input into timer gestures

use std::io::IsTerminal;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use super::render::SliderLayout;
use crate::state::{SliderGesture, Visibility};

/// Where a slider gesture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Keys have no release, so the slider is released after a quiet period
    Keyboard,
    Mouse,
}

/// Interaction events understood by the app loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Slider {
        gesture: SliderGesture,
        source: InputSource,
    },
    Visibility(Visibility),
    Resize { cols: u16, rows: u16 },
    Quit,
}

pub fn start_crossterm_stream(tx: mpsc::Sender<Event>) -> Option<JoinHandle<()>> {
    // quick check if stdin is tty
    if !std::io::stdin().is_terminal() {
        return None;
    }

    let mut events = EventStream::new();
    Some(tokio::spawn(async move {
        while let Some(Ok(event)) = events.next().await {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    }))
}

/// Tracks whether a mouse drag on the slider is in progress
#[derive(Debug, Default)]
pub struct InputState {
    mouse_held: bool,
}

impl InputState {
    /// Maps a crossterm event to a UI event
    pub fn handle_crossterm_event(&mut self, event: Event, layout: &SliderLayout) -> Option<UiEvent> {
        match event {
            Event::Key(key) => translate_key_event(key, layout.max),
            Event::Mouse(mouse) => self.translate_mouse_event(mouse, layout),
            Event::FocusGained => Some(UiEvent::Visibility(Visibility::Visible)),
            Event::FocusLost => Some(UiEvent::Visibility(Visibility::Hidden)),
            Event::Resize(cols, rows) => Some(UiEvent::Resize { cols, rows }),
            _ => None,
        }
    }

    fn translate_mouse_event(&mut self, mouse: MouseEvent, layout: &SliderLayout) -> Option<UiEvent> {
        let gesture = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let position = layout.position_at(mouse.column, mouse.row)?;
                self.mouse_held = true;
                SliderGesture::MoveTo(position)
            }
            MouseEventKind::Drag(MouseButton::Left) if self.mouse_held => {
                // Dragging may leave the track row; follow the column only
                let row = layout.row;
                let col = mouse
                    .column
                    .clamp(layout.start_col, layout.start_col + layout.width - 1);
                SliderGesture::MoveTo(layout.position_at(col, row)?)
            }
            MouseEventKind::Up(MouseButton::Left) if self.mouse_held => {
                self.mouse_held = false;
                SliderGesture::Release
            }
            _ => return None,
        };
        debug!("Mouse gesture {:?}", gesture);
        Some(UiEvent::Slider {
            gesture,
            source: InputSource::Mouse,
        })
    }
}

/// Converts a key press into a UI event
fn translate_key_event(key_event: KeyEvent, max: u32) -> Option<UiEvent> {
    // Windows also reports key releases
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    let gesture = match key_event.code {
        KeyCode::Char('c') if key_event.modifiers == KeyModifiers::CONTROL => {
            return Some(UiEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => return Some(UiEvent::Quit),
        KeyCode::Left | KeyCode::Char('h') => SliderGesture::Step(-1),
        KeyCode::Right | KeyCode::Char('l') => SliderGesture::Step(1),
        KeyCode::Down | KeyCode::Char('j') => SliderGesture::Step(-5),
        KeyCode::Up | KeyCode::Char('k') => SliderGesture::Step(5),
        KeyCode::Home | KeyCode::Char('0') => SliderGesture::MoveTo(0),
        KeyCode::End => SliderGesture::MoveTo(max),
        KeyCode::Enter | KeyCode::Char(' ') => SliderGesture::Release,
        _ => return None,
    };
    Some(UiEvent::Slider {
        gesture,
        source: InputSource::Keyboard,
    })
}
