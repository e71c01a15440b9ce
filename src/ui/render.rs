//! Drawing the timer screen

use std::io::{self, Write};

use chrono::{DateTime, Local};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};

use crate::state::{DisplayBinding, TimerState};

const HELP: &str = "←/→ 1 min  ↓/↑ 5 min  Enter start  q quit";

/// Where the slider track sits on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderLayout {
    pub row: u16,
    pub start_col: u16,
    pub width: u16,
    pub max: u32,
}

impl SliderLayout {
    /// Lay out a slider over `0..=max` on a `cols` x `rows` terminal
    pub fn new(cols: u16, rows: u16, max: u32) -> Self {
        let width = cols.saturating_sub(12).clamp(2, 100);
        Self {
            row: (rows / 2).saturating_add(1),
            start_col: cols.saturating_sub(width) / 2,
            width,
            max,
        }
    }

    /// Column of the thumb for `position`
    pub fn column_for(&self, position: u32) -> u16 {
        let span = u32::from(self.width - 1);
        let offset = position.min(self.max) * span / self.max.max(1);
        self.start_col + offset as u16
    }

    /// Slider position under `col`, or `None` if it is off the track
    pub fn position_at(&self, col: u16, row: u16) -> Option<u32> {
        if row != self.row || col < self.start_col || col >= self.start_col + self.width {
            return None;
        }
        let span = u32::from(self.width - 1);
        let offset = u32::from(col - self.start_col);
        Some((offset * self.max + span / 2) / span)
    }

    /// Track drawn as `━━━●───`
    pub fn track(&self, position: u32) -> String {
        let thumb = usize::from(self.column_for(position) - self.start_col);
        let width = usize::from(self.width);
        let mut track = String::with_capacity(width * 3);
        for index in 0..width {
            track.push(match index.cmp(&thumb) {
                std::cmp::Ordering::Less => '━',
                std::cmp::Ordering::Equal => '●',
                std::cmp::Ordering::Greater => '─',
            });
        }
        track
    }
}

/// Everything the screen needs for one frame
pub struct Frame<'a> {
    pub display: &'a DisplayBinding,
    pub state: TimerState,
    pub cycles_completed: u64,
    pub last_completed_at: Option<DateTime<Local>>,
}

/// One-line summary of the timer
pub fn status_line(
    state: TimerState,
    cycles_completed: u64,
    last_completed_at: Option<DateTime<Local>>,
) -> String {
    let mut status = match state.duration_minutes() {
        Some(minutes) => format!("Focusing for {} min", minutes),
        None => "Stopped".to_string(),
    };
    if cycles_completed > 0 {
        status.push_str(&format!(" · {} completed", cycles_completed));
    }
    if let Some(at) = last_completed_at {
        status.push_str(&format!(" · last at {}", at.format("%H:%M")));
    }
    status
}

pub fn draw<W: Write>(out: &mut W, layout: &SliderLayout, frame: &Frame<'_>) -> io::Result<()> {
    let time = format!(
        "{} {}",
        frame.display.minutes_text(),
        frame.display.seconds_text()
    );
    let status = status_line(frame.state, frame.cycles_completed, frame.last_completed_at);
    let position = frame.display.slider().position();

    queue!(out, Clear(ClearType::All))?;
    print_centered(out, layout, layout.row.saturating_sub(3), &time, true)?;
    queue!(
        out,
        MoveTo(layout.start_col, layout.row),
        Print(layout.track(position)),
        Print(format!(" {:>2}'", position))
    )?;
    print_centered(out, layout, layout.row + 2, &status, false)?;
    print_centered(out, layout, layout.row + 4, HELP, false)?;
    out.flush()
}

fn print_centered<W: Write>(
    out: &mut W,
    layout: &SliderLayout,
    row: u16,
    text: &str,
    bold: bool,
) -> io::Result<()> {
    let len = text.chars().count() as u16;
    let center = layout.start_col + layout.width / 2;
    let col = center.saturating_sub(len / 2);
    queue!(out, MoveTo(col, row))?;
    if bold {
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset)
        )
    } else {
        queue!(out, Print(text))
    }
}
