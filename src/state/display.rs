//! Remaining-time text fields and slider synchronization

use super::slider::{ChangeOrigin, Slider, SliderEvent};

/// What the screen shows: two text fields and the minute slider
#[derive(Debug, Clone)]
pub struct DisplayBinding {
    minutes_text: String,
    seconds_text: String,
    slider: Slider,
}

impl DisplayBinding {
    pub fn new(max_minutes: u32) -> Self {
        let mut display = Self {
            minutes_text: String::new(),
            seconds_text: String::new(),
            slider: Slider::new(max_minutes),
        };
        display.update_remain_times(0);
        display
    }

    /// Write zero-padded minutes (with the minute mark) and seconds
    pub fn update_remain_times(&mut self, remain_millis: u64) {
        let remain_seconds = remain_millis / 1000;
        self.minutes_text = format!("{:02}'", remain_seconds / 60);
        self.seconds_text = format!("{:02}", remain_seconds % 60);
    }

    /// Move the slider to the whole minutes remaining. The returned
    /// notification is always tagged as a programmatic update.
    pub fn update_seek_bar(&mut self, remain_millis: u64) -> Option<SliderEvent> {
        let minutes = u32::try_from(remain_millis / 1000 / 60).unwrap_or(u32::MAX);
        self.slider.set_position(minutes, ChangeOrigin::ProgrammaticUpdate)
    }

    pub fn minutes_text(&self) -> &str {
        &self.minutes_text
    }

    pub fn seconds_text(&self) -> &str {
        &self.seconds_text
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn slider_mut(&mut self) -> &mut Slider {
        &mut self.slider
    }
}
