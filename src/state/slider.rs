//! Minute slider that is both an input and an output control

/// Who caused a slider change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// The user dragged, clicked or stepped the slider
    UserInitiated,
    /// The countdown moved the slider to follow the remaining time
    ProgrammaticUpdate,
}

/// Notifications emitted by the slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderEvent {
    /// The user touched the slider
    StartTracking,
    /// The position changed
    ProgressChanged { position: u32, origin: ChangeOrigin },
    /// The user let go of the slider at `position`
    StopTracking { position: u32 },
}

/// Integer slider over `0..=max`
#[derive(Debug, Clone)]
pub struct Slider {
    position: u32,
    max: u32,
    tracking: bool,
}

impl Slider {
    pub fn new(max: u32) -> Self {
        Self {
            position: 0,
            max,
            tracking: false,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns `None` if the user already holds the slider.
    pub fn begin_tracking(&mut self) -> Option<SliderEvent> {
        if self.tracking {
            return None;
        }
        self.tracking = true;
        Some(SliderEvent::StartTracking)
    }

    /// Returns `None` if the slider was not being held.
    pub fn end_tracking(&mut self) -> Option<SliderEvent> {
        if !self.tracking {
            return None;
        }
        self.tracking = false;
        Some(SliderEvent::StopTracking {
            position: self.position,
        })
    }

    /// Move the slider, clamping to its range. A notification is only
    /// produced when the position actually changes.
    pub fn set_position(&mut self, position: u32, origin: ChangeOrigin) -> Option<SliderEvent> {
        let position = position.min(self.max);
        if position == self.position {
            return None;
        }
        self.position = position;
        Some(SliderEvent::ProgressChanged { position, origin })
    }

    /// Move by `delta` steps, saturating at both ends
    pub fn step(&mut self, delta: i32, origin: ChangeOrigin) -> Option<SliderEvent> {
        let target = if delta.is_negative() {
            self.position.saturating_sub(delta.unsigned_abs())
        } else {
            self.position.saturating_add(delta.unsigned_abs())
        };
        self.set_position(target, origin)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, 3, 3 ; "up from zero")]
    #[test_case(58, 5, 60 ; "clamped at max")]
    #[test_case(2, -5, 0 ; "clamped at zero")]
    fn step_clamps(start: u32, delta: i32, expected: u32) {
        let mut slider = Slider::new(60);
        slider.set_position(start, ChangeOrigin::ProgrammaticUpdate);
        slider.step(delta, ChangeOrigin::UserInitiated);
        assert_eq!(slider.position(), expected);
    }

    #[test]
    fn unchanged_position_is_silent() {
        let mut slider = Slider::new(60);
        assert_eq!(
            slider.set_position(10, ChangeOrigin::UserInitiated),
            Some(SliderEvent::ProgressChanged {
                position: 10,
                origin: ChangeOrigin::UserInitiated
            })
        );
        assert_eq!(slider.set_position(10, ChangeOrigin::UserInitiated), None);
    }

    #[test]
    fn tracking_pairs_begin_and_end() {
        let mut slider = Slider::new(60);
        assert_eq!(slider.end_tracking(), None);
        assert_eq!(slider.begin_tracking(), Some(SliderEvent::StartTracking));
        assert_eq!(slider.begin_tracking(), None);
        slider.set_position(7, ChangeOrigin::UserInitiated);
        assert_eq!(
            slider.end_tracking(),
            Some(SliderEvent::StopTracking { position: 7 })
        );
        assert_eq!(slider.end_tracking(), None);
    }
}
