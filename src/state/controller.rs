//! Timer controller: mediates the slider, the countdown and the sounds

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{
    display::DisplayBinding,
    slider::{ChangeOrigin, SliderEvent},
    timer_state::{minutes_to_millis, TimerState},
};
use crate::{
    services::{SoundBackend, SoundEffects, SoundKind, SoundLoaded},
    tasks::{CountdownEngine, CountdownEvent},
};

/// Raw slider interactions coming from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderGesture {
    /// The user grabbed the slider
    Begin,
    /// Move by a number of minutes
    Step(i32),
    /// Move to an absolute position
    MoveTo(u32),
    /// The user let go
    Release,
}

/// Host visibility signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Sole owner and mutator of the timer state
#[derive(Debug)]
pub struct TimerController<B> {
    state: TimerState,
    engine: CountdownEngine,
    sounds: SoundEffects<B>,
    display: DisplayBinding,
    cycles_completed: u64,
    last_completed_at: Option<DateTime<Local>>,
    visible: bool,
    /// Ticking that should have started while the host was hidden
    ticking_deferred: bool,
}

impl<B: SoundBackend> TimerController<B> {
    /// Create an idle controller; countdown events are sent to `countdown_tx`
    pub fn new(
        max_minutes: u32,
        sounds: SoundEffects<B>,
        countdown_tx: mpsc::UnboundedSender<CountdownEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(),
            engine: CountdownEngine::new(countdown_tx),
            sounds,
            display: DisplayBinding::new(max_minutes),
            cycles_completed: 0,
            last_completed_at: None,
            visible: true,
            ticking_deferred: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn display(&self) -> &DisplayBinding {
        &self.display
    }

    pub fn sounds(&self) -> &SoundEffects<B> {
        &self.sounds
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Local>> {
        self.last_completed_at
    }

    /// Translate a UI gesture into slider transitions and handle each of them
    pub fn handle_gesture(&mut self, gesture: SliderGesture) {
        debug!("Slider gesture: {:?}", gesture);
        match gesture {
            SliderGesture::Begin => {
                let event = self.display.slider_mut().begin_tracking();
                self.dispatch(event);
            }
            SliderGesture::Step(delta) => {
                let begin = self.display.slider_mut().begin_tracking();
                self.dispatch(begin);
                let event = self
                    .display
                    .slider_mut()
                    .step(delta, ChangeOrigin::UserInitiated);
                self.dispatch(event);
            }
            SliderGesture::MoveTo(position) => {
                let begin = self.display.slider_mut().begin_tracking();
                self.dispatch(begin);
                let event = self
                    .display
                    .slider_mut()
                    .set_position(position, ChangeOrigin::UserInitiated);
                self.dispatch(event);
            }
            SliderGesture::Release => {
                let event = self.display.slider_mut().end_tracking();
                self.dispatch(event);
            }
        }
    }

    /// React to a slider notification
    pub fn on_slider_event(&mut self, event: SliderEvent) {
        match event {
            SliderEvent::StartTracking => self.stop_countdown(),
            SliderEvent::ProgressChanged {
                position,
                origin: ChangeOrigin::UserInitiated,
            } => {
                self.display.update_remain_times(minutes_to_millis(position));
            }
            SliderEvent::ProgressChanged {
                origin: ChangeOrigin::ProgrammaticUpdate,
                ..
            } => {}
            SliderEvent::StopTracking { position: 0 } => self.stop_countdown(),
            SliderEvent::StopTracking { position } => self.start_countdown(position),
        }
    }

    /// React to an event from the countdown task
    pub fn on_countdown_event(&mut self, event: CountdownEvent) {
        if !self.engine.is_current(event.id()) {
            debug!("Dropping event from stale countdown {:?}", event.id());
            return;
        }

        match event {
            CountdownEvent::Tick { remaining_millis, .. } => {
                self.state.set_remaining(remaining_millis);
                self.display.update_remain_times(remaining_millis);
                let change = self.display.update_seek_bar(remaining_millis);
                self.dispatch(change);
            }
            CountdownEvent::Finished { id } => {
                self.engine.finish(id);
                let duration_minutes = self.state.duration_minutes().unwrap_or(0);
                self.complete_countdown();
                if duration_minutes > 0 {
                    self.start_countdown(duration_minutes);
                } else {
                    self.state = TimerState::Idle;
                }
            }
        }
    }

    /// Register a loaded clip. A ticking clip that arrives mid-countdown
    /// starts playing straight away, or once the host is visible again.
    pub fn on_sound_loaded(&mut self, loaded: SoundLoaded) {
        let kind = loaded.kind;
        self.sounds.on_loaded(loaded);
        if kind == SoundKind::Ticking && self.state.is_active() {
            self.start_ticking();
        }
    }

    /// Pause or resume sound to follow host visibility; the countdown keeps running
    pub fn on_visibility(&mut self, visibility: Visibility) {
        info!("Host became {:?}", visibility);
        match visibility {
            Visibility::Visible => {
                self.visible = true;
                if !self.state.is_active() {
                    return;
                }
                self.sounds.resume_all();
                if std::mem::take(&mut self.ticking_deferred) {
                    self.sounds.play_looping(SoundKind::Ticking);
                }
            }
            Visibility::Hidden => {
                self.visible = false;
                self.sounds.pause_all();
            }
        }
    }

    /// Stop everything and free sound memory
    pub fn shutdown(&mut self) {
        self.engine.cancel();
        self.state = TimerState::Idle;
        self.sounds.release();
    }

    /// Begin a countdown as though the slider had been released at `minutes`;
    /// `0` leaves the timer idle
    pub fn start_at(&mut self, minutes: u32) {
        let change = self
            .display
            .slider_mut()
            .set_position(minutes, ChangeOrigin::UserInitiated);
        self.dispatch(change);
        let position = self.display.slider().position();
        self.on_slider_event(SliderEvent::StopTracking { position });
    }

    fn dispatch(&mut self, event: Option<SliderEvent>) {
        if let Some(event) = event {
            self.on_slider_event(event);
        }
    }

    fn start_countdown(&mut self, duration_minutes: u32) {
        let total_millis = minutes_to_millis(duration_minutes);
        info!("Starting {} minute countdown", duration_minutes);
        self.engine.start(total_millis);
        self.state = TimerState::running(duration_minutes);
        self.display.update_remain_times(total_millis);
        let change = self.display.update_seek_bar(total_millis);
        self.dispatch(change);
        self.start_ticking();
    }

    fn start_ticking(&mut self) {
        if self.visible {
            self.sounds.play_looping(SoundKind::Ticking);
        } else {
            debug!("Host hidden, ticking starts when it is visible again");
            self.ticking_deferred = true;
        }
    }

    fn stop_countdown(&mut self) {
        if self.engine.cancel() {
            info!("Countdown stopped");
        }
        self.state = TimerState::Idle;
        self.ticking_deferred = false;
        self.sounds.stop_all();
    }

    fn complete_countdown(&mut self) {
        self.cycles_completed += 1;
        self.last_completed_at = Some(Local::now());
        info!("Countdown complete, {} cycles so far", self.cycles_completed);

        self.display.update_remain_times(0);
        let change = self.display.update_seek_bar(0);
        self.dispatch(change);

        self.ticking_deferred = false;
        self.sounds.stop_all();
        self.sounds.play_once(SoundKind::Bell);
    }
}
