use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

use pomodoro_timer::{
    services::{ClipId, Repeat, SoundBackend, SoundEffects, SoundKind, SoundLoaded},
    state::{SliderGesture, TimerController, TimerState, Visibility},
    tasks::CountdownEvent,
};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Play(ClipId, Repeat),
    PauseAll,
    ResumeAll,
    StopAll,
    Release,
}

const TICKING: ClipId = ClipId(0);
const BELL: ClipId = ClipId(1);

#[derive(Debug, Default, Clone)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    loaded: usize,
}

impl Recorder {
    fn count(&self, call: Call) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl SoundBackend for Recorder {
    fn load(&mut self, _kind: SoundKind, _bytes: Arc<[u8]>) -> Result<ClipId, String> {
        self.loaded += 1;
        Ok(ClipId(self.loaded - 1))
    }

    fn play(&mut self, clip: ClipId, repeat: Repeat) {
        self.calls.borrow_mut().push(Call::Play(clip, repeat));
    }

    fn pause_all(&mut self) {
        self.calls.borrow_mut().push(Call::PauseAll);
    }

    fn resume_all(&mut self) {
        self.calls.borrow_mut().push(Call::ResumeAll);
    }

    fn stop_all(&mut self) {
        self.calls.borrow_mut().push(Call::StopAll);
    }

    fn release(&mut self) {
        self.calls.borrow_mut().push(Call::Release);
    }
}

struct Harness {
    controller: TimerController<Recorder>,
    events: UnboundedReceiver<CountdownEvent>,
    recorder: Recorder,
}

impl Harness {
    fn new() -> Self {
        let recorder = Recorder::default();
        let (tx, events) = mpsc::unbounded_channel();
        let mut controller = TimerController::new(60, SoundEffects::new(recorder.clone()), tx);
        controller.on_sound_loaded(loaded(SoundKind::Ticking));
        controller.on_sound_loaded(loaded(SoundKind::Bell));
        Self {
            controller,
            events,
            recorder,
        }
    }

    fn release_at(&mut self, minutes: u32) {
        self.controller.handle_gesture(SliderGesture::MoveTo(minutes));
        self.controller.handle_gesture(SliderGesture::Release);
    }

    async fn next_event(&mut self) -> CountdownEvent {
        self.events.recv().await.expect("countdown channel open")
    }

    /// Forward events until a countdown finishes; returns the ticks seen
    async fn run_to_completion(&mut self) -> Vec<u64> {
        let mut ticks = Vec::new();
        loop {
            let event = self.next_event().await;
            self.controller.on_countdown_event(event);
            match event {
                CountdownEvent::Tick {
                    remaining_millis, ..
                } => ticks.push(remaining_millis),
                CountdownEvent::Finished { .. } => return ticks,
            }
        }
    }
}

fn loaded(kind: SoundKind) -> SoundLoaded {
    SoundLoaded {
        kind,
        result: Ok(vec![0x52, 0x49, 0x46, 0x46]),
    }
}

#[tokio::test(start_paused = true)]
async fn releasing_at_zero_stays_idle() {
    let mut h = Harness::new();
    h.controller.handle_gesture(SliderGesture::Begin);
    h.controller.handle_gesture(SliderGesture::Release);

    assert_eq!(h.controller.state(), TimerState::Idle);
    assert_eq!(h.recorder.count(Call::Play(TICKING, Repeat::Forever)), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn releasing_at_k_starts_k_minutes() {
    let mut h = Harness::new();
    h.release_at(3);

    assert_eq!(h.controller.state(), TimerState::running(3));
    assert_eq!(h.controller.state().remaining_millis(), Some(180_000));
    assert_eq!(h.controller.display().minutes_text(), "03'");
    assert_eq!(h.controller.display().seconds_text(), "00");
    assert_eq!(h.recorder.count(Call::Play(TICKING, Repeat::Forever)), 1);
}

#[tokio::test(start_paused = true)]
async fn dragging_shows_the_selected_duration() {
    let mut h = Harness::new();
    h.controller.handle_gesture(SliderGesture::Step(5));
    h.controller.handle_gesture(SliderGesture::Step(-1));

    assert_eq!(h.controller.display().slider().position(), 4);
    assert_eq!(h.controller.display().minutes_text(), "04'");
    assert_eq!(h.controller.state(), TimerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn ticks_follow_the_countdown_without_stopping_it() {
    let mut h = Harness::new();
    h.release_at(2);
    h.recorder.clear();

    let event = h.next_event().await;
    h.controller.on_countdown_event(event);

    assert!(h.controller.state().is_active());
    assert_eq!(h.controller.state().remaining_millis(), Some(119_000));
    assert_eq!(h.controller.display().minutes_text(), "01'");
    assert_eq!(h.controller.display().seconds_text(), "59");
    assert_eq!(h.controller.display().slider().position(), 1);
    assert_eq!(h.recorder.count(Call::PauseAll), 0);
    assert_eq!(h.recorder.count(Call::StopAll), 0);
}

#[tokio::test(start_paused = true)]
async fn grabbing_the_slider_stops_the_countdown() {
    let mut h = Harness::new();
    h.release_at(2);
    h.recorder.clear();

    // A tick is queued but not yet delivered when the user grabs the slider
    let stale = h.next_event().await;
    h.controller.handle_gesture(SliderGesture::Begin);
    h.controller.on_countdown_event(stale);

    assert_eq!(h.controller.state(), TimerState::Idle);
    assert_eq!(h.controller.display().minutes_text(), "02'");
    assert_eq!(*h.recorder.calls.borrow(), vec![Call::StopAll]);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(h.events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn completion_rings_once_and_repeats_the_same_duration() {
    let mut h = Harness::new();
    h.release_at(1);
    h.recorder.clear();

    let ticks = h.run_to_completion().await;
    assert_eq!(ticks.len(), 60);
    assert!(ticks.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(ticks.last(), Some(&0));

    assert_eq!(h.controller.state(), TimerState::running(1));
    assert_eq!(h.controller.cycles_completed(), 1);
    assert!(h.controller.last_completed_at().is_some());
    assert_eq!(h.recorder.count(Call::Play(BELL, Repeat::Once)), 1);
    assert_eq!(h.recorder.count(Call::Play(TICKING, Repeat::Forever)), 1);
    assert_eq!(
        *h.recorder.calls.borrow(),
        vec![
            Call::StopAll,
            Call::Play(BELL, Repeat::Once),
            Call::Play(TICKING, Repeat::Forever),
        ]
    );
    assert_eq!(h.controller.display().minutes_text(), "01'");
    assert_eq!(h.controller.display().slider().position(), 1);

    let ticks = h.run_to_completion().await;
    assert_eq!(ticks.len(), 60);
    assert_eq!(h.controller.cycles_completed(), 2);
    assert_eq!(h.recorder.count(Call::Play(BELL, Repeat::Once)), 2);
    assert_eq!(h.recorder.count(Call::Play(TICKING, Repeat::Forever)), 2);
}

#[tokio::test(start_paused = true)]
async fn visibility_only_affects_sound() {
    let mut h = Harness::new();
    h.release_at(1);
    h.recorder.clear();

    h.controller.on_visibility(Visibility::Hidden);
    let event = h.next_event().await;
    h.controller.on_countdown_event(event);
    h.controller.on_visibility(Visibility::Visible);

    assert_eq!(
        *h.recorder.calls.borrow(),
        vec![Call::PauseAll, Call::ResumeAll]
    );
    assert_eq!(h.controller.state().remaining_millis(), Some(59_000));
}

#[tokio::test(start_paused = true)]
async fn ticking_loaded_late_starts_playing() {
    let recorder = Recorder::default();
    let (tx, _events) = mpsc::unbounded_channel();
    let mut controller = TimerController::new(60, SoundEffects::new(recorder.clone()), tx);

    controller.start_at(25);
    assert!(controller.state().is_active());
    assert!(recorder.calls.borrow().is_empty());

    controller.on_sound_loaded(loaded(SoundKind::Ticking));
    assert_eq!(recorder.count(Call::Play(TICKING, Repeat::Forever)), 1);
}

#[tokio::test(start_paused = true)]
async fn ticking_loaded_while_hidden_waits_for_visibility() {
    let recorder = Recorder::default();
    let (tx, _events) = mpsc::unbounded_channel();
    let mut controller = TimerController::new(60, SoundEffects::new(recorder.clone()), tx);

    controller.start_at(25);
    controller.on_visibility(Visibility::Hidden);
    controller.on_sound_loaded(loaded(SoundKind::Ticking));
    assert_eq!(recorder.count(Call::Play(TICKING, Repeat::Forever)), 0);

    controller.on_visibility(Visibility::Visible);
    assert_eq!(recorder.count(Call::Play(TICKING, Repeat::Forever)), 1);

    controller.on_visibility(Visibility::Hidden);
    controller.on_visibility(Visibility::Visible);
    assert_eq!(recorder.count(Call::Play(TICKING, Repeat::Forever)), 1);
}

#[tokio::test(start_paused = true)]
async fn stopped_timer_stays_silent_across_visibility_changes() {
    let mut h = Harness::new();
    h.release_at(5);
    h.release_at(0);
    assert_eq!(h.controller.state(), TimerState::Idle);
    assert!(h.recorder.count(Call::StopAll) > 0);
    h.recorder.clear();

    h.controller.on_visibility(Visibility::Hidden);
    h.controller.on_visibility(Visibility::Visible);

    assert_eq!(h.recorder.count(Call::Play(TICKING, Repeat::Forever)), 0);
    assert_eq!(h.recorder.count(Call::ResumeAll), 0);
}

#[tokio::test(start_paused = true)]
async fn completion_while_hidden_defers_ticking() {
    let mut h = Harness::new();
    h.release_at(1);
    h.controller.on_visibility(Visibility::Hidden);
    h.recorder.clear();

    h.run_to_completion().await;
    assert_eq!(h.controller.state(), TimerState::running(1));
    assert_eq!(
        *h.recorder.calls.borrow(),
        vec![Call::StopAll, Call::Play(BELL, Repeat::Once)]
    );

    h.controller.on_visibility(Visibility::Visible);
    assert_eq!(
        *h.recorder.calls.borrow(),
        vec![
            Call::StopAll,
            Call::Play(BELL, Repeat::Once),
            Call::ResumeAll,
            Call::Play(TICKING, Repeat::Forever),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_once() {
    let mut h = Harness::new();
    h.release_at(5);
    h.controller.shutdown();
    h.controller.shutdown();

    assert_eq!(h.controller.state(), TimerState::Idle);
    assert!(h.controller.sounds().is_released());
    assert_eq!(h.recorder.count(Call::Release), 1);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(h.events.try_recv(), Err(TryRecvError::Empty));
}
