//! Event loop that drives the timer screen

use std::io::Write;

use anyhow::Context;
use crossterm::terminal;
use tokio::{
    sync::mpsc,
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    services::{
        check_player_available, PlayerBackend, SilentBackend, SoundBackend, SoundEffects,
        SoundLoaded,
    },
    state::{SliderGesture, TimerController},
    tasks::CountdownEvent,
    ui::{self, Debouncer, Frame, InputSource, InputState, SliderLayout, UiEvent},
    utils::shutdown_signal,
};

/// Pick the sound backend; any problem with the player falls back to silence
pub async fn sound_backend(config: &Config) -> Box<dyn SoundBackend> {
    if config.mute {
        info!("Sound muted");
        return Box::new(SilentBackend::default());
    }

    let Some(command) = config.player_command() else {
        warn!("Empty player command, sound disabled");
        return Box::new(SilentBackend::default());
    };

    match check_player_available(&command).await {
        Ok(()) => Box::new(PlayerBackend::new(command)),
        Err(e) => {
            warn!("{}, sound disabled", e);
            Box::new(SilentBackend::default())
        }
    }
}

/// Set up the controller and the terminal, run until quit, then tear down
pub async fn run(config: Config) -> anyhow::Result<()> {
    let sounds = SoundEffects::new(sound_backend(&config).await);
    let (countdown_tx, countdown_rx) = mpsc::unbounded_channel();
    let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();

    let mut controller = TimerController::new(config.max_minutes, sounds, countdown_tx);
    controller.sounds().load(&config.sound_assets(), loaded_tx);

    ui::terminal::install_panic_hook();
    let mut stdout = ui::terminal::startup().context("Failed to set up the terminal")?;

    let (input_tx, input_rx) = mpsc::channel(64);
    let input_task = ui::start_crossterm_stream(input_tx);

    controller.start_at(config.initial_minutes());

    let channels = Channels {
        input_rx,
        countdown_rx,
        loaded_rx,
    };
    let result = event_loop(&config, &mut controller, channels, &mut stdout).await;

    controller.shutdown();
    if let Some(task) = input_task {
        task.abort();
    }
    ui::terminal::cleanup(&mut stdout).context("Failed to restore the terminal")?;
    info!(
        "Exiting after {} completed countdowns",
        controller.cycles_completed()
    );
    result
}

struct Channels {
    input_rx: mpsc::Receiver<crossterm::event::Event>,
    countdown_rx: mpsc::UnboundedReceiver<CountdownEvent>,
    loaded_rx: mpsc::UnboundedReceiver<SoundLoaded>,
}

async fn event_loop<B: SoundBackend, W: Write>(
    config: &Config,
    controller: &mut TimerController<B>,
    mut channels: Channels,
    out: &mut W,
) -> anyhow::Result<()> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let (cols, rows) = terminal::size().context("Failed to read the terminal size")?;
    let mut layout = SliderLayout::new(cols, rows, config.max_minutes);
    let mut input = InputState::default();
    let mut release = Debouncer::new(config.release_delay());

    redraw(out, &layout, controller)?;

    loop {
        let release_at = release.deadline();
        tokio::select! {
            Some(event) = channels.input_rx.recv() => {
                let Some(event) = input.handle_crossterm_event(event, &layout) else {
                    continue;
                };
                match event {
                    UiEvent::Quit => {
                        info!("Quit requested");
                        break;
                    }
                    UiEvent::Slider { gesture, source } => {
                        match (gesture, source) {
                            (SliderGesture::Release, _) => release.cancel(),
                            (_, InputSource::Keyboard) => release.update(),
                            (_, InputSource::Mouse) => release.cancel(),
                        }
                        controller.handle_gesture(gesture);
                    }
                    UiEvent::Visibility(visibility) => controller.on_visibility(visibility),
                    UiEvent::Resize { cols, rows } => {
                        layout = SliderLayout::new(cols, rows, config.max_minutes);
                    }
                }
            }
            Some(event) = channels.countdown_rx.recv() => {
                controller.on_countdown_event(event);
            }
            Some(loaded) = channels.loaded_rx.recv() => {
                controller.on_sound_loaded(loaded);
            }
            _ = wait_until(release_at) => {
                if release.query() {
                    debug!("Keyboard drag went quiet, releasing slider");
                    controller.handle_gesture(SliderGesture::Release);
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }

        redraw(out, &layout, controller)?;
    }

    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn redraw<B: SoundBackend, W: Write>(
    out: &mut W,
    layout: &SliderLayout,
    controller: &TimerController<B>,
) -> anyhow::Result<()> {
    let frame = Frame {
        display: controller.display(),
        state: controller.state(),
        cycles_completed: controller.cycles_completed(),
        last_completed_at: controller.last_completed_at(),
    };
    ui::draw(out, layout, &frame).context("Failed to draw the timer")
}
