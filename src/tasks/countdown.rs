//! Countdown background task

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

/// Interval between ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Generation number identifying one countdown run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownId(u64);

/// Events produced by a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { id: CountdownId, remaining_millis: u64 },
    Finished { id: CountdownId },
}

impl CountdownEvent {
    pub fn id(&self) -> CountdownId {
        match self {
            Self::Tick { id, .. } | Self::Finished { id } => *id,
        }
    }
}

#[derive(Debug)]
enum EngineState {
    Stopped,
    Active {
        id: CountdownId,
        handle: JoinHandle<()>,
    },
}

/// Owns at most one countdown task at a time
#[derive(Debug)]
pub struct CountdownEngine {
    state: EngineState,
    next_id: u64,
    events_tx: mpsc::UnboundedSender<CountdownEvent>,
}

impl CountdownEngine {
    /// Create a stopped engine that reports to `events_tx`
    pub fn new(events_tx: mpsc::UnboundedSender<CountdownEvent>) -> Self {
        Self {
            state: EngineState::Stopped,
            next_id: 0,
            events_tx,
        }
    }

    /// Start a countdown of `total_millis`, cancelling any active one first
    pub fn start(&mut self, total_millis: u64) -> CountdownId {
        self.cancel();

        self.next_id += 1;
        let id = CountdownId(self.next_id);
        info!("Starting countdown {:?} for {}ms", id, total_millis);

        let handle = tokio::spawn(countdown_task(id, total_millis, self.events_tx.clone()));
        self.state = EngineState::Active { id, handle };
        id
    }

    /// Stop the active countdown. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.state, EngineState::Stopped) {
            EngineState::Active { id, handle } => {
                debug!("Cancelling countdown {:?}", id);
                handle.abort();
                true
            }
            EngineState::Stopped => false,
        }
    }

    /// Mark `id` as finished if it is the active countdown
    pub fn finish(&mut self, id: CountdownId) {
        if self.is_current(id) {
            self.state = EngineState::Stopped;
        }
    }

    /// Whether events tagged `id` belong to the active countdown
    pub fn is_current(&self, id: CountdownId) -> bool {
        matches!(self.state, EngineState::Active { id: active, .. } if active == id)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Active { .. })
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Emit one tick per elapsed interval, then `Finished` once nothing remains
async fn countdown_task(
    id: CountdownId,
    total_millis: u64,
    events_tx: mpsc::UnboundedSender<CountdownEvent>,
) {
    let step = TICK_INTERVAL.as_millis() as u64;
    let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut remaining = total_millis;

    while remaining > 0 {
        interval.tick().await;
        remaining = remaining.saturating_sub(step);
        if events_tx
            .send(CountdownEvent::Tick {
                id,
                remaining_millis: remaining,
            })
            .is_err()
        {
            return;
        }
    }

    debug!("Countdown {:?} elapsed", id);
    let _ = events_tx.send(CountdownEvent::Finished { id });
}
