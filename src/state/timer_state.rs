//! Timer state structure and management

/// Lifecycle of the focus timer as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown is active
    Idle,
    /// A countdown of `duration_minutes` is active
    Running {
        duration_minutes: u32,
        remaining_millis: u64,
    },
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self::Idle
    }

    /// Create a running timer state at the start of a countdown
    pub fn running(duration_minutes: u32) -> Self {
        Self::Running {
            duration_minutes,
            remaining_millis: minutes_to_millis(duration_minutes),
        }
    }

    /// Check if a countdown is active
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Duration of the active countdown in minutes
    pub fn duration_minutes(&self) -> Option<u32> {
        match self {
            Self::Running { duration_minutes, .. } => Some(*duration_minutes),
            Self::Idle => None,
        }
    }

    /// Get remaining milliseconds if a countdown is active
    pub fn remaining_millis(&self) -> Option<u64> {
        match self {
            Self::Running { remaining_millis, .. } => Some(*remaining_millis),
            Self::Idle => None,
        }
    }

    /// Record a tick; ignored while idle
    pub fn set_remaining(&mut self, millis: u64) {
        if let Self::Running { remaining_millis, .. } = self {
            *remaining_millis = millis;
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a slider position in minutes to countdown milliseconds
pub fn minutes_to_millis(minutes: u32) -> u64 {
    u64::from(minutes) * 60 * 1000
}
