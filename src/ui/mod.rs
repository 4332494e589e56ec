//! Progress reporting seam.
//!
//! The pipeline only talks to [`Ui`]; rendering is left to the caller:
//! - [`SilentUi`] for tests and embedding
//! - [`LogUi`] which forwards everything to `tracing`

use std::fmt;
use tracing::info;

/// Run phases, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Checking,
    Loading,
    Importing,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Checking => write!(f, "Checking database"),
            Phase::Loading => write!(f, "Loading SDE files"),
            Phase::Importing => write!(f, "Importing catalog"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Trait for UI implementations - allows both logging and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// Reports phases and progress as `tracing` events
#[derive(Default)]
pub struct LogUi {
    phase: Option<Phase>,
    last: Progress,
}

impl LogUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn last_progress(&self) -> &Progress {
        &self.last
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        info!("{}", phase);
        self.phase = Some(phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.last = Progress::new(current, total, label);
        info!(
            "  Progress: {}/{} ({:.0}%) {}",
            current,
            total,
            self.last.ratio() * 100.0,
            self.last.label
        );
    }

    fn log(&mut self, message: impl Into<String>) {
        info!("{}", message.into());
    }
}
