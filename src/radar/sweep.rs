//! Radar sweep coordination
//!
//! A [`RadarSweeper`] runs at most one sweep at a time. Starting a new sweep
//! bumps a generation counter and aborts the running task. All state updates
//! go through a single watch channel, and each update re-checks its generation
//! while holding the channel lock. A stale sweep can therefore never overwrite
//! the state of a newer one, even if it was mid-publish when superseded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::lattice::{Density, GridPoint};
use super::sampler::{PointFetcher, sample};
use crate::models::Coordinates;

/// Lifecycle of the current sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SweepStatus {
    Idle,
    Running,
    Complete,
    Failed { message: String },
}

/// What the radar view renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepState {
    /// Generation of the sweep this state belongs to (0 before any sweep)
    pub generation: u64,
    pub center: Option<Coordinates>,
    pub density: Density,
    /// Points sampled so far, in lattice order
    pub points: Vec<GridPoint>,
    pub status: SweepStatus,
}

impl Default for SweepState {
    fn default() -> Self {
        Self {
            generation: 0,
            center: None,
            density: Density::default(),
            points: Vec::new(),
            status: SweepStatus::Idle,
        }
    }
}

impl SweepState {
    fn started(generation: u64, center: Coordinates, density: Density) -> Self {
        Self {
            generation,
            center: Some(center),
            density,
            points: Vec::new(),
            status: SweepStatus::Running,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            SweepStatus::Complete | SweepStatus::Failed { .. }
        )
    }
}

/// Generation-gated writer for the shared sweep state
#[derive(Clone)]
struct Publisher {
    current: Arc<AtomicU64>,
    sender: Arc<watch::Sender<SweepState>>,
}

impl Publisher {
    /// Apply `update` only if `generation` is still the current one.
    /// Returns `false` when the sweep has been superseded.
    fn publish(&self, generation: u64, update: impl FnOnce(&mut SweepState)) -> bool {
        let mut applied = false;
        self.sender.send_if_modified(|state| {
            if self.current.load(Ordering::SeqCst) != generation {
                return false;
            }
            update(state);
            applied = true;
            true
        });
        applied
    }
}

/// Owns the in-flight radar sweep and the state it publishes
pub struct RadarSweeper {
    fetcher: Arc<dyn PointFetcher>,
    delay: Duration,
    publisher: Publisher,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RadarSweeper {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PointFetcher>, delay: Duration) -> Self {
        let (sender, _) = watch::channel(SweepState::default());
        Self {
            fetcher,
            delay,
            publisher: Publisher {
                current: Arc::new(AtomicU64::new(0)),
                sender: Arc::new(sender),
            },
            task: Mutex::new(None),
        }
    }

    /// Start a sweep around `center`, superseding any running sweep.
    ///
    /// Must be called from within a Tokio runtime. Returns the generation of
    /// the new sweep.
    pub fn start(&self, center: Coordinates, density: Density) -> u64 {
        // Holding the task slot serializes concurrent starts.
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = self.publisher.current.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = task.take() {
            if !previous.is_finished() {
                debug!(generation, "Superseding running radar sweep");
            }
            previous.abort();
        }

        self.publisher.publish(generation, |state| {
            *state = SweepState::started(generation, center, density);
        });

        info!(
            generation,
            %density,
            center = %center.format(),
            "Starting radar sweep"
        );

        let publisher = self.publisher.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let delay = self.delay;
        *task = Some(tokio::spawn(async move {
            run_sweep(publisher, generation, center, density, fetcher, delay).await;
        }));

        generation
    }

    /// Stop the running sweep, keeping the points sampled so far
    pub fn cancel(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = self.publisher.current.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = task.take() {
            previous.abort();
        }

        self.publisher.publish(generation, |state| {
            state.generation = generation;
            if !state.is_finished() {
                state.status = SweepStatus::Idle;
            }
        });
        debug!(generation, "Radar sweep cancelled");
    }

    /// Receiver notified on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SweepState> {
        self.publisher.sender.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> SweepState {
        self.publisher.sender.borrow().clone()
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.publisher.current.load(Ordering::SeqCst)
    }
}

impl Drop for RadarSweeper {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

async fn run_sweep(
    publisher: Publisher,
    generation: u64,
    center: Coordinates,
    density: Density,
    fetcher: Arc<dyn PointFetcher>,
    delay: Duration,
) {
    let mut points = Box::pin(sample(center, density, fetcher, delay));

    while let Some(item) = points.next().await {
        match item {
            Ok(snapshot) => {
                if !publisher.publish(generation, |state| state.points = snapshot) {
                    debug!(generation, "Dropping results of superseded sweep");
                    return;
                }
            }
            Err(e) => {
                warn!(generation, "Radar sweep failed: {e}");
                publisher.publish(generation, |state| {
                    state.status = SweepStatus::Failed {
                        message: e.to_string(),
                    };
                });
                return;
            }
        }
    }

    if publisher.publish(generation, |state| state.status = SweepStatus::Complete) {
        info!(generation, "Radar sweep complete");
    }
}
