//! Activity accrual tracker.
//!
//! A two-state machine (Idle ⇄ Tracking) over a tick-driven accumulator.
//! While tracking, a spawned task ticks once per period, adding one elapsed
//! second and a bounded calorie increment drawn from the sampler port. The
//! `tracking` flag doubles as the cancellation token: `stop` clears it
//! synchronously under the state lock, and a tick never applies an update
//! once it is cleared.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::coins_for_calories;

mod runtime;

pub use runtime::{RandomCalorieSampler, TokioTickSleeper};

/// Upper bound on a single tick's calorie increment.
pub const MAX_TICK_CALORIES: f64 = 2.0;

/// Tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Interval between accumulator ticks.
    pub tick_period: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }
}

/// Errors raised by tracker state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// `start` was invoked while a session is already being tracked.
    #[error("an activity is already being tracked")]
    AlreadyTracking,
    /// `stop` was invoked with no tracked session in progress.
    #[error("no activity is being tracked")]
    NotTracking,
    /// The accumulator lock is unusable.
    #[error("tracker state unavailable: {message}")]
    StateUnavailable { message: String },
}

/// Frozen accumulator returned by [`ActivityTracker::stop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivitySample {
    elapsed_seconds: u64,
    calories_burned: f64,
}

impl ActivitySample {
    /// Build a sample from raw accumulator values.
    pub fn new(elapsed_seconds: u64, calories_burned: f64) -> Self {
        Self {
            elapsed_seconds,
            calories_burned: if calories_burned.is_finite() {
                calories_burned.max(0.0)
            } else {
                0.0
            },
        }
    }

    /// Seconds the session was tracked for.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Accumulated fractional calories.
    pub fn calories_burned(&self) -> f64 {
        self.calories_burned
    }

    /// Whole tracked minutes (floor).
    pub fn duration_minutes(&self) -> u32 {
        u32::try_from(self.elapsed_seconds / 60).unwrap_or(u32::MAX)
    }

    /// Whole calories (floor).
    pub fn whole_calories(&self) -> u32 {
        let floored = self.calories_burned.floor();
        if floored >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            floored as u32
        }
    }

    /// Whether any calories accrued; gates record finalisation.
    pub fn has_burn(&self) -> bool {
        self.calories_burned > 0.0
    }
}

/// Live accumulator view for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerProgress {
    /// Seconds tracked so far.
    pub elapsed_seconds: u64,
    /// Whole calories burned so far.
    pub calories_burned: u32,
    /// Coin preview for the calories burned so far.
    pub coins_earning: u64,
}

/// Async sleeping abstraction for the tick task.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TickSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Source of per-tick calorie increments.
///
/// Implementations model sensor input; the contract is a non-negative delta
/// below [`MAX_TICK_CALORIES`] per tick, which the tracker also clamps.
#[cfg_attr(test, mockall::automock)]
pub trait CalorieSampler: Send + Sync {
    /// Produce the next calorie increment.
    fn sample(&self) -> f64;
}

#[derive(Debug)]
struct TrackerState {
    tracking: bool,
    elapsed_seconds: u64,
    calories_burned: f64,
    generation: u64,
    cancel: Option<watch::Sender<bool>>,
}

impl TrackerState {
    const fn new() -> Self {
        Self {
            tracking: false,
            elapsed_seconds: 0,
            calories_burned: 0.0,
            generation: 0,
            cancel: None,
        }
    }
}

/// Idle/Tracking accrual state machine.
///
/// All methods take `&self`; the accumulator lives behind a lock shared with
/// the tick task, so the tracker can be owned plainly by the session service.
pub struct ActivityTracker {
    state: Arc<Mutex<TrackerState>>,
    sampler: Arc<dyn CalorieSampler>,
    sleeper: Arc<dyn TickSleeper>,
    config: TrackerConfig,
}

impl ActivityTracker {
    /// Build a tracker with injected runtime dependencies.
    pub fn new(
        config: TrackerConfig,
        sampler: Arc<dyn CalorieSampler>,
        sleeper: Arc<dyn TickSleeper>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState::new())),
            sampler,
            sleeper,
            config,
        }
    }

    /// Build a tracker using the production sampler and tokio sleeper.
    pub fn with_defaults(config: TrackerConfig) -> Self {
        Self::new(
            config,
            Arc::new(RandomCalorieSampler),
            Arc::new(TokioTickSleeper),
        )
    }

    /// Idle → Tracking: reset the accumulator and spawn the tick task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), TrackerError> {
        let (generation, cancelled) = {
            let mut state = self.lock_state()?;
            if state.tracking {
                return Err(TrackerError::AlreadyTracking);
            }
            state.tracking = true;
            state.elapsed_seconds = 0;
            state.calories_burned = 0.0;
            state.generation = state.generation.wrapping_add(1);
            let (cancel, cancelled) = watch::channel(false);
            state.cancel = Some(cancel);
            (state.generation, cancelled)
        };

        tokio::spawn(run_ticks(
            Arc::clone(&self.state),
            Arc::clone(&self.sampler),
            Arc::clone(&self.sleeper),
            self.config.tick_period,
            generation,
            cancelled,
        ));
        Ok(())
    }

    /// Tracking → Idle: cancel the tick synchronously and freeze the sample.
    ///
    /// After this returns, no tick applies a further update; a wakeup already
    /// sleeping observes the cleared flag under the lock and exits.
    pub fn stop(&self) -> Result<ActivitySample, TrackerError> {
        let mut state = self.lock_state()?;
        if !state.tracking {
            return Err(TrackerError::NotTracking);
        }
        state.tracking = false;
        if let Some(cancel) = state.cancel.take() {
            let _ = cancel.send(true);
        }
        Ok(ActivitySample::new(
            state.elapsed_seconds,
            state.calories_burned,
        ))
    }

    /// Whether a session is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.lock_state().map(|state| state.tracking).unwrap_or(false)
    }

    /// Live accumulator view, `None` while idle.
    pub fn progress(&self) -> Option<TrackerProgress> {
        let state = self.lock_state().ok()?;
        if !state.tracking {
            return None;
        }
        let sample = ActivitySample::new(state.elapsed_seconds, state.calories_burned);
        Some(TrackerProgress {
            elapsed_seconds: sample.elapsed_seconds(),
            calories_burned: sample.whole_calories(),
            coins_earning: coins_for_calories(sample.calories_burned()),
        })
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, TrackerState>, TrackerError> {
        self.state.lock().map_err(|_| TrackerError::StateUnavailable {
            message: "tracker state lock poisoned".to_owned(),
        })
    }
}

async fn run_ticks(
    state: Arc<Mutex<TrackerState>>,
    sampler: Arc<dyn CalorieSampler>,
    sleeper: Arc<dyn TickSleeper>,
    period: Duration,
    generation: u64,
    mut cancelled: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancelled.changed() => break,
            () = sleeper.sleep(period) => {}
        }

        let Ok(mut guard) = state.lock() else { break };
        // The flag is the cancellation token: a wakeup that lost the race
        // with stop() must not touch the frozen accumulator.
        if !guard.tracking || guard.generation != generation {
            break;
        }
        guard.elapsed_seconds = guard.elapsed_seconds.saturating_add(1);
        let delta = sampler.sample();
        if delta.is_finite() {
            guard.calories_burned += delta.clamp(0.0, MAX_TICK_CALORIES);
        }
    }
}
