//! Shared test doubles for domain and adapter tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::Semaphore;

use crate::domain::{CalorieSampler, TickSleeper};

/// Clock whose "now" is set and advanced by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sampler returning a fixed increment per tick.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalorieSampler(pub f64);

impl CalorieSampler for FixedCalorieSampler {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Sampler draining a scripted sequence, then falling back to a default.
pub struct SequenceCalorieSampler {
    values: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl SequenceCalorieSampler {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            fallback,
        }
    }
}

impl CalorieSampler for SequenceCalorieSampler {
    fn sample(&self) -> f64 {
        let mut values = match self.values.lock() {
            Ok(values) => values,
            Err(_) => panic!("sampler mutex"),
        };
        values.pop_front().unwrap_or(self.fallback)
    }
}

/// Sleeper that resolves once per released permit and pends when drained.
///
/// Lets tests drive an exact number of ticks without real time.
pub struct PermitSleeper(Semaphore);

impl PermitSleeper {
    pub fn with_permits(permits: usize) -> Self {
        Self(Semaphore::new(permits))
    }

    pub fn release(&self, permits: usize) {
        self.0.add_permits(permits);
    }
}

#[async_trait]
impl TickSleeper for PermitSleeper {
    async fn sleep(&self, _duration: Duration) {
        match self.0.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_closed) => std::future::pending().await,
        }
    }
}
