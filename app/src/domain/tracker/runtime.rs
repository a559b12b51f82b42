//! Production runtime implementations for the tracker ports.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{CalorieSampler, MAX_TICK_CALORIES, TickSleeper};

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTickSleeper;

#[async_trait]
impl TickSleeper for TokioTickSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Uniform random calorie increments in `[0, MAX_TICK_CALORIES)`.
///
/// Stands in for sensor input; a real build would sample the device here.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCalorieSampler;

impl CalorieSampler for RandomCalorieSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..MAX_TICK_CALORIES)
    }
}
