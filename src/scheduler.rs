use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Notify;

/// Paces the render loop. The loop awaits `next_frame` before every tick,
/// so whoever implements this decides the cadence; cancellation is the
/// loop's concern, not the scheduler's.
#[async_trait]
pub trait FrameScheduler: Send + Sync {
    /// Completes at the next display refresh slot
    async fn next_frame(&self);
}

/// Approximates the display refresh with a fixed interval
pub struct IntervalScheduler {
    period: Duration,
}

impl IntervalScheduler {
    pub fn from_refresh_rate(hz: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / hz.max(1) as f64),
        }
    }
}

#[async_trait]
impl FrameScheduler for IntervalScheduler {
    async fn next_frame(&self) {
        tokio::time::sleep(self.period).await;
    }
}

/// Fires ticks only on demand, letting tests drive the loop one frame at
/// a time without wall-clock coupling.
#[derive(Default)]
pub struct ManualScheduler {
    notify: Notify,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases exactly one pending (or future) `next_frame` await
    pub fn fire(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl FrameScheduler for ManualScheduler {
    async fn next_frame(&self) {
        self.notify.notified().await;
    }
}
