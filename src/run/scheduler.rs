use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};

/// Time source for the cycle loop. Tests swap in a fake one.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A scheduled cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// 1 for the first cycle of a run.
    pub index: u64,
    pub due_at: DateTime<Local>,
}

/// Fixed-delay schedule: each cycle is due one interval after the previous
/// cycle finished, so a slow cycle pushes the next one back.
#[derive(Debug, Clone, Copy)]
pub struct CycleScheduler {
    interval: Duration,
}

impl CycleScheduler {
    pub fn new(interval: Duration) -> Self {
        CycleScheduler { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first cycle runs immediately.
    pub fn first(&self, now: DateTime<Local>) -> Cycle {
        Cycle {
            index: 1,
            due_at: now,
        }
    }

    pub fn next(&self, current: &Cycle, finished_at: DateTime<Local>) -> Cycle {
        let due_at = TimeDelta::from_std(self.interval)
            .ok()
            .and_then(|d| finished_at.checked_add_signed(d))
            .unwrap_or(finished_at);
        Cycle {
            index: current.index + 1,
            due_at,
        }
    }

    /// How long to wait from `now` until `cycle` is due.
    pub fn wait_for(&self, cycle: &Cycle, now: DateTime<Local>) -> Duration {
        (cycle.due_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}
