use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Default length of a screening session (two minutes).
pub const DEFAULT_DURATION_SECS: u32 = 120;

/// Below this many seconds the front end shows the low-time indicator.
pub const DEFAULT_LOW_TIME_SECS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub duration_secs: u32,
    pub tick: Duration,
    pub low_time_secs: u32,
}

impl TimerSettings {
    /// The tick period to drive the countdown with. A zero tick falls back
    /// to one second.
    pub fn tick_period(&self) -> Duration {
        if self.tick.is_zero() {
            tracing::warn!("zero timer tick configured; using one second");
            Duration::from_secs(1)
        } else {
            self.tick
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            tick: Duration::from_secs(1),
            low_time_secs: DEFAULT_LOW_TIME_SECS,
        }
    }
}

/// Result of advancing the countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time remains; carries the new remaining seconds.
    Running(u32),
    /// This tick reached zero. Returned exactly once.
    Expired,
    /// The countdown already expired; nothing changes.
    Inert,
}

/// Seconds remaining in a screening session.
///
/// Decreases by exactly one per tick and never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    remaining: u32,
    low_time_secs: u32,
    expired: bool,
}

impl Countdown {
    pub fn new(settings: &TimerSettings) -> Self {
        Self {
            remaining: settings.duration_secs,
            low_time_secs: settings.low_time_secs,
            expired: false,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Inert;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn is_low(&self) -> bool {
        self.remaining < self.low_time_secs
    }

    /// Remaining time as `m:ss`.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A recurring task that can be cancelled from any thread.
///
/// The first tick fires one `period` after spawning; a zero period is raised
/// to one millisecond. The callback decides
/// whether to keep going; cancellation only takes effect between ticks, so
/// a callback that is already running always completes.
pub struct PeriodicTask {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let (cancel, mut cancelled) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = interval.tick() => {
                        if on_tick().await.is_break() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("periodic task stopped");
        });
        Self { cancel, handle }
    }

    pub fn cancel(&self) {
        // Fails only when the task already exited.
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(duration_secs: u32) -> TimerSettings {
        TimerSettings {
            duration_secs,
            ..TimerSettings::default()
        }
    }

    #[test]
    fn counts_down_by_one_and_expires_once() {
        let mut countdown = Countdown::new(&settings(3));
        assert_eq!(countdown.tick(), Tick::Running(2));
        assert_eq!(countdown.tick(), Tick::Running(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Inert);
        assert_eq!(countdown.tick(), Tick::Inert);
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut countdown = Countdown::new(&settings(0));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn low_time_starts_below_threshold() {
        let mut countdown = Countdown::new(&settings(21));
        assert!(!countdown.is_low());
        countdown.tick();
        assert!(!countdown.is_low());
        countdown.tick();
        assert!(countdown.is_low());
    }

    #[test]
    fn clock_display_pads_seconds() {
        assert_eq!(format_clock(120), "2:00");
        assert_eq!(format_clock(69), "1:09");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn zero_tick_falls_back_to_one_second() {
        let timer = TimerSettings {
            tick: Duration::ZERO,
            ..TimerSettings::default()
        };
        assert_eq!(timer.tick_period(), Duration::from_secs(1));
        assert_eq!(
            TimerSettings::default().tick_period(),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_task_still_runs() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let task = PeriodicTask::spawn(Duration::ZERO, move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_task_stops_when_cancelled() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let task = PeriodicTask::spawn(Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        task.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(task.is_finished());
    }
}
