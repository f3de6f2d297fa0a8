//! Cancellable one-second tick source.
//!
//! [`Countdown::start`] spawns a task that emits a [`Tick`] every period on a
//! bounded channel. The returned handle is the only way to receive those
//! ticks; cancelling or dropping it stops the task, and no tick can be
//! observed through the handle afterwards.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ticks queued while the consumer is busy (e.g. awaiting a network call).
const TICK_BUFFER: usize = 8;

/// One elapsed period, tagged with the epoch of the countdown that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
}

/// Handle to a running tick task.
#[derive(Debug)]
pub struct Countdown {
    epoch: u64,
    token: CancellationToken,
    ticks: mpsc::Receiver<Tick>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start ticking once per second. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(epoch: u64) -> Self {
        Self::with_period(epoch, TICK_PERIOD)
    }

    /// Start ticking with a custom period.
    #[must_use]
    pub fn with_period(epoch: u64, period: Duration) -> Self {
        let token = CancellationToken::new();
        let (tx, ticks) = mpsc::channel(TICK_BUFFER);
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(Tick { epoch }).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(epoch, "countdown task stopped");
        });

        Self {
            epoch,
            token,
            ticks,
            task,
        }
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the next tick. Returns `None` once cancelled.
    pub async fn next(&mut self) -> Option<Tick> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            tick = self.ticks.recv() => tick,
        }
    }

    /// Stop the tick task and discard anything already queued.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
        self.task.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.token.cancel();
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let mut countdown = Countdown::start(7);

        let first = countdown.next().await.unwrap();
        assert_eq!(first.epoch, 7);
        let started = Instant::now();
        countdown.next().await.unwrap();
        assert!(started.elapsed() >= TICK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_cancel() {
        let mut countdown = Countdown::start(1);
        countdown.next().await.unwrap();

        countdown.cancel();
        assert!(countdown.is_cancelled());

        time::advance(Duration::from_secs(5)).await;
        assert!(countdown.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let countdown = Countdown::with_period(3, Duration::from_millis(100));
        let token = countdown.token.clone();
        drop(countdown);

        assert!(token.is_cancelled());
    }
}
