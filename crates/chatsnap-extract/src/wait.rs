//! Polling wait for asynchronously rendered page content.
//!
//! The page renders its turns some time after load. [`wait_until_ready`]
//! re-evaluates a readiness probe once per display-refresh tick, without a
//! retry bound or backoff, until the probe yields a value or the wait is
//! cancelled.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("readiness wait cancelled")]
    Cancelled,
}

/// Source of display-refresh ticks.
#[async_trait]
pub trait FrameTicker: Send {
    /// Resolve at the next tick.
    async fn next_frame(&mut self);
}

/// Ticker driven by a fixed-period tokio interval.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl FrameTicker for IntervalTicker {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Wait until `probe` returns `Some`, checking once now and then once per tick.
pub async fn wait_until_ready<T, F>(
    ticker: &mut dyn FrameTicker,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Option<T>,
{
    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }
        if let Some(ready) = probe() {
            return Ok(ready);
        }
        tokio::select! {
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            _ = ticker.next_frame() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Ticker that resolves immediately and counts frames.
    struct CountingTicker {
        frames: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FrameTicker for CountingTicker {
        async fn next_frame(&mut self) {
            self.frames.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Ticker that never fires.
    struct StalledTicker;

    #[async_trait]
    impl FrameTicker for StalledTicker {
        async fn next_frame(&mut self) {
            futures::future::pending::<()>().await;
        }
    }

    #[tokio::test]
    async fn test_ready_immediately_without_ticking() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut ticker = CountingTicker { frames: frames.clone() };
        let cancel = CancellationToken::new();

        let value = wait_until_ready(&mut ticker, &cancel, || Some(7)).await;
        assert_eq!(value, Ok(7));
        assert_eq!(frames.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_polls_once_per_frame_until_ready() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut ticker = CountingTicker { frames: frames.clone() };
        let cancel = CancellationToken::new();
        let observed = frames.clone();

        let value = wait_until_ready(&mut ticker, &cancel, || {
            let n = observed.load(Ordering::SeqCst);
            (n >= 25).then_some(n)
        })
        .await;

        assert_eq!(value, Ok(25));
        assert_eq!(frames.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn test_cancel_while_suspended() {
        let cancel = CancellationToken::new();
        let waiter = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut ticker = StalledTicker;
                wait_until_ready(&mut ticker, &cancel, || None::<()>).await
            })
        };

        tokio::task::yield_now().await;
        cancel.cancel();
        assert_eq!(waiter.await.unwrap(), Err(WaitError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_probe() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut ticker = StalledTicker;
        let mut probed = false;
        let result = wait_until_ready(&mut ticker, &cancel, || {
            probed = true;
            Some(())
        })
        .await;
        assert_eq!(result, Err(WaitError::Cancelled));
        assert!(!probed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_advances_with_clock() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(16));
        let cancel = CancellationToken::new();
        let start = tokio::time::Instant::now();
        let mut polls = 0;

        wait_until_ready(&mut ticker, &cancel, || {
            polls += 1;
            (polls > 3).then_some(())
        })
        .await
        .unwrap();

        // First interval tick is immediate, the next two each take a period.
        assert_eq!(start.elapsed(), Duration::from_millis(32));
    }
}
