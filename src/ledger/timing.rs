//! Timing knobs that shape how reservations interleave.
//!
//! [`Latency`] is plain, configurable delay. [`RaceWindow`] is what the unsafe path
//! passes between reading stock and writing it back; besides a latency it can be a
//! [`RaceWindow::Gate`], which holds every reserver that passed the stock check until
//! a fixed number of them have arrived. That gives tests an exact interleaving
//! instead of a sleep that is merely likely to overlap.

use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

/// A configurable pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Latency {
    /// Continue immediately.
    #[default]
    None,
    /// Yield to the scheduler once.
    Yield,
    /// Sleep for a fixed number of milliseconds.
    Fixed { ms: u64 },
    /// Sleep for a uniformly random number of milliseconds in `min_ms..=max_ms`.
    Jitter { min_ms: u64, max_ms: u64 },
}

impl Latency {
    pub fn fixed(duration: Duration) -> Self {
        Latency::Fixed {
            ms: whole_millis(duration),
        }
    }

    pub fn jitter(min: Duration, max: Duration) -> Self {
        Latency::Jitter {
            min_ms: whole_millis(min),
            max_ms: whole_millis(max),
        }
    }

    pub async fn pause(self) {
        match self {
            Latency::None => {}
            Latency::Yield => tokio::task::yield_now().await,
            Latency::Fixed { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
            Latency::Jitter { min_ms, max_ms } => {
                let ms = sample_millis(min_ms, max_ms);
                tokio::time::sleep(Duration::from_millis(ms)).await
            }
        }
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Uniform sample in `min..=max`; an inverted range collapses to `min`.
pub(crate) fn sample_millis(min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    rand::rng().random_range(min..=max)
}

/// The pause between the stock check and the decrement on the unsafe path.
#[derive(Debug, Clone)]
pub enum RaceWindow {
    Latency(Latency),
    /// Wait until this many reservers are inside the window, then release them all.
    Gate(Arc<Barrier>),
}

impl RaceWindow {
    /// A gate that opens once `parties` reservers have passed the stock check.
    ///
    /// Reservers that are rejected never reach the gate, so `parties` must not exceed
    /// the number of reservers that will see enough stock, or the gate never opens.
    pub fn gate(parties: usize) -> Self {
        RaceWindow::Gate(Arc::new(Barrier::new(parties)))
    }

    pub async fn pass(&self) {
        match self {
            RaceWindow::Latency(latency) => latency.pause().await,
            RaceWindow::Gate(barrier) => {
                barrier.wait().await;
            }
        }
    }
}

impl Default for RaceWindow {
    fn default() -> Self {
        RaceWindow::Latency(Latency::None)
    }
}

impl From<Latency> for RaceWindow {
    fn from(latency: Latency) -> Self {
        RaceWindow::Latency(latency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_sample_millis_stays_in_range() {
        for _ in 0..200 {
            let ms = sample_millis(10, 100);
            assert!((10..=100).contains(&ms));
        }
        assert_eq!(sample_millis(7, 3), 7);
    }

    #[test]
    fn test_durations_beyond_u64_millis_saturate() {
        assert_eq!(Latency::fixed(Duration::MAX), Latency::Fixed { ms: u64::MAX });
        assert_eq!(
            Latency::jitter(Duration::from_millis(5), Duration::MAX),
            Latency::Jitter {
                min_ms: 5,
                max_ms: u64::MAX
            }
        );
        assert_eq!(whole_millis(Duration::from_micros(2_999)), 2);
    }

    #[tokio::test]
    async fn test_gate_releases_only_when_full() {
        let window = RaceWindow::gate(3);
        let arrived = Arc::new(AtomicUsize::new(0));
        let released = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let window = window.clone();
            let arrived = arrived.clone();
            let released = released.clone();
            handles.push(tokio::spawn(async move {
                arrived.fetch_add(1, Ordering::SeqCst);
                window.pass().await;
                // Everyone arrived before anyone got through.
                assert_eq!(arrived.load(Ordering::SeqCst), 3);
                released.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }
}
