use governor::{
    Quota,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::time::Duration;

use super::RateClass;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shortest spacing a lane enforces
const MIN_INTERVAL: Duration = Duration::from_nanos(1);

/// A single class: its limiter plus the spacing it enforces
#[derive(Debug)]
struct Lane {
    limiter: DirectLimiter,
    interval: Duration,
}

impl Lane {
    fn new(requests_per_second: NonZeroU32) -> Self {
        // A burst of one turns the token bucket into uniform spacing:
        // consecutive grants are always at least one interval apart.
        // Rates above one per nanosecond would round the interval down to zero.
        let period = (Duration::from_secs(1) / requests_per_second.get()).max(MIN_INTERVAL);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(requests_per_second))
            .allow_burst(NonZeroU32::MIN);
        Self {
            interval: quota.replenish_interval(),
            limiter: DirectLimiter::direct(quota),
        }
    }
}

/// Admission control for outgoing API requests.
///
/// Holds one independent ceiling per [`RateClass`]. Waiting on one class
/// never delays the other, and waiters of the same class are admitted one
/// interval apart, in no particular order.
#[derive(Debug)]
pub struct RateLimiter {
    standard: Lane,
    restricted: Lane,
}

impl RateLimiter {
    /// Create a limiter from two requests-per-second ceilings
    #[must_use]
    pub fn new(standard: NonZeroU32, restricted: NonZeroU32) -> Self {
        Self {
            standard: Lane::new(standard),
            restricted: Lane::new(restricted),
        }
    }

    /// Wait until a request of the given class may be sent.
    ///
    /// This never fails, it only delays. The wait is at most one interval
    /// per caller queued ahead of this one.
    pub async fn admit(&self, class: RateClass) {
        let lane = self.lane(class);
        if lane.limiter.check().is_ok() {
            return;
        }

        log::debug!(
            "Waiting for {class} rate limit admission (interval {}ms)",
            lane.interval.as_millis()
        );
        lane.limiter.until_ready().await;
    }

    /// Minimum spacing between two admissions of the given class
    #[must_use]
    pub fn interval(&self, class: RateClass) -> Duration {
        self.lane(class).interval
    }

    const fn lane(&self, class: RateClass) -> &Lane {
        match class {
            RateClass::Standard => &self.standard,
            RateClass::Restricted => &self.restricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    // Allowance for timer granularity when measuring spacing
    const SLACK: Duration = Duration::from_millis(15);

    fn limiter(standard: u32, restricted: u32) -> RateLimiter {
        RateLimiter::new(
            NonZeroU32::new(standard).unwrap(),
            NonZeroU32::new(restricted).unwrap(),
        )
    }

    #[test]
    fn test_interval_from_rate() {
        let limiter = limiter(4, 1);
        assert_eq!(
            limiter.interval(RateClass::Standard),
            Duration::from_millis(250)
        );
        assert_eq!(
            limiter.interval(RateClass::Restricted),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_interval_is_never_zero() {
        let limiter = limiter(u32::MAX, 1);
        assert_eq!(limiter.interval(RateClass::Standard), MIN_INTERVAL);
    }

    #[tokio::test]
    async fn test_first_admission_is_immediate() {
        let limiter = limiter(1, 1);

        let start = Instant::now();
        limiter.admit(RateClass::Standard).await;
        limiter.admit(RateClass::Restricted).await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_sequential_admissions_are_spaced() {
        let limiter = limiter(20, 1);
        let interval = limiter.interval(RateClass::Standard);

        let start = Instant::now();
        for _ in 0..5 {
            limiter.admit(RateClass::Standard).await;
        }

        // The first admission is free, the other four wait one interval each
        assert!(start.elapsed() + SLACK >= interval * 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admissions_are_spaced() {
        let limiter = Arc::new(limiter(20, 1));
        let interval = limiter.interval(RateClass::Standard);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.admit(RateClass::Standard).await;
                    Instant::now()
                })
            })
            .collect();

        let mut granted = Vec::new();
        for handle in handles {
            granted.push(handle.await.unwrap());
        }
        granted.sort();

        let span = *granted.last().unwrap() - granted[0];
        assert!(span + SLACK >= interval * 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_classes_are_independent() {
        let limiter = Arc::new(limiter(50, 1));

        // Use up the restricted allowance, then queue another restricted
        // caller that has to wait a full second.
        limiter.admit(RateClass::Restricted).await;
        let waiting = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.admit(RateClass::Restricted).await })
        };

        let start = Instant::now();
        for _ in 0..5 {
            limiter.admit(RateClass::Standard).await;
        }
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!waiting.is_finished());

        waiting.await.unwrap();
    }
}
