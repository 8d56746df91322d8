//! Reconnect pacing.
//!
//! When the transport drops, the client retries with exponential backoff:
//! each attempt multiplies the delay by the configured rate up to the
//! ceiling, with a jitter fraction randomized away so a fleet of clients
//! does not stampede the server in lockstep.

use lattice_core::ReconnectOptions;
use std::time::Duration;

const BASE_INTERVAL_MS: f64 = 750.0;

pub struct ReconnectSchedule {
    options: ReconnectOptions,
    interval_ms: f64,
    attempt: u32,
    rng_state: u64,
}

impl ReconnectSchedule {
    pub fn new(options: ReconnectOptions) -> Self {
        Self::with_seed(options, 0x9e37_79b9_7f4a_7c15)
    }

    /// Deterministic jitter for tests.
    pub fn with_seed(options: ReconnectOptions, seed: u64) -> Self {
        Self {
            options,
            interval_ms: BASE_INTERVAL_MS,
            attempt: 0,
            rng_state: seed | 1,
        }
    }

    /// The delay before the next attempt, or `None` once retries are
    /// exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.options.max_retries {
            return None;
        }
        self.attempt += 1;

        let jitter = self.options.jitter.clamp(0.0, 1.0);
        let spread = jitter * (self.next_unit() * 2.0 - 1.0);
        let delay_ms = (self.interval_ms * (1.0 + spread)).max(0.0);

        self.interval_ms = (self.interval_ms * self.options.backoff_rate.max(1.0))
            .min(self.options.max_interval_ms as f64);

        Some(Duration::from_millis(delay_ms as u64))
    }

    /// A successful connection resets the schedule.
    pub fn reset(&mut self) {
        self.interval_ms = BASE_INTERVAL_MS;
        self.attempt = 0;
    }

    /// xorshift64*, folded to `0.0..1.0`.
    fn next_unit(&mut self) -> f64 {
        let mut x = self.rng_state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.rng_state = x;
        let bits = x.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ReconnectOptions {
        ReconnectOptions {
            max_interval_ms: 10_000,
            max_retries: 5,
            backoff_rate: 2.0,
            jitter: 0.0,
        }
    }

    #[test]
    fn delays_grow_to_the_ceiling_then_stop() {
        let mut schedule = ReconnectSchedule::with_seed(options(), 7);
        let delays: Vec<u64> = std::iter::from_fn(|| schedule.next_delay())
            .map(|delay| delay.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![750, 1500, 3000, 6000, 10_000]);
        assert!(schedule.next_delay().is_none());
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut opts = options();
        opts.jitter = 0.5;
        opts.max_retries = 100;
        let mut schedule = ReconnectSchedule::with_seed(opts, 42);
        let first = schedule.next_delay().unwrap().as_millis() as f64;
        assert!(first >= 750.0 * 0.5 && first <= 750.0 * 1.5);
    }

    #[test]
    fn reset_starts_over() {
        let mut schedule = ReconnectSchedule::with_seed(options(), 7);
        schedule.next_delay();
        schedule.next_delay();
        schedule.reset();
        assert_eq!(schedule.next_delay().unwrap().as_millis(), 750);
    }
}
