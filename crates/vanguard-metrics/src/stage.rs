//! Per-stage latency tracking: sample count, an exponential moving average
//! (α = 0.1), and a rolling max — all lock-free (§4.9).

use std::sync::atomic::{AtomicU64, Ordering};

/// Smoothing factor for the latency EMA, fixed per §4.9.
const EMA_ALPHA: f64 = 0.1;

/// Atomic per-stage latency stats.
///
/// The EMA is stored as `f64` bit patterns behind a compare-and-swap loop —
/// the standard lock-free technique for a floating-point running average
/// with no atomic float type in `std`.
#[derive(Debug, Default)]
pub struct StageMetrics {
    sample_count: AtomicU64,
    ema_latency_us_bits: AtomicU64,
    rolling_max_us: AtomicU64
}

impl StageMetrics {
    pub fn record_latency_us(&self, latency_us: u64) {
        self.sample_count.fetch_add(1, Ordering::Relaxed);
        self.rolling_max_us.fetch_max(latency_us, Ordering::Relaxed);

        let sample = latency_us as f64;
        let mut current_bits = self.ema_latency_us_bits.load(Ordering::Relaxed);
        loop {
            let current = f64::from_bits(current_bits);
            let next = if current_bits == 0 { sample } else { current + EMA_ALPHA * (sample - current) };
            match self.ema_latency_us_bits.compare_exchange_weak(
                current_bits,
                next.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed
            ) {
                Ok(_) => break,
                Err(observed) => current_bits = observed
            }
        }
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count.load(Ordering::Relaxed)
    }

    pub fn ema_latency_us(&self) -> f64 {
        f64::from_bits(self.ema_latency_us_bits.load(Ordering::Relaxed))
    }

    pub fn rolling_max_us(&self) -> u64 {
        self.rolling_max_us.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            sample_count: self.sample_count(),
            ema_latency_us: self.ema_latency_us(),
            rolling_max_us: self.rolling_max_us()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageSnapshot {
    pub sample_count: u64,
    pub ema_latency_us: f64,
    pub rolling_max_us: u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_the_ema() {
        let metrics = StageMetrics::default();
        metrics.record_latency_us(100);
        assert_eq!(metrics.ema_latency_us(), 100.0);
        assert_eq!(metrics.sample_count(), 1);
    }

    #[test]
    fn ema_moves_toward_new_samples() {
        let metrics = StageMetrics::default();
        metrics.record_latency_us(100);
        metrics.record_latency_us(200);
        // 100 + 0.1*(200-100) = 110
        assert!((metrics.ema_latency_us() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn rolling_max_never_decreases() {
        let metrics = StageMetrics::default();
        metrics.record_latency_us(50);
        metrics.record_latency_us(500);
        metrics.record_latency_us(10);
        assert_eq!(metrics.rolling_max_us(), 500);
    }
}
