//! Run metrics and structured logging.
//!
//! Provides the tracing subscriber setup and a small collector that tracks
//! stepping throughput and reports progress as structured events.

use petri_data::GenerationAnalysis;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Stepping statistics for one run.
pub struct Metrics {
    generation_count: u64,
    last_population: usize,
    last_changed: usize,
    step_time: Duration,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a collector that logs at info level every 100 generations.
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_interval(100)
    }

    #[must_use]
    pub fn with_log_interval(log_interval: u64) -> Self {
        Self {
            generation_count: 0,
            last_population: 0,
            last_changed: 0,
            step_time: Duration::ZERO,
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed generation with the time spent stepping it.
    pub fn record_generation(&mut self, duration: Duration, analysis: &GenerationAnalysis) {
        self.generation_count += 1;
        self.last_population = analysis.population;
        self.last_changed = analysis.changed;
        self.step_time += duration;

        if self.generation_count % self.log_interval == 0 {
            tracing::info!(
                generation = analysis.generation,
                population = analysis.population,
                changed = analysis.changed,
                step_us = duration.as_micros() as u64,
                "Generation"
            );
        } else {
            tracing::debug!(
                generation = analysis.generation,
                population = analysis.population,
                changed = analysis.changed,
                "Generation"
            );
        }
    }

    #[must_use]
    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    #[must_use]
    pub fn last_population(&self) -> usize {
        self.last_population
    }

    #[must_use]
    pub fn last_changed(&self) -> usize {
        self.last_changed
    }

    /// Total time spent inside generation steps.
    #[must_use]
    pub fn step_time(&self) -> Duration {
        self.step_time
    }

    /// Mean step time, zero before the first generation.
    #[must_use]
    pub fn mean_step_time(&self) -> Duration {
        if self.generation_count == 0 {
            return Duration::ZERO;
        }
        self.step_time.div_f64(self.generation_count as f64)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs a run event such as population death.
    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(
            event_type = event_type,
            details = details,
            generation = self.generation_count,
            "Run event"
        );
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.generation_count(), 0);
        assert_eq!(metrics.mean_step_time(), Duration::ZERO);
    }

    #[test]
    fn test_record_generation() {
        let mut metrics = Metrics::with_log_interval(2);
        metrics.record_generation(
            Duration::from_millis(4),
            &GenerationAnalysis::new(1, 30, 12),
        );
        metrics.record_generation(
            Duration::from_millis(2),
            &GenerationAnalysis::new(2, 28, 5),
        );
        assert_eq!(metrics.generation_count(), 2);
        assert_eq!(metrics.last_population(), 28);
        assert_eq!(metrics.last_changed(), 5);
        assert_eq!(metrics.step_time(), Duration::from_millis(6));
        assert_eq!(metrics.mean_step_time(), Duration::from_millis(3));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_mean_step_time_past_u32_generations() {
        let mut metrics = Metrics::new();
        metrics.generation_count = u32::MAX as u64 + 2;
        metrics.step_time = Duration::from_secs(u32::MAX as u64 + 2);
        let mean = metrics.mean_step_time();
        let one = Duration::from_secs(1);
        let drift = if mean > one { mean - one } else { one - mean };
        assert!(drift < Duration::from_millis(1), "mean was {mean:?}");
    }
}
