use serde::{Deserialize, Serialize};

/// Outcome of a single generation step.
///
/// Built once by the controller at the end of a step and never mutated
/// afterwards. Death and freeze are data, not errors: the caller decides
/// whether to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationAnalysis {
    /// 1-based index of the generation this step produced.
    pub generation: u64,
    /// Number of nonzero cells after the step.
    pub population: usize,
    /// Number of cells whose value differs from the previous generation.
    pub changed: usize,
    /// True iff no living cell remains.
    pub pop_death: bool,
    /// True iff no cell changed value (period-1 fixed point).
    pub frozen: bool,
}

impl GenerationAnalysis {
    #[must_use]
    pub fn new(generation: u64, population: usize, changed: usize) -> Self {
        Self {
            generation,
            population,
            changed,
            pop_death: population == 0,
            frozen: changed == 0,
        }
    }

    /// Whether a run driver would normally stop after this generation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.pop_death || self.frozen
    }
}

/// Summary statistics over a whole run, produced by the aggregate analyzer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of generation records accumulated.
    pub generations: u64,
    pub min_population: usize,
    pub max_population: usize,
    pub mean_population: f64,
    /// Generation at which `max_population` was first reached.
    pub peak_generation: Option<u64>,
    pub final_population: usize,
    /// Sum of changed cells over every recorded generation.
    pub total_changed: u64,
    pub first_death: Option<u64>,
    pub first_freeze: Option<u64>,
    /// Earliest generation flagged as either dead or frozen.
    pub first_terminal: Option<u64>,
}

impl RunSummary {
    /// Computes the summary of a time series of generation records.
    ///
    /// An empty series yields an all-zero summary with no terminal markers.
    #[must_use]
    pub fn from_series(series: &[GenerationAnalysis]) -> Self {
        let Some(last) = series.last() else {
            return Self::default();
        };

        let mut summary = Self {
            generations: series.len() as u64,
            min_population: usize::MAX,
            final_population: last.population,
            ..Self::default()
        };

        let mut total_population: u128 = 0;
        for record in series {
            total_population += record.population as u128;
            summary.total_changed += record.changed as u64;
            summary.min_population = summary.min_population.min(record.population);
            if record.population > summary.max_population || summary.peak_generation.is_none() {
                summary.max_population = record.population;
                summary.peak_generation = Some(record.generation);
            }
            if record.pop_death && summary.first_death.is_none() {
                summary.first_death = Some(record.generation);
            }
            if record.frozen && summary.first_freeze.is_none() {
                summary.first_freeze = Some(record.generation);
            }
            if record.is_terminal() && summary.first_terminal.is_none() {
                summary.first_terminal = Some(record.generation);
            }
        }
        summary.mean_population = total_population as f64 / series.len() as f64;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_derived_from_counts() {
        let a = GenerationAnalysis::new(3, 0, 5);
        assert!(a.pop_death);
        assert!(!a.frozen);
        assert!(a.is_terminal());

        let b = GenerationAnalysis::new(4, 12, 0);
        assert!(!b.pop_death);
        assert!(b.frozen);

        let c = GenerationAnalysis::new(5, 12, 3);
        assert!(!c.is_terminal());
    }

    #[test]
    fn test_empty_series_summary() {
        let summary = RunSummary::from_series(&[]);
        assert_eq!(summary.generations, 0);
        assert_eq!(summary.min_population, 0);
        assert_eq!(summary.max_population, 0);
        assert_eq!(summary.mean_population, 0.0);
        assert_eq!(summary.first_terminal, None);
    }

    #[test]
    fn test_summary_statistics() {
        let series = vec![
            GenerationAnalysis::new(1, 10, 4),
            GenerationAnalysis::new(2, 20, 10),
            GenerationAnalysis::new(3, 6, 14),
            GenerationAnalysis::new(4, 6, 0),
        ];
        let summary = RunSummary::from_series(&series);
        assert_eq!(summary.generations, 4);
        assert_eq!(summary.min_population, 6);
        assert_eq!(summary.max_population, 20);
        assert_eq!(summary.peak_generation, Some(2));
        assert_eq!(summary.final_population, 6);
        assert_eq!(summary.total_changed, 28);
        assert!((summary.mean_population - 10.5).abs() < f64::EPSILON);
        assert_eq!(summary.first_freeze, Some(4));
        assert_eq!(summary.first_death, None);
        assert_eq!(summary.first_terminal, Some(4));
    }
}
