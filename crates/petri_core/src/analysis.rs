//! Run-level accumulation of per-generation analyses.

use petri_data::{GenerationAnalysis, RunSummary};
use serde::{Deserialize, Serialize};

/// Time series of generation records plus the summary derived from it.
///
/// Owns no reference to the dish; it only sees the value objects the dish
/// produces.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FinalAnalysis {
    series: Vec<GenerationAnalysis>,
    #[serde(skip)]
    summary: Option<RunSummary>,
}

impl FinalAnalysis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one generation record.
    pub fn analyze(&mut self, analysis: GenerationAnalysis) {
        self.series.push(analysis);
        if self.summary.take().is_some() {
            tracing::debug!(
                generation = analysis.generation,
                "Summary invalidated by a late generation record"
            );
        }
    }

    /// Computes the run summary, or returns the one computed by a previous
    /// call if no record was added since.
    pub fn finalize(&mut self) -> &RunSummary {
        self.summary
            .get_or_insert_with(|| RunSummary::from_series(&self.series))
    }

    /// Summary from the last [`FinalAnalysis::finalize`], if still current.
    #[must_use]
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn series(&self) -> &[GenerationAnalysis] {
        &self.series
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_empty() {
        let mut analysis = FinalAnalysis::new();
        let summary = analysis.finalize();
        assert_eq!(summary.generations, 0);
        assert_eq!(summary.first_terminal, None);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut analysis = FinalAnalysis::new();
        analysis.analyze(GenerationAnalysis::new(1, 4, 2));
        analysis.analyze(GenerationAnalysis::new(2, 0, 4));
        let first = analysis.finalize().clone();
        let second = analysis.finalize().clone();
        assert_eq!(first, second);
        assert_eq!(first.first_death, Some(2));
        assert_eq!(first.generations, 2);
    }

    #[test]
    fn test_late_record_invalidates_summary() {
        let mut analysis = FinalAnalysis::new();
        analysis.analyze(GenerationAnalysis::new(1, 4, 2));
        assert_eq!(analysis.finalize().generations, 1);
        analysis.analyze(GenerationAnalysis::new(2, 5, 1));
        assert!(analysis.summary().is_none());
        assert_eq!(analysis.finalize().generations, 2);
        assert_eq!(analysis.len(), 2);
    }
}
