//! Run reports.
//!
//! A [`Report`] bundles the finalized [`RunSummary`], the raw generation time
//! series, and the textual configuration of the run. It renders to HTML,
//! Markdown or JSON; [`Report::save`] picks the format from the file
//! extension.

use crate::error::{IoError, Result};
use chrono::Utc;
use petri_core::FinalAnalysis;
use petri_data::{GenerationAnalysis, RunSummary};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use uuid::Uuid;

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    /// Format implied by a file extension; unknown extensions get HTML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("md") | Some("markdown") => ReportFormat::Markdown,
            Some("json") => ReportFormat::Json,
            _ => ReportFormat::Html,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub run_id: Uuid,
    pub created_at: String,
    pub fingerprint: Option<String>,
    /// Free-form run description, normally the configuration as TOML.
    pub metadata: String,
    pub summary: RunSummary,
    pub series: Vec<GenerationAnalysis>,
}

impl Report {
    #[must_use]
    pub fn new(
        name: &str,
        metadata: &str,
        summary: RunSummary,
        series: Vec<GenerationAnalysis>,
    ) -> Self {
        Self {
            name: name.to_string(),
            run_id: Uuid::new_v4(),
            created_at: Utc::now().to_rfc3339(),
            fingerprint: None,
            metadata: metadata.to_string(),
            summary,
            series,
        }
    }

    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// How the run ended, in words.
    #[must_use]
    pub fn outcome(&self) -> String {
        let s = &self.summary;
        match (s.first_death, s.first_freeze) {
            (Some(g), _) if s.first_terminal == Some(g) => {
                format!("Population death at generation {g}")
            }
            (_, Some(g)) => format!("Population frozen at generation {g}"),
            _ if s.generations == 0 => "No generations were run".to_string(),
            _ => format!("Ran all {} generations", s.generations),
        }
    }

    fn summary_rows(&self) -> Vec<(&'static str, String)> {
        let s = &self.summary;
        vec![
            ("Generations", s.generations.to_string()),
            ("Outcome", self.outcome()),
            ("Min population", s.min_population.to_string()),
            ("Max population", s.max_population.to_string()),
            ("Mean population", format!("{:.2}", s.mean_population)),
            ("Peak generation", fmt_generation(s.peak_generation)),
            ("Final population", s.final_population.to_string()),
            ("Total changed cells", s.total_changed.to_string()),
            ("First death", fmt_generation(s.first_death)),
            ("First freeze", fmt_generation(s.first_freeze)),
        ]
    }

    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Petri Report: {}\n", self.name);
        let _ = writeln!(out, "- **Run**: {}", self.run_id);
        let _ = writeln!(out, "- **Created**: {}", self.created_at);
        if let Some(fp) = &self.fingerprint {
            let _ = writeln!(out, "- **Fingerprint**: `{fp}`");
        }
        let _ = writeln!(out, "\n## Summary\n");
        let _ = writeln!(out, "| Statistic | Value |\n|---|---|");
        for (label, value) in self.summary_rows() {
            let _ = writeln!(out, "| {label} | {value} |");
        }
        let _ = writeln!(out, "\n## Configuration\n\n```toml\n{}\n```", self.metadata.trim_end());
        let _ = writeln!(out, "\n## Generations\n");
        let _ = writeln!(out, "| Generation | Population | Changed | Dead | Frozen |\n|---|---|---|---|---|");
        for g in &self.series {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                g.generation, g.population, g.changed, g.pop_death, g.frozen
            );
        }
        out
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let title = escape_html(&self.name);
        let _ = writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>");
        let _ = writeln!(out, "<meta charset=\"utf-8\">\n<title>Petri Report: {title}</title>");
        let _ = writeln!(
            out,
            "<style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}\
             td,th{{border:1px solid #ccc;padding:2px 8px;text-align:right}}\
             pre{{background:#f4f4f4;padding:1em}}</style>"
        );
        let _ = writeln!(out, "</head>\n<body>\n<h1>Petri Report: {title}</h1>");
        let _ = writeln!(
            out,
            "<p>Run <code>{}</code> created {}</p>",
            self.run_id,
            escape_html(&self.created_at)
        );
        if let Some(fp) = &self.fingerprint {
            let _ = writeln!(out, "<p>Fingerprint <code>{}</code></p>", escape_html(fp));
        }

        let _ = writeln!(out, "<h2>Summary</h2>\n<table>");
        for (label, value) in self.summary_rows() {
            let _ = writeln!(
                out,
                "<tr><th>{label}</th><td>{}</td></tr>",
                escape_html(&value)
            );
        }
        let _ = writeln!(out, "</table>");

        let _ = writeln!(out, "<h2>Population</h2>\n{}", self.population_chart());

        let _ = writeln!(
            out,
            "<h2>Configuration</h2>\n<pre>{}</pre>",
            escape_html(&self.metadata)
        );

        let _ = writeln!(
            out,
            "<h2>Generations</h2>\n<table>\n<tr><th>Generation</th><th>Population</th>\
             <th>Changed</th><th>Dead</th><th>Frozen</th></tr>"
        );
        for g in &self.series {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                g.generation, g.population, g.changed, g.pop_death, g.frozen
            );
        }
        let _ = writeln!(out, "</table>\n</body>\n</html>");
        out
    }

    /// Inline SVG line chart of population over generations.
    fn population_chart(&self) -> String {
        if self.series.is_empty() {
            return "<p>No generations recorded.</p>".to_string();
        }
        let max = self.summary.max_population.max(1) as f64;
        let span = (self.series.len().max(2) - 1) as f64;
        let points: Vec<String> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let x = i as f64 / span * CHART_WIDTH;
                let y = CHART_HEIGHT - g.population as f64 / max * CHART_HEIGHT;
                format!("{x:.1},{y:.1}")
            })
            .collect();
        format!(
            "<svg width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" \
             viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\">\
             <polyline fill=\"none\" stroke=\"#c0392b\" stroke-width=\"1.5\" points=\"{}\"/></svg>",
            points.join(" ")
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = match ReportFormat::from_path(path) {
            ReportFormat::Html => self.render_html(),
            ReportFormat::Markdown => self.render_markdown(),
            ReportFormat::Json => self.to_json()?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IoError::report_write(path, e))?;
        }
        std::fs::write(path, body).map_err(|e| IoError::report_write(path, e))?;
        tracing::info!(path = %path.display(), "Report written");
        Ok(())
    }
}

/// Report persistence for the run-level analyzer.
pub trait ReportPersistence {
    /// Finalizes the analysis and writes a report for it to `path`.
    fn save(&mut self, path: &Path, name: &str, metadata: &str) -> Result<Report>;
}

impl ReportPersistence for FinalAnalysis {
    fn save(&mut self, path: &Path, name: &str, metadata: &str) -> Result<Report> {
        let summary = self.finalize().clone();
        let report = Report::new(name, metadata, summary, self.series().to_vec());
        report.save(path)?;
        Ok(report)
    }
}

fn fmt_generation(generation: Option<u64>) -> String {
    generation.map_or_else(|| "never".to_string(), |g| g.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> FinalAnalysis {
        let mut analysis = FinalAnalysis::new();
        analysis.analyze(GenerationAnalysis::new(1, 12, 8));
        analysis.analyze(GenerationAnalysis::new(2, 9, 5));
        analysis.analyze(GenerationAnalysis::new(3, 9, 0));
        analysis
    }

    fn temp_path(file: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("petri_report_{}", std::process::id()))
            .join(file)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReportFormat::from_path(Path::new("a/b.html")), ReportFormat::Html);
        assert_eq!(ReportFormat::from_path(Path::new("b.MD")), ReportFormat::Markdown);
        assert_eq!(ReportFormat::from_path(Path::new("b.json")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("b")), ReportFormat::Html);
    }

    #[test]
    fn test_outcome_wording() {
        let mut analysis = sample_analysis();
        let report = Report::new("x", "", analysis.finalize().clone(), vec![]);
        assert_eq!(report.outcome(), "Population frozen at generation 3");

        let empty = Report::new("x", "", RunSummary::default(), vec![]);
        assert_eq!(empty.outcome(), "No generations were run");
    }

    #[test]
    fn test_html_escapes_metadata() {
        let report = Report::new("<run>", "rule = \"B3/S23\" & more", RunSummary::default(), vec![]);
        let html = report.render_html();
        assert!(html.contains("&lt;run&gt;"));
        assert!(html.contains("&quot;B3/S23&quot; &amp; more"));
        assert!(html.contains("No generations recorded."));
    }

    #[test]
    fn test_markdown_lists_series() {
        let mut analysis = sample_analysis();
        let summary = analysis.finalize().clone();
        let report = Report::new("demo", "[dish]", summary, analysis.series().to_vec());
        let md = report.render_markdown();
        assert!(md.contains("| Max population | 12 |"));
        assert!(md.contains("| 3 | 9 | 0 | false | true |"));
    }

    #[test]
    fn test_save_json_round_trip() {
        let path = temp_path("run.json");
        let mut analysis = sample_analysis();
        let report = ReportPersistence::save(&mut analysis, &path, "demo", "[dish]")
            .unwrap()
            .with_fingerprint("abc");
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(back.summary, report.summary);
        assert_eq!(back.series.len(), 3);
        assert_eq!(back.run_id, report.run_id);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_failure_is_reported() {
        // A directory cannot be overwritten by a report file.
        let dir = temp_path("occupied.html");
        std::fs::create_dir_all(&dir).unwrap();
        let mut analysis = sample_analysis();
        let err = ReportPersistence::save(&mut analysis, &dir, "demo", "").unwrap_err();
        assert!(matches!(err, IoError::ReportWrite { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }
}
