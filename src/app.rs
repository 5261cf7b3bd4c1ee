//! Run orchestration: seed a dish, step it, render frames, write the report.

use crate::render::{Canvas, Palette, MARKER};
use anyhow::{Context, Result};
use petri_core::{AppConfig, Dish, FinalAnalysis, Metrics};
use petri_core::config::SeedConfig;
use petri_io::{pattern, FrameSink, Placement, Report};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    PopulationDeath { generation: u64 },
    Frozen { generation: u64 },
    Exhausted { generations: u64 },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::PopulationDeath { generation } => {
                write!(f, "population died at generation {generation}")
            }
            RunOutcome::Frozen { generation } => write!(f, "froze at generation {generation}"),
            RunOutcome::Exhausted { generations } => {
                write!(f, "ran all {generations} generations")
            }
        }
    }
}

pub struct App {
    pub config: AppConfig,
    pub dish: Dish,
    pub analysis: FinalAnalysis,
    pub canvas: Canvas,
    pub palette: Palette,
    pub metrics: Metrics,
    seed: u64,
}

impl App {
    /// Builds an unseeded dish from a validated configuration.
    pub fn new(config: AppConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let dish = Dish::from_config(&config)?;
        let palette: Palette = config.output.palette.parse()?;
        let canvas = Canvas::new(dish.width(), dish.height(), config.output.scale);

        tracing::info!(
            width = dish.width(),
            height = dish.height(),
            rule = %dish.rule(),
            topology = %config.dish.topology,
            seed,
            "Dish created"
        );

        Ok(Self {
            config,
            dish,
            analysis: FinalAnalysis::new(),
            canvas,
            palette,
            metrics: Metrics::new(),
            seed,
        })
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Populates the dish from noise or from a named pattern file.
    pub fn seed_dish(&mut self, patterns_dir: &Path) -> Result<()> {
        match &self.config.seeding {
            SeedConfig::Noise { density } => {
                self.dish.randomize(self.seed, *density);
                tracing::info!(
                    density,
                    population = self.dish.population(),
                    "Dish seeded with noise"
                );
            }
            SeedConfig::Pattern {
                name,
                x_offset,
                y_offset,
                center,
            } => {
                let placement = Placement {
                    x_offset: *x_offset,
                    y_offset: *y_offset,
                    center: *center,
                };
                pattern::load(&mut self.dish, patterns_dir, name, placement)
                    .with_context(|| format!("Failed to seed pattern {name:?}"))?;
            }
        }
        Ok(())
    }

    /// Steps the dish until it dies, freezes or runs out of generations.
    ///
    /// The sink first receives an empty frame with the corners marked. Each
    /// later frame shows the dish as it was before the step; frames for the
    /// warm-up generations are not written, and the first written one is held
    /// four times as long.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> Result<RunOutcome> {
        let delay = self.config.output.delay;
        let pre = self.config.run.pre_generations;
        let total = self.config.run.total_generations();

        self.canvas.clear();
        self.canvas.mark_corners(MARKER);
        sink.write_frame(self.canvas.buffer(), delay)?;

        for i in 0..total {
            self.canvas.clear();
            self.canvas.draw_buffer(self.dish.grid().cells(), self.palette);

            let started = Instant::now();
            let analysis = self.dish.next_gen();
            self.metrics.record_generation(started.elapsed(), &analysis);
            self.analysis.analyze(analysis);

            if i >= pre {
                let frame_delay = if i == pre { delay.saturating_mul(4) } else { delay };
                sink.write_frame(self.canvas.buffer(), frame_delay)?;
            }

            if analysis.pop_death {
                self.metrics.log_event(
                    "population_death",
                    &format!("generation {}", analysis.generation),
                );
                return Ok(RunOutcome::PopulationDeath {
                    generation: analysis.generation,
                });
            }
            if analysis.frozen {
                self.metrics
                    .log_event("frozen", &format!("generation {}", analysis.generation));
                return Ok(RunOutcome::Frozen {
                    generation: analysis.generation,
                });
            }
        }

        Ok(RunOutcome::Exhausted {
            generations: self.dish.generation(),
        })
    }

    /// Finalizes the analysis and writes the run report.
    pub fn save_report(&mut self, path: &Path, name: &str) -> Result<Report> {
        let metadata = format!("# seed = {}\n{}", self.seed, self.config.to_text()?);
        let summary = self.analysis.finalize().clone();
        let report = Report::new(name, &metadata, summary, self.analysis.series().to_vec())
            .with_fingerprint(self.config.fingerprint());
        report.save(path)?;
        Ok(report)
    }
}
