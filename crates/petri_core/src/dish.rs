//! The Petri dish: owns the grid and the rule, and steps generations.
//!
//! Each step reads neighbor counts from the current generation only and
//! writes into a second buffer that replaces the grid once every cell has
//! been computed, so no cell ever observes a post-step value of another.

use crate::config::AppConfig;
use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::rule::Rule;
use petri_data::{Cell, GenerationAnalysis, Topology, DEAD};

/// Lifecycle of a dish.
///
/// `Uninitialized → Seeded → Stepping → (Terminated | Exhausted)`. Stepping
/// is permitted in every state; the state only records what has happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishState {
    /// Allocated, nothing placed yet.
    Uninitialized,
    /// Randomized or pattern-loaded, not stepped.
    Seeded,
    Stepping,
    /// The last step reported population death or a freeze.
    Terminated,
    /// The generation limit was reached without termination.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Dish {
    grid: Grid,
    next: Vec<Cell>,
    rule: Rule,
    generation: u64,
    generation_limit: Option<u64>,
    state: DishState,
}

impl Dish {
    /// Allocates a dead dish with a parsed rule.
    pub fn new(width: u16, height: u16, rule: Rule, topology: Topology) -> Result<Self> {
        let grid = Grid::new(width, height, topology)?;
        let next = vec![DEAD; grid.len()];
        Ok(Self {
            grid,
            next,
            rule,
            generation: 0,
            generation_limit: None,
            state: DishState::Uninitialized,
        })
    }

    /// Builds a dish from the `[dish]` and `[run]` sections. The generation
    /// limit covers both rendered and pre-generations.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let rule = Rule::parse(&config.dish.rule)?;
        Ok(Self::new(
            config.dish.width,
            config.dish.height,
            rule,
            config.dish.topology,
        )?
        .with_generation_limit(config.run.total_generations()))
    }

    /// Rebuilds a seeded dish from a captured flat buffer.
    pub fn from_buffer(
        width: u16,
        height: u16,
        rule: Rule,
        topology: Topology,
        cells: Vec<Cell>,
    ) -> Result<Self> {
        let max = rule.max_value();
        if let Some(&value) = cells.iter().find(|&&c| c > max) {
            return Err(CoreError::CellValue { value, max });
        }
        let grid = Grid::from_cells(width, height, topology, cells)?;
        let next = vec![DEAD; grid.len()];
        Ok(Self {
            grid,
            next,
            rule,
            generation: 0,
            generation_limit: None,
            state: DishState::Seeded,
        })
    }

    #[must_use]
    pub fn with_generation_limit(mut self, limit: u64) -> Self {
        self.generation_limit = Some(limit);
        self
    }

    /// Fills the dish with noise. See [`Grid::randomize`].
    pub fn randomize(&mut self, seed: u64, density: f64) {
        self.grid.randomize(seed, density);
        self.mark_seeded();
    }

    /// Raw mutation used by pattern loading.
    pub fn set(&mut self, x: i64, y: i64, value: Cell) -> Result<()> {
        let max = self.rule.max_value();
        if value > max {
            return Err(CoreError::CellValue { value, max });
        }
        self.grid.set(x, y, value)?;
        self.mark_seeded();
        Ok(())
    }

    pub fn get(&self, x: i64, y: i64) -> Result<Cell> {
        self.grid.get(x, y)
    }

    fn mark_seeded(&mut self) {
        if self.state == DishState::Uninitialized {
            self.state = DishState::Seeded;
        }
    }

    /// Advances one generation and reports what happened.
    ///
    /// Never fails: death and freeze are flagged in the returned analysis and
    /// the caller decides whether to keep stepping.
    pub fn next_gen(&mut self) -> GenerationAnalysis {
        let width = self.grid.width() as usize;
        let height = self.grid.height() as usize;
        let mut population = 0usize;
        let mut changed = 0usize;

        let current = self.grid.cells();
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let before = current[idx];
                let after = self
                    .rule
                    .next_value(before, self.grid.live_neighbors_at(x, y));
                self.next[idx] = after;
                if after != DEAD {
                    population += 1;
                }
                if after != before {
                    changed += 1;
                }
            }
        }

        self.grid.swap_cells(&mut self.next);
        self.generation += 1;

        let analysis = GenerationAnalysis::new(self.generation, population, changed);
        self.state = if analysis.is_terminal() {
            DishState::Terminated
        } else if self
            .generation_limit
            .is_some_and(|limit| self.generation >= limit)
        {
            DishState::Exhausted
        } else {
            DishState::Stepping
        };
        analysis
    }

    /// Row-major snapshot of the current generation.
    #[must_use]
    pub fn get_buffer(&self) -> Vec<Cell> {
        self.grid.to_flat_buffer()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self) -> DishState {
        self.state
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.grid.height()
    }
}
