pub mod macros;

use petri_lib::model::cell::{Cell, Topology, BASE_ALIVE};
use petri_lib::model::{Dish, Rule};

#[allow(dead_code)]
pub struct DishBuilder {
    width: u16,
    height: u16,
    rule: Rule,
    topology: Topology,
    cells: Vec<(i64, i64, Cell)>,
    noise: Option<(u64, f64)>,
    limit: Option<u64>,
}

#[allow(dead_code)]
impl DishBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rule: Rule::conway(),
            topology: Topology::Toroidal,
            cells: Vec::new(),
            noise: None,
            limit: None,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn bounded(mut self) -> Self {
        self.topology = Topology::Bounded;
        self
    }

    pub fn alive(mut self, x: i64, y: i64) -> Self {
        self.cells.push((x, y, BASE_ALIVE));
        self
    }

    pub fn cells(mut self, coords: &[(i64, i64)]) -> Self {
        self.cells
            .extend(coords.iter().map(|&(x, y)| (x, y, BASE_ALIVE)));
        self
    }

    pub fn value(mut self, x: i64, y: i64, value: Cell) -> Self {
        self.cells.push((x, y, value));
        self
    }

    pub fn noise(mut self, seed: u64, density: f64) -> Self {
        self.noise = Some((seed, density));
        self
    }

    pub fn limit(mut self, generations: u64) -> Self {
        self.limit = Some(generations);
        self
    }

    pub fn build(self) -> Dish {
        let mut dish = Dish::new(self.width, self.height, self.rule, self.topology)
            .expect("Failed to create dish in test builder");
        if let Some(limit) = self.limit {
            dish = dish.with_generation_limit(limit);
        }
        if let Some((seed, density)) = self.noise {
            dish.randomize(seed, density);
        }
        for (x, y, value) in self.cells {
            dish.set(x, y, value).expect("Test cell out of range");
        }
        dish
    }
}

/// Unique scratch directory under the system temp dir.
#[allow(dead_code)]
pub fn scratch_dir(test: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("petri_{}_{}", test, std::process::id()));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}
