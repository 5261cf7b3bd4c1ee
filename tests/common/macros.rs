/// Asserts the number of living cells in a dish.
#[macro_export]
macro_rules! assert_population {
    ($dish:expr, $count:expr) => {
        assert_eq!($dish.population(), $count, "Population count mismatch");
    };
}

/// Asserts that a step reported a period-1 fixed point.
#[macro_export]
macro_rules! assert_frozen {
    ($analysis:expr) => {
        assert!(
            $analysis.frozen,
            "Generation {} should be frozen but changed {} cells",
            $analysis.generation,
            $analysis.changed
        );
    };
}

/// Asserts that the cells at the given coordinates are alive.
#[macro_export]
macro_rules! assert_alive {
    ($dish:expr, $coords:expr) => {
        for &(x, y) in $coords.iter() {
            assert_ne!(
                $dish.get(x, y).expect("Coordinate out of range"),
                0,
                "Cell ({}, {}) should be alive",
                x,
                y
            );
        }
    };
}
