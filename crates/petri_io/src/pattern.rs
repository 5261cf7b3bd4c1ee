//! Seed pattern loading.
//!
//! Two text formats are understood:
//!
//! - Plaintext ("sorg"/`.cells`): one row per line, `!` starts a comment line,
//!   `.` and spaces are dead, `O o * # X` are alive and digits `1`-`9` give an
//!   explicit cell value.
//! - Run-length encoded (`.rle`), the 2-D subset of Golly's format: runs of
//!   `b`/`.` (dead), `o` (alive) and `A`-`X` (values 1-24), `$` ends a row,
//!   `!` ends the pattern.
//!
//! Patterns only describe living cells; [`place`] writes them into a dish
//! through its raw mutation API before the first generation.

use crate::error::{IoError, Result};
use petri_core::{Dish, Rule};
use petri_data::{Cell, BASE_ALIVE};
use std::path::{Path, PathBuf};

/// File extensions tried, in order, when resolving a pattern by name.
const EXTENSIONS: [&str; 3] = ["sorg", "cells", "rle"];

/// A parsed pattern: its bounding box and its living cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    width: u16,
    height: u16,
    cells: Vec<(u16, u16, Cell)>,
    rule: Option<String>,
}

/// Where a pattern lands in the dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub x_offset: i64,
    pub y_offset: i64,
    /// Center the pattern's bounding box before applying the offsets.
    pub center: bool,
}

/// Moves an RLE cursor by a run length, keeping it addressable as `u16`.
fn advance(position: usize, run: usize, line: usize) -> Result<usize> {
    position
        .checked_add(run)
        .filter(|&next| next <= u16::MAX as usize)
        .ok_or_else(|| IoError::pattern(line, "pattern is too large"))
}

fn to_dimension(value: usize, line: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| IoError::pattern(line, "pattern is too large"))
}

impl Pattern {
    pub fn parse_plaintext(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut width = 0usize;
        let mut row = 0usize;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            if raw.starts_with('!') {
                continue;
            }
            let line = raw.trim_end();
            let y = to_dimension(row, line_no)?;
            for (col, ch) in line.chars().enumerate() {
                let value = match ch {
                    '.' | ' ' => continue,
                    'O' | 'o' | '*' | '#' | 'X' => BASE_ALIVE,
                    '1'..='9' => ch as u8 - b'0',
                    _ => {
                        return Err(IoError::pattern(
                            line_no,
                            format!("unexpected character {ch:?} in column {}", col + 1),
                        ))
                    }
                };
                cells.push((to_dimension(col, line_no)?, y, value));
            }
            width = width.max(line.chars().count());
            row += 1;
        }

        Ok(Self {
            width: to_dimension(width, row)?,
            height: to_dimension(row, row)?,
            cells,
            rule: None,
        })
    }

    pub fn parse_rle(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut declared = (0usize, 0usize);
        let mut rule = None;
        let mut header_seen = false;
        let (mut x, mut y) = (0usize, 0usize);
        let mut max_x = 0usize;
        let mut any_item = false;
        let mut run: Option<usize> = None;
        let mut last_line = 0usize;

        'lines: for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            last_line = line_no;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if !header_seen && !any_item && line.starts_with('x') {
                header_seen = true;
                for field in line.split(',') {
                    let Some((key, value)) = field.split_once('=') else {
                        return Err(IoError::pattern(line_no, format!("bad header field {field:?}")));
                    };
                    let value = value.trim();
                    match key.trim() {
                        "x" => {
                            declared.0 = value.parse().map_err(|_| {
                                IoError::pattern(line_no, format!("bad width {value:?}"))
                            })?
                        }
                        "y" => {
                            declared.1 = value.parse().map_err(|_| {
                                IoError::pattern(line_no, format!("bad height {value:?}"))
                            })?
                        }
                        "rule" => rule = Some(value.to_string()),
                        _ => {}
                    }
                }
                continue;
            }

            for ch in line.chars() {
                if let Some(digit) = ch.to_digit(10) {
                    let next = run
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit as usize))
                        .ok_or_else(|| IoError::pattern(line_no, "run count overflow"))?;
                    run = Some(next);
                    continue;
                }
                if ch.is_whitespace() {
                    continue;
                }

                let n = run.take().unwrap_or(1);
                match ch {
                    'b' | '.' => x = advance(x, n, line_no)?,
                    'o' | 'A'..='X' => {
                        let value = if ch == 'o' {
                            BASE_ALIVE
                        } else {
                            ch as u8 - b'A' + 1
                        };
                        advance(x, n, line_no)?;
                        let row = to_dimension(y, line_no)?;
                        for _ in 0..n {
                            cells.push((x as u16, row, value));
                            x += 1;
                        }
                    }
                    '$' => {
                        y = advance(y, n, line_no)?;
                        x = 0;
                    }
                    '!' => break 'lines,
                    _ => {
                        return Err(IoError::pattern(
                            line_no,
                            format!("unexpected RLE item {ch:?}"),
                        ))
                    }
                }
                any_item = true;
                max_x = max_x.max(x);
            }
        }

        let used_height = cells.iter().map(|&(_, cy, _)| cy as usize + 1).max().unwrap_or(0);
        Ok(Self {
            width: to_dimension(declared.0.max(max_x), last_line)?,
            height: to_dimension(declared.1.max(used_height), last_line)?,
            cells,
            rule,
        })
    }

    /// Reads a pattern file, choosing the parser by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            IoError::from(e).with_context(format!("reading pattern {}", path.display()))
        })?;
        let is_rle = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("rle"));
        let parsed = if is_rle {
            Self::parse_rle(&text)
        } else {
            Self::parse_plaintext(&text)
        };
        parsed.map_err(|e| e.with_context(format!("parsing pattern {}", path.display())))
    }

    /// Finds the file for a pattern name inside `dir`. A name that already
    /// carries an extension is used as-is.
    pub fn resolve(dir: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let direct = dir.join(name);
        if direct.extension().is_some() && direct.is_file() {
            return Ok(direct);
        }
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                IoError::not_found(format!("pattern {name:?} in {}", dir.display()))
            })
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Living cells as `(x, y, value)` relative to the pattern's top-left.
    #[must_use]
    pub fn cells(&self) -> &[(u16, u16, Cell)] {
        &self.cells
    }

    /// Rule declared in an RLE header, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }
}

/// Writes a pattern into the dish and returns the number of cells placed.
///
/// Cell values are clamped to the dish rule's maximum. On a toroidal dish
/// placement wraps; on a bounded dish a cell falling outside is an error and
/// the dish is left untouched.
pub fn place(dish: &mut Dish, pattern: &Pattern, placement: Placement) -> Result<usize> {
    let (mut ox, mut oy) = (placement.x_offset, placement.y_offset);
    if placement.center {
        ox += (dish.width() as i64 - pattern.width as i64) / 2;
        oy += (dish.height() as i64 - pattern.height as i64) / 2;
    }

    if let Some(declared) = pattern.rule() {
        match Rule::parse(declared) {
            Ok(rule) if rule == *dish.rule() => {}
            _ => tracing::warn!(
                pattern_rule = declared,
                dish_rule = %dish.rule(),
                "Pattern was written for a different rule"
            ),
        }
    }

    let targets: Vec<(i64, i64, Cell)> = pattern
        .cells
        .iter()
        .map(|&(px, py, value)| (ox + px as i64, oy + py as i64, value))
        .collect();
    for &(x, y, _) in &targets {
        dish.get(x, y)?;
    }

    let max = dish.rule().max_value();
    for (x, y, value) in targets {
        dish.set(x, y, value.min(max))?;
    }
    Ok(pattern.cells.len())
}

/// Resolves, parses and places a named pattern.
pub fn load(dish: &mut Dish, dir: impl AsRef<Path>, name: &str, placement: Placement) -> Result<usize> {
    let path = Pattern::resolve(dir, name)?;
    let pattern = Pattern::from_file(&path)?;
    let placed = place(dish, &pattern, placement)?;
    tracing::info!(
        pattern = name,
        path = %path.display(),
        cells = placed,
        "Pattern loaded"
    );
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petri_core::ValuePolicy;
    use petri_data::{Topology, DEAD};

    const GLIDER: &str = "!Name: Glider\n.O.\n..O\nOOO\n";

    #[test]
    fn test_parse_plaintext_glider() {
        let pattern = Pattern::parse_plaintext(GLIDER).unwrap();
        assert_eq!(pattern.width(), 3);
        assert_eq!(pattern.height(), 3);
        assert_eq!(
            pattern.cells(),
            &[(1, 0, 1), (2, 1, 1), (0, 2, 1), (1, 2, 1), (2, 2, 1)]
        );
    }

    #[test]
    fn test_parse_plaintext_values_and_errors() {
        let pattern = Pattern::parse_plaintext("3.\n.9").unwrap();
        assert_eq!(pattern.cells(), &[(0, 0, 3), (1, 1, 9)]);

        let err = Pattern::parse_plaintext("..\n.?").unwrap_err();
        assert!(matches!(err, IoError::Pattern { line: 2, .. }));
    }

    #[test]
    fn test_parse_rle_glider() {
        let text = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";
        let pattern = Pattern::parse_rle(text).unwrap();
        assert_eq!(pattern.width(), 3);
        assert_eq!(pattern.height(), 3);
        assert_eq!(pattern.rule(), Some("B3/S23"));
        assert_eq!(
            pattern.cells(),
            &[(1, 0, 1), (2, 1, 1), (0, 2, 1), (1, 2, 1), (2, 2, 1)]
        );
    }

    #[test]
    fn test_parse_rle_multistate_and_blank_rows() {
        let pattern = Pattern::parse_rle("2A$\n$bC!").unwrap();
        assert_eq!(pattern.cells(), &[(0, 0, 1), (1, 0, 1), (1, 2, 3)]);
        assert_eq!(pattern.height(), 3);
        assert_eq!(pattern.width(), 2);
    }

    #[test]
    fn test_parse_rle_rejects_unknown_item() {
        let err = Pattern::parse_rle("x = 2, y = 1\n2z!").unwrap_err();
        assert!(matches!(err, IoError::Pattern { line: 2, .. }));
    }

    #[test]
    fn test_parse_rle_rejects_oversized_runs() {
        let huge = usize::MAX;
        for text in [
            format!("{huge}bo!"),
            format!("{huge}$$o!"),
            "65535bo!".to_string(),
            "65535$$o!".to_string(),
            "3o65534o!".to_string(),
        ] {
            let err = Pattern::parse_rle(&text).unwrap_err();
            assert!(
                matches!(err, IoError::Pattern { line: 1, .. }),
                "{text} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn test_place_centered() {
        let mut dish = Dish::new(7, 7, Rule::conway(), Topology::Bounded).unwrap();
        let pattern = Pattern::parse_plaintext("OOO").unwrap();
        let placed = place(
            &mut dish,
            &pattern,
            Placement {
                center: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(placed, 3);
        assert_eq!(dish.get(2, 3).unwrap(), BASE_ALIVE);
        assert_eq!(dish.get(4, 3).unwrap(), BASE_ALIVE);
        assert_eq!(dish.get(1, 3).unwrap(), DEAD);
    }

    #[test]
    fn test_place_wraps_on_torus() {
        let mut dish = Dish::new(5, 5, Rule::conway(), Topology::Toroidal).unwrap();
        let pattern = Pattern::parse_plaintext("OO").unwrap();
        place(
            &mut dish,
            &pattern,
            Placement {
                x_offset: 4,
                y_offset: 0,
                center: false,
            },
        )
        .unwrap();
        assert_eq!(dish.get(4, 0).unwrap(), BASE_ALIVE);
        assert_eq!(dish.get(0, 0).unwrap(), BASE_ALIVE);
    }

    #[test]
    fn test_place_out_of_bounds_fails() {
        let mut dish = Dish::new(3, 3, Rule::conway(), Topology::Bounded).unwrap();
        let pattern = Pattern::parse_plaintext("OOOO").unwrap();
        let err = place(&mut dish, &pattern, Placement::default()).unwrap_err();
        assert!(matches!(err, IoError::Core(_)));
        assert_eq!(dish.population(), 0);
        assert_eq!(dish.state(), petri_core::DishState::Uninitialized);
    }

    #[test]
    fn test_place_clamps_values() {
        let rule = Rule::conway().with_policy(ValuePolicy::Aging { max: 4 });
        let mut dish = Dish::new(3, 1, rule, Topology::Bounded).unwrap();
        let pattern = Pattern::parse_plaintext("29").unwrap();
        place(&mut dish, &pattern, Placement::default()).unwrap();
        assert_eq!(dish.get(0, 0).unwrap(), 2);
        assert_eq!(dish.get(1, 0).unwrap(), 4);

        let mut binary = Dish::new(3, 1, Rule::conway(), Topology::Bounded).unwrap();
        place(&mut binary, &pattern, Placement::default()).unwrap();
        assert_eq!(binary.get(1, 0).unwrap(), BASE_ALIVE);
    }

    #[test]
    fn test_resolve_and_load() {
        let dir = std::env::temp_dir().join(format!("petri_patterns_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("blinker.rle"), "x = 3, y = 1\n3o!").unwrap();

        let path = Pattern::resolve(&dir, "blinker").unwrap();
        assert!(path.ends_with("blinker.rle"));
        assert!(matches!(
            Pattern::resolve(&dir, "missing"),
            Err(IoError::NotFound(_))
        ));

        let mut dish = Dish::new(5, 5, Rule::conway(), Topology::Toroidal).unwrap();
        let placed = load(&mut dish, &dir, "blinker", Placement::default()).unwrap();
        assert_eq!(placed, 3);
        assert_eq!(dish.population(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }
}
