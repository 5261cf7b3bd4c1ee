//! Birth/survival transition rules.
//!
//! A [`Rule`] is parsed once from life-like notation and then applied to every
//! cell of every generation through [`Rule::next_value`], a pure total
//! function of the current cell value and its live-neighbor count.
//!
//! ## Notation
//!
//! - `B3/S23`: born with 3 live neighbors, survives with 2 or 3. Sections are
//!   case-insensitive and may appear in either order.
//! - `23/3`: legacy survival/birth form, digits only.
//! - `B3/S23/A64`: valued policy. Survivors age by one per generation up to 64,
//!   births start at [`BASE_ALIVE`].
//! - Presets: `conway` (or `life`), `highlife`, `daynight`, `seeds`, `lwod`.

use petri_data::{Cell, BASE_ALIVE, DEAD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest neighbor count reachable in a Moore neighborhood.
pub const MAX_NEIGHBORS: u8 = 8;

/// Error raised by a malformed rule specification. Every variant carries the
/// token that could not be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("rule specification is empty")]
    Empty,

    #[error("unrecognized rule token `{0}`")]
    UnknownToken(String),

    #[error("neighbor count `{digit}` in `{token}` is outside 0..=8")]
    CountOutOfRange { token: String, digit: char },

    #[error("rule section `{0}` appears more than once")]
    DuplicateSection(String),

    #[error("rule `{0}` is missing its {1} section")]
    MissingSection(String, char),

    #[error("invalid maximum cell value in `{0}` (expected 1..=255)")]
    InvalidMaxValue(String),
}

/// How living cell values evolve. Fixed per rule, never per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValuePolicy {
    /// Classic alive/dead automaton; every living cell holds [`BASE_ALIVE`].
    #[default]
    Binary,
    /// Living cells carry an age that grows each generation they survive,
    /// saturating at `max`.
    Aging { max: Cell },
}

impl ValuePolicy {
    #[must_use]
    pub fn max_value(&self) -> Cell {
        match self {
            ValuePolicy::Binary => BASE_ALIVE,
            ValuePolicy::Aging { max } => *max,
        }
    }
}

/// Immutable birth/survival transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rule {
    /// Bit `n` set: a dead cell with `n` live neighbors is born.
    birth: u16,
    /// Bit `n` set: a living cell with `n` live neighbors survives.
    survival: u16,
    policy: ValuePolicy,
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule {
    /// Builds a binary rule from explicit neighbor-count sets.
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self, RuleParseError> {
        Ok(Self {
            birth: mask_from_counts(birth, 'B')?,
            survival: mask_from_counts(survival, 'S')?,
            policy: ValuePolicy::Binary,
        })
    }

    /// Conway's Game of Life: B3/S23.
    #[must_use]
    pub fn conway() -> Self {
        Self {
            birth: 1 << 3,
            survival: (1 << 2) | (1 << 3),
            policy: ValuePolicy::Binary,
        }
    }

    /// HighLife: B36/S23.
    #[must_use]
    pub fn highlife() -> Self {
        Self {
            birth: (1 << 3) | (1 << 6),
            ..Self::conway()
        }
    }

    /// Day & Night: B3678/S34678.
    #[must_use]
    pub fn day_and_night() -> Self {
        Self {
            birth: (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8),
            survival: (1 << 3) | (1 << 4) | (1 << 6) | (1 << 7) | (1 << 8),
            policy: ValuePolicy::Binary,
        }
    }

    /// Seeds: B2/S, nothing survives.
    #[must_use]
    pub fn seeds() -> Self {
        Self {
            birth: 1 << 2,
            survival: 0,
            policy: ValuePolicy::Binary,
        }
    }

    /// Life without Death: B3/S012345678.
    #[must_use]
    pub fn life_without_death() -> Self {
        Self {
            birth: 1 << 3,
            survival: 0x1FF,
            policy: ValuePolicy::Binary,
        }
    }

    /// Returns the same birth/survival sets under a different value policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parses a rule specification. See the module docs for the notation.
    pub fn parse(spec: &str) -> Result<Self, RuleParseError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(RuleParseError::Empty);
        }
        if let Some(rule) = Self::preset(trimmed) {
            return Ok(rule);
        }

        let tokens: Vec<&str> = trimmed.split('/').map(str::trim).collect();

        if tokens
            .iter()
            .all(|token| token.chars().all(|c| c.is_ascii_digit()))
        {
            if tokens.len() != 2 {
                return Err(RuleParseError::UnknownToken(trimmed.to_string()));
            }
            return Ok(Self {
                survival: parse_counts(tokens[0], tokens[0])?,
                birth: parse_counts(tokens[1], tokens[1])?,
                policy: ValuePolicy::Binary,
            });
        }

        let mut birth = None;
        let mut survival = None;
        let mut policy = None;

        for token in tokens {
            let mut chars = token.chars();
            let Some(head) = chars.next() else {
                return Err(RuleParseError::UnknownToken(trimmed.to_string()));
            };
            let body = chars.as_str();

            match head.to_ascii_uppercase() {
                'B' => {
                    if birth.is_some() {
                        return Err(RuleParseError::DuplicateSection(token.to_string()));
                    }
                    birth = Some(parse_counts(token, body)?);
                }
                'S' => {
                    if survival.is_some() {
                        return Err(RuleParseError::DuplicateSection(token.to_string()));
                    }
                    survival = Some(parse_counts(token, body)?);
                }
                'A' => {
                    if policy.is_some() {
                        return Err(RuleParseError::DuplicateSection(token.to_string()));
                    }
                    let max = body
                        .parse::<Cell>()
                        .ok()
                        .filter(|max| *max >= BASE_ALIVE)
                        .ok_or_else(|| RuleParseError::InvalidMaxValue(token.to_string()))?;
                    policy = Some(ValuePolicy::Aging { max });
                }
                _ => return Err(RuleParseError::UnknownToken(token.to_string())),
            }
        }

        Ok(Self {
            birth: birth.ok_or_else(|| RuleParseError::MissingSection(trimmed.to_string(), 'B'))?,
            survival: survival
                .ok_or_else(|| RuleParseError::MissingSection(trimmed.to_string(), 'S'))?,
            policy: policy.unwrap_or_default(),
        })
    }

    fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "conway" | "life" => Some(Self::conway()),
            "highlife" => Some(Self::highlife()),
            "daynight" => Some(Self::day_and_night()),
            "seeds" => Some(Self::seeds()),
            "lwod" => Some(Self::life_without_death()),
            _ => None,
        }
    }

    /// Computes the next value of a cell. Total over every `(value, count)`
    /// pair: counts above [`MAX_NEIGHBORS`] never match a set and values above
    /// the policy maximum are treated as the maximum.
    #[inline]
    #[must_use]
    pub fn next_value(&self, current: Cell, live_neighbors: u8) -> Cell {
        if current == DEAD {
            return if contains(self.birth, live_neighbors) {
                BASE_ALIVE
            } else {
                DEAD
            };
        }

        if !contains(self.survival, live_neighbors) {
            return DEAD;
        }

        match self.policy {
            ValuePolicy::Binary => BASE_ALIVE,
            ValuePolicy::Aging { max } => current.saturating_add(1).min(max),
        }
    }

    #[must_use]
    pub fn births_on(&self, count: u8) -> bool {
        contains(self.birth, count)
    }

    #[must_use]
    pub fn survives_on(&self, count: u8) -> bool {
        contains(self.survival, count)
    }

    #[must_use]
    pub fn policy(&self) -> ValuePolicy {
        self.policy
    }

    /// Largest value a living cell may hold under this rule.
    #[must_use]
    pub fn max_value(&self) -> Cell {
        self.policy.max_value()
    }
}

#[inline]
fn contains(mask: u16, count: u8) -> bool {
    count <= MAX_NEIGHBORS && mask & (1 << count) != 0
}

fn parse_counts(token: &str, digits: &str) -> Result<u16, RuleParseError> {
    let mut mask = 0u16;
    for c in digits.chars() {
        let count = c
            .to_digit(10)
            .ok_or_else(|| RuleParseError::UnknownToken(token.to_string()))?;
        if count > MAX_NEIGHBORS as u32 {
            return Err(RuleParseError::CountOutOfRange {
                token: token.to_string(),
                digit: c,
            });
        }
        mask |= 1 << count;
    }
    Ok(mask)
}

fn mask_from_counts(counts: &[u8], section: char) -> Result<u16, RuleParseError> {
    let mut mask = 0u16;
    for &count in counts {
        if count > MAX_NEIGHBORS {
            return Err(RuleParseError::CountOutOfRange {
                token: format!("{section}{count}"),
                digit: char::from_digit(u32::from(count % 10), 10).unwrap_or('?'),
            });
        }
        mask |= 1 << count;
    }
    Ok(mask)
}

fn digits(mask: u16) -> String {
    (0..=MAX_NEIGHBORS)
        .filter(|n| contains(mask, *n))
        .map(|n| char::from(b'0' + n))
        .collect()
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}/S{}", digits(self.birth), digits(self.survival))?;
        if let ValuePolicy::Aging { max } = self.policy {
            write!(f, "/A{max}")?;
        }
        Ok(())
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rule {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}
