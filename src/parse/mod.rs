mod dice;
mod expression;

pub use dice::*;
pub use expression::*;

use crate::NotationError;

/// Dice groups asking for more dice than this are rolled with exactly this many.
pub const MAX_DICE: u32 = 1000;

/// Dice groups whose reroll rules would need more draws than this on average are invalid.
pub const MAX_EXPECTED_DRAWS: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faces {
    /// `d{sides}`\
    /// Die numbered from 1 to `sides`.
    Standard(u64),
    /// `df` or `dF`\
    /// Fudge/Fate die with one minus, one blank and one plus side.
    Fudge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeepKind {
    Highest,
    Lowest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Which dice of a group count towards its total.
pub enum Selection {
    /// `k{amount}`, `kh{amount}` or `kl{amount}`\
    /// Keeps only the highest or lowest `{amount}` rolls.
    /// (Defaults to keep highest).
    Keep(KeepKind, u32),
    /// `d{amount}`, `dh{amount}` or `dl{amount}`\
    /// Drops the highest or lowest `{amount}` rolls.
    /// (Defaults to drop lowest).
    Drop(KeepKind, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Predicate deciding if a die has to be rerolled.
pub enum ComparePoint {
    /// `r{n}` or `r={n}`
    Equal(i64),
    /// `r<{n}`
    LessThan(i64),
    /// `r<={n}`
    LessThanOrEqual(i64),
    /// `r>{n}`
    GreaterThan(i64),
    /// `r>={n}`
    GreaterThanOrEqual(i64),
}

/// Modifiers trailing a single dice group, e.g. `kh2r1` in `4d20kh2r1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOptions {
    pub(crate) source: String,
    pub(crate) rerolls: Vec<ComparePoint>,
    pub(crate) selection: Option<Selection>,
    pub(crate) error: Option<NotationError>,
}

/// A group of dice such as `4d6dl1`, ready to be rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    pub(crate) quantity: u32,
    pub(crate) capped: bool,
    pub(crate) faces: Faces,
    pub(crate) options: RollOptions,
    pub(crate) error: Option<NotationError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `+`
    Add,
    /// `-`, never goes below 0.
    Sub,
}

/// Flat number added to or subtracted from the dice, e.g. `2` in `3d6+2`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    pub(crate) source: String,
    pub(crate) value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Operator(Operator),
    Constant(Constant),
    Roll(Dice),
}

/// Parsed notation, rolling it is done with [`Expression::roll`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Expression {
    pub(crate) operations: Vec<Operation>,
    pub(crate) label: Option<String>,
    pub(crate) special: Option<&'static str>,
}

impl std::fmt::Display for Faces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faces::Standard(sides) => write!(f, "{sides}"),
            Faces::Fudge => write!(f, "f"),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Operator::Add => "+",
            Operator::Sub => "-",
        };
        write!(f, "{str}")
    }
}
