use log::debug;
use rand::thread_rng;

use super::{dice_roll::DieSource, roll::RollOutput};
use crate::parse::{Dice, Expression, Operand, Operator, Term};
use crate::NotationError;

/// What an invalid expression renders as.
pub const INVALID_ROLL: &str = "invalid dice roll";

/// A single step of a rolled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RolledOperation {
    Operator(Operator),
    Constant(i64),
    Roll(Dice, RollOutput),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
enum Outcome {
    Special(&'static str),
    Invalid(NotationError),
    Rolled {
        value: i64,
        operations: Vec<RolledOperation>,
    },
}

/// The result of rolling an [`Expression`].
///
/// Displays as `[label: ]{value} rolls: {trace}`, as the text of a special
/// command, or as [`INVALID_ROLL`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RolledExpression {
    label: Option<String>,
    outcome: Outcome,
}

impl Expression {
    /// Rolls the expression.
    /// Uses rand::thread_rng(), if you want to choose the source yourself use `roll_with()`
    pub fn roll(&self) -> RolledExpression {
        self.roll_with(&mut thread_rng())
    }

    /// Rolls every dice group and folds the operands from left to right.
    ///
    /// An operand written after an operator is combined with the running
    /// total, one without an operator replaces it.
    pub fn roll_with(&self, source: &mut impl DieSource) -> RolledExpression {
        let label = self.label.clone();

        if let Some(text) = self.special {
            return RolledExpression {
                label,
                outcome: Outcome::Special(text),
            };
        }

        let terms = match self.terms() {
            Ok(terms) => terms,
            Err(error) => {
                debug!("not rolling invalid expression: {error}");
                return RolledExpression {
                    label,
                    outcome: Outcome::Invalid(error),
                };
            }
        };

        let mut total = 0;
        let mut operations = Vec::with_capacity(self.operations.len());
        for Term { operator, operand } in terms {
            let (value, rolled) = match operand {
                Operand::Constant(constant) => {
                    let value = constant.value().unwrap_or_default();
                    (value, RolledOperation::Constant(value))
                }
                Operand::Roll(dice) => {
                    let output = dice.roll_all_with(source);
                    (output.value(), RolledOperation::Roll(dice.clone(), output))
                }
            };

            total = match operator {
                Some(op) => {
                    operations.push(RolledOperation::Operator(op));
                    op.apply(total, value)
                }
                None => value,
            };
            operations.push(rolled);
        }

        RolledExpression {
            label,
            outcome: Outcome::Rolled {
                value: total,
                operations,
            },
        }
    }
}

impl RolledExpression {
    /// The final total, 0 for invalid expressions and special commands.
    pub fn value(&self) -> i64 {
        match self.outcome {
            Outcome::Rolled { value, .. } => value,
            _ => 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.outcome, Outcome::Invalid(_))
    }

    pub fn error(&self) -> Option<&NotationError> {
        match &self.outcome {
            Outcome::Invalid(error) => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn special(&self) -> Option<&'static str> {
        match self.outcome {
            Outcome::Special(text) => Some(text),
            _ => None,
        }
    }

    pub fn operations(&self) -> &[RolledOperation] {
        match &self.outcome {
            Outcome::Rolled { operations, .. } => operations,
            _ => &[],
        }
    }

    /// Every dice group with the dice it rolled.
    pub fn rolls(&self) -> impl Iterator<Item = (&Dice, &RollOutput)> {
        self.operations().iter().filter_map(|op| match op {
            RolledOperation::Roll(dice, output) => Some((dice, output)),
            _ => None,
        })
    }

    /// Every operation rendered one after the other, e.g. `3d6(15=4+5+6) + 2`.
    pub fn trace(&self) -> String {
        self.operations().iter().map(|op| op.to_string()).collect()
    }
}

impl std::fmt::Display for RolledOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RolledOperation::Operator(op) => write!(f, " {op} "),
            RolledOperation::Constant(value) => write!(f, "{value}"),
            RolledOperation::Roll(dice, output) => {
                if dice.is_capped() {
                    write!(f, "(nice try)")?;
                }
                write!(f, "{dice}{output}")
            }
        }
    }
}

impl std::fmt::Display for RolledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Outcome::Special(text) => write!(f, "{text}"),
            Outcome::Invalid(_) => write!(f, "{INVALID_ROLL}"),
            Outcome::Rolled { value, .. } => {
                if let Some(label) = &self.label {
                    write!(f, "{label}: ")?;
                }
                write!(f, "{value} rolls: {}", self.trace())
            }
        }
    }
}
