//! Parse dice notation like `4d20kh2r1 + 3 for attack` and roll it.
//!
//! ```rust
//! # use dice_expression::{parse, roll, roll_with, Dice, Faces, RollOptions};
//! # use rand::rngs::StdRng;
//! # use rand::SeedableRng;
//! #
//! // Roll 4 d20, reroll the 1s, keep the highest 2 rolls and add 3.
//! let rolled = roll("4d20r1kh2+3 for attack");
//! println!("{rolled}"); // attack: 32 rolls: 4d20r1kh2(29=11+18) + 3
//!
//! // Use a custom Rng that implements the rand::Rng trait
//! let mut rng = StdRng::seed_from_u64(1);
//! let rolled = roll_with("3d200", &mut rng);
//! assert!((3..=600).contains(&rolled.value()));
//!
//! // Invalid notation still produces a result, it just can't be rolled
//! let expression = parse("0d6");
//! assert!(!expression.is_valid());
//! assert_eq!(expression.roll().to_string(), "invalid dice roll");
//!
//! // Create Dice directly without parsing
//! let dice = Dice::new(5, Faces::Standard(8), RollOptions::parse("d1"));
//! let output = dice.roll_all();
//! assert_eq!(output.kept().len(), 4);
//! ```

mod error;
mod evaluate;
mod parse;
mod special;
#[cfg(test)]
mod test_strategies;

pub use error::NotationError;
pub use evaluate::dice_roll::DieSource;
pub use evaluate::expression::{RolledExpression, RolledOperation, INVALID_ROLL};
pub use evaluate::roll::{to_notations, RollOutput};
pub use parse::{
    ComparePoint, Constant, Dice, Expression, Faces, KeepKind, Operation, Operator, RollOptions,
    Selection, MAX_DICE, MAX_EXPECTED_DRAWS,
};
pub use special::lookup as lookup_special;

/// Parses the notation returning the parsed expression without rolling the dice.
///
/// Parsing never fails, see [`Expression::validate`].
pub fn parse(notation: &str) -> Expression {
    Expression::parse(notation)
}

/// Parses the notation returning the result of rolling all the dice parsed.
pub fn roll(notation: &str) -> RolledExpression {
    Expression::parse(notation).roll()
}

/// Same as `roll()` but allows you to choose the source of the dice.
pub fn roll_with(notation: &str, source: &mut impl DieSource) -> RolledExpression {
    Expression::parse(notation).roll_with(source)
}

/// Same as `roll()` but returns the reason an invalid notation can't be rolled.
pub fn try_roll(notation: &str) -> Result<RolledExpression, NotationError> {
    let expression = Expression::parse(notation);
    expression.validate()?;
    Ok(expression.roll())
}
