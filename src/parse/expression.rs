use log::trace;
use winnow::{
    ascii::{digit0, digit1},
    combinator::{alt, opt, preceded},
    token::{one_of, take_till, take_while},
    PResult, Parser,
};

use super::{Constant, Dice, Expression, Operation, Operator};
use crate::{special, NotationError};

const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

#[derive(Debug)]
struct DiceGroup<'s> {
    sign: Option<char>,
    quantity: &'s str,
    faces: &'s str,
    modifiers: &'s str,
}

fn whitespace<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

fn sign(input: &mut &str) -> PResult<char> {
    one_of(['+', '-']).parse_next(input)
}

/// `[+-]{quantity}d{faces}{modifiers}`, whitespace is allowed before the sign and the quantity.
fn dice_group<'s>(input: &mut &'s str) -> PResult<DiceGroup<'s>> {
    (
        preceded(whitespace, opt(sign)),
        preceded(whitespace, digit0),
        one_of(['d', 'D']),
        alt((digit1, "f", "F")),
        take_till(0.., |c: char| c.is_whitespace() || c == '+' || c == '-'),
    )
        .map(|(sign, quantity, _, faces, modifiers)| DiceGroup {
            sign,
            quantity,
            faces,
            modifiers,
        })
        .parse_next(input)
}

fn signed_constant<'s>(input: &mut &'s str) -> PResult<(char, &'s str)> {
    (sign, preceded(whitespace, digit1)).parse_next(input)
}

fn label<'s>(input: &mut &'s str) -> PResult<&'s str> {
    preceded(
        ("for", take_while(1.., char::is_whitespace)),
        take_till(0.., LINE_TERMINATORS),
    )
    .parse_next(input)
}

/// Leftmost position of `input` where `parser` matches.
fn find<'s, O>(input: &'s str, mut parser: impl FnMut(&mut &'s str) -> PResult<O>) -> Option<O> {
    input
        .char_indices()
        .find_map(|(at, _)| parser(&mut &input[at..]).ok())
}

impl Operator {
    /// Combines the running total with the next operand.
    /// Subtraction stops at 0 instead of going negative.
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Operator::Add => lhs.saturating_add(rhs),
            Operator::Sub => lhs.saturating_sub(rhs).max(0),
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = NotationError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Sub),
            symbol => Err(NotationError::UnknownOperator(symbol)),
        }
    }
}

impl Constant {
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            value: source.trim().parse().ok(),
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
    pub fn error(&self) -> Option<NotationError> {
        match self.value {
            Some(_) => None,
            None => Some(NotationError::InvalidConstant(self.source.clone())),
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "{}", self.source),
        }
    }
}

impl Operation {
    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    pub fn error(&self) -> Option<NotationError> {
        match self {
            Operation::Operator(_) => None,
            Operation::Constant(constant) => constant.error(),
            Operation::Roll(dice) => dice.error().cloned(),
        }
    }
}

/// An operand together with the operator written before it.
pub(crate) struct Term<'a> {
    pub(crate) operator: Option<Operator>,
    pub(crate) operand: Operand<'a>,
}

pub(crate) enum Operand<'a> {
    Constant(&'a Constant),
    Roll(&'a Dice),
}

impl Expression {
    /// Parses the notation. This never fails, use [`Expression::validate`] to
    /// find out if the expression can be rolled.
    ///
    /// Text that can't be parsed, after the last dice group or constant, is ignored.
    pub fn parse(notation: &str) -> Self {
        if let Some(text) = special::lookup(notation) {
            return Self {
                operations: Vec::new(),
                label: None,
                special: Some(text),
            };
        }

        let mut operations = Vec::new();
        let mut found_label = None;
        let mut rest = notation;

        while !rest.is_empty() {
            let mut cursor = rest;
            if let Ok(group) = dice_group.parse_next(&mut cursor) {
                trace!("dice group {group:?} in `{notation}`");
                push_signed(&mut operations, group.sign);
                operations.push(Operation::Roll(Dice::from_notation(
                    group.quantity,
                    group.faces,
                    group.modifiers,
                )));
                rest = cursor;
                continue;
            }

            if let Some((sign, digits)) = find(rest, signed_constant) {
                trace!("constant {sign}{digits} in `{notation}`");
                push_signed(&mut operations, Some(sign));
                operations.push(Operation::Constant(Constant::parse(digits)));
            }
            found_label = find(rest, label)
                .filter(|text| !text.is_empty())
                .map(str::to_owned);
            break;
        }

        Self {
            operations,
            label: found_label,
            special: None,
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
    pub fn special(&self) -> Option<&'static str> {
        self.special
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks that the expression can be rolled, returning the first problem found.
    ///
    /// Special commands are always valid.
    pub fn validate(&self) -> Result<(), NotationError> {
        if self.special.is_some() {
            return Ok(());
        }
        self.terms().map(|_| ())
    }

    /// Pairs every operand with the operator preceding it.
    pub(crate) fn terms(&self) -> Result<Vec<Term<'_>>, NotationError> {
        let (Some(first), Some(last)) = (self.operations.first(), self.operations.last()) else {
            return Err(NotationError::Empty);
        };
        if let Some(error) = self.operations.iter().find_map(Operation::error) {
            return Err(error);
        }
        if !self
            .operations
            .iter()
            .any(|op| matches!(op, Operation::Roll(_)))
        {
            return Err(NotationError::NoDice);
        }
        if matches!(first, Operation::Operator(_)) {
            return Err(NotationError::LeadingOperator);
        }
        if matches!(last, Operation::Operator(_)) {
            return Err(NotationError::TrailingOperator);
        }

        let mut terms = Vec::with_capacity(self.operations.len());
        let mut pending = None;
        for operation in &self.operations {
            let operand = match operation {
                Operation::Operator(op) => {
                    pending = Some(*op);
                    continue;
                }
                Operation::Constant(constant) => Operand::Constant(constant),
                Operation::Roll(dice) => Operand::Roll(dice),
            };
            terms.push(Term {
                operator: pending.take(),
                operand,
            });
        }

        Ok(terms)
    }
}

fn push_signed(operations: &mut Vec<Operation>, sign: Option<char>) {
    if let Some(op) = sign.and_then(|c| Operator::try_from(c).ok()) {
        operations.push(Operation::Operator(op));
    }
}
