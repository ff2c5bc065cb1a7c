use std::collections::VecDeque;

use proptest::prelude::*;

use crate::evaluate::dice_roll::DieSource;
use crate::parse::{Faces, MAX_DICE};

/// Hands out the given values in order, whatever die is being rolled.
pub(crate) struct ScriptedRolls(VecDeque<i64>);

impl DieSource for ScriptedRolls {
    fn roll_die(&mut self, _faces: Faces) -> i64 {
        self.0.pop_front().expect("ran out of scripted rolls")
    }
}

pub(crate) fn scripted(values: &[i64]) -> ScriptedRolls {
    ScriptedRolls(values.iter().copied().collect())
}

/// Quantity and sides of a standard dice group.
pub(crate) fn standard_dice_strategy() -> impl Strategy<Value = (u32, u64)> {
    (1..=MAX_DICE, 2..=1000u64)
}
