use log::debug;
use rand::{thread_rng, Rng};

use super::roll::RollOutput;
use crate::parse::{Dice, Faces, KeepKind, Selection};

/// Anything that can produce the value of a single die.
///
/// Every [`rand::Rng`] is a `DieSource`, drawing uniformly from the faces of the die.
pub trait DieSource {
    fn roll_die(&mut self, faces: Faces) -> i64;
}

impl<R: Rng> DieSource for R {
    fn roll_die(&mut self, faces: Faces) -> i64 {
        match faces {
            Faces::Standard(_) => self.gen_range(1..=faces.max_value()),
            Faces::Fudge => self.gen_range(-1..=1),
        }
    }
}

impl Dice {
    /// Roll the full quantity of the dice.
    /// Uses rand::thread_rng(), if you want to choose the source yourself use `roll_all_with()`
    pub fn roll_all(&self) -> RollOutput {
        self.roll_all_with(&mut thread_rng())
    }

    /// Roll the full quantity of the dice with the source specified.
    ///
    /// Dice matching a reroll rule are rolled again until they don't, then
    /// keep or drop is applied. Invalid dice are not rolled at all.
    pub fn roll_all_with(&self, source: &mut impl DieSource) -> RollOutput {
        if !self.is_valid() {
            return RollOutput::default();
        }

        let quantity = self.quantity as usize;
        let mut output = RollOutput {
            raw: Vec::with_capacity(quantity),
            kept: Vec::with_capacity(quantity),
        };

        while output.kept.len() < quantity {
            let value = source.roll_die(self.faces);
            output.raw.push(value);
            if !self.options.needs_reroll(value) {
                output.kept.push(value);
            }
        }

        match self.options.selection {
            Some(Selection::Keep(kind, amount)) => apply_keep(&mut output.kept, kind, amount),
            Some(Selection::Drop(kind, amount)) => apply_drop(&mut output.kept, kind, amount),
            None => {}
        }

        debug!("rolled {output} for {self}, raw rolls {:?}", output.raw);
        output
    }
}

fn apply_keep(rolls: &mut Vec<i64>, keep_kind: KeepKind, amount: u32) {
    rolls.sort_unstable();
    let amount = (amount as usize).min(rolls.len());

    match keep_kind {
        KeepKind::Highest => {
            let excess = rolls.len() - amount;
            rolls.drain(..excess);
        }
        KeepKind::Lowest => rolls.truncate(amount),
    }
}

fn apply_drop(rolls: &mut Vec<i64>, keep_kind: KeepKind, amount: u32) {
    rolls.sort_unstable();
    let amount = (amount as usize).min(rolls.len());

    match keep_kind {
        KeepKind::Highest => rolls.truncate(rolls.len() - amount),
        KeepKind::Lowest => {
            rolls.drain(..amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::parse::{RollOptions, MAX_DICE};
    use crate::test_strategies::{scripted, standard_dice_strategy};

    fn dice(quantity: u32, faces: Faces, modifiers: &str) -> Dice {
        Dice::new(quantity, faces, RollOptions::parse(modifiers))
    }

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn test_rolling_keeps_roll_order() {
        let output = dice(3, Faces::Standard(6), "").roll_all_with(&mut scripted(&[4, 5, 6]));

        assert_eq!(output.raw(), [4, 5, 6]);
        assert_eq!(output.kept(), [4, 5, 6]);
        assert_eq!(output.value(), 15);
    }

    #[test]
    fn test_reroll_keeps_raw_rolls() {
        let output = dice(3, Faces::Standard(6), "r1r2").roll_all_with(&mut scripted(&[1, 5, 2, 1, 3, 6]));

        assert_eq!(output.raw(), [1, 5, 2, 1, 3, 6]);
        assert_eq!(output.kept(), [5, 3, 6]);
        assert_eq!(output.value(), 14);
    }

    #[test]
    fn test_reroll_compare_point() {
        let output = dice(2, Faces::Standard(20), "r<=10").roll_all_with(&mut scripted(&[10, 11, 3, 20]));

        assert_eq!(output.kept(), [11, 20]);
    }

    #[test]
    fn test_keep_highest() {
        let output = dice(2, Faces::Standard(20), "kh1").roll_all_with(&mut scripted(&[5, 18]));

        assert_eq!(output.kept(), [18]);
        assert_eq!(output.value(), 18);
    }

    #[test]
    fn test_keep_sorts_numerically() {
        let output = dice(3, Faces::Standard(20), "k2").roll_all_with(&mut scripted(&[10, 9, 2]));

        assert_eq!(output.kept(), [9, 10]);
    }

    #[test]
    fn test_keep_lowest() {
        let output = dice(4, Faces::Standard(6), "kl2").roll_all_with(&mut scripted(&[2, 3, 4, 1]));

        assert_eq!(output.kept(), [1, 2]);
    }

    #[test]
    fn test_drop_lowest() {
        let output = dice(4, Faces::Standard(6), "d1").roll_all_with(&mut scripted(&[2, 3, 4, 1]));

        assert_eq!(output.kept(), [2, 3, 4]);
        assert_eq!(output.value(), 9);
    }

    #[test]
    fn test_drop_highest() {
        let output = dice(4, Faces::Standard(6), "dh3").roll_all_with(&mut scripted(&[2, 3, 4, 1]));

        assert_eq!(output.kept(), [1]);
    }

    #[test]
    fn test_keep_more_than_rolled() {
        let output = dice(2, Faces::Standard(6), "k5").roll_all_with(&mut scripted(&[6, 1]));

        assert_eq!(output.kept(), [1, 6]);
    }

    #[test]
    fn test_drop_more_than_rolled() {
        let output = dice(2, Faces::Standard(6), "d5").roll_all_with(&mut scripted(&[6, 1]));

        assert!(output.kept().is_empty());
        assert_eq!(output.value(), 0);
    }

    #[test]
    fn test_invalid_dice_are_not_rolled() {
        let output = dice(3, Faces::Standard(1), "").roll_all_with(&mut scripted(&[]));

        assert!(output.raw().is_empty());
        assert_eq!(output.value(), 0);
    }

    #[test]
    fn test_capped_dice_roll_max_dice() {
        let output = dice(5000, Faces::Standard(6), "").roll_all_with(&mut test_rng());

        assert_eq!(output.kept().len(), MAX_DICE as usize);
    }

    #[test]
    fn test_fudge_values() {
        let output = dice(MAX_DICE, Faces::Fudge, "").roll_all_with(&mut test_rng());

        assert!(output.kept().iter().all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn test_rng_respects_faces() {
        let mut rng = test_rng();
        for _ in 0..1000 {
            let value = rng.roll_die(Faces::Standard(2));
            assert!(value == 1 || value == 2);
        }
    }

    proptest! {
        #[test]
        fn test_kept_dice_are_in_range((quantity, sides) in standard_dice_strategy(), seed in any::<u64>()) {
            let output = dice(quantity, Faces::Standard(sides), "").roll_all_with(&mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(output.kept().len(), quantity as usize);
            prop_assert_eq!(output.raw().len(), quantity as usize);
            prop_assert!(output.kept().iter().all(|&v| v >= 1 && v as u64 <= sides));
        }

        #[test]
        fn test_rerolled_values_are_never_kept(sides in 4u64..=100, threshold in 2i64..=3, seed in any::<u64>()) {
            let modifiers = format!("r<{threshold}r{sides}");
            let output = dice(20, Faces::Standard(sides), &modifiers).roll_all_with(&mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(output.kept().len(), 20);
            prop_assert!(output.kept().iter().all(|&v| v >= threshold && v as u64 != sides));
            prop_assert!(output.raw().len() >= output.kept().len());
        }

        #[test]
        fn test_keep_and_drop_are_complementary(raw in prop::collection::vec(1i64..=20, 1..50), n in 1u32..50) {
            let quantity = raw.len() as u32;
            prop_assume!(n < quantity);

            let keep = dice(quantity, Faces::Standard(20), &format!("kh{n}"))
                .roll_all_with(&mut scripted(&raw));
            let drop = dice(quantity, Faces::Standard(20), &format!("dl{}", quantity - n))
                .roll_all_with(&mut scripted(&raw));

            prop_assert_eq!(keep.kept(), drop.kept());
            prop_assert_eq!(keep.value(), drop.value());
        }

        #[test]
        fn test_fudge_dice_are_in_range(quantity in 1u32..=200, seed in any::<u64>()) {
            let output = dice(quantity, Faces::Fudge, "").roll_all_with(&mut StdRng::seed_from_u64(seed));

            prop_assert!(output.kept().iter().all(|v| (-1..=1).contains(v)));
        }
    }
}
