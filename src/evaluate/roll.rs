/// The dice rolled for a single group.
///
/// `raw` has every die in the order it was rolled, rerolled ones included.
/// `kept` has the dice that count towards the total, sorted when keep or
/// drop was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOutput {
    pub(crate) raw: Vec<i64>,
    pub(crate) kept: Vec<i64>,
}

impl RollOutput {
    pub fn raw(&self) -> &[i64] {
        &self.raw
    }

    pub fn kept(&self) -> &[i64] {
        &self.kept
    }

    /// Sum of the kept dice, saturating at the bounds of `i64`.
    pub fn value(&self) -> i64 {
        self.kept.iter().fold(0, |sum, &die| sum.saturating_add(die))
    }
}

pub fn to_notations(rolls: &[i64]) -> String {
    rolls
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

impl std::fmt::Display for RollOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}={})", self.value(), to_notations(&self.kept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let output = RollOutput {
            raw: vec![1, 4, 5, 6],
            kept: vec![4, 5, 6],
        };
        assert_eq!(output.to_string(), "(15=4+5+6)");
        assert_eq!(output.value(), 15);
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(RollOutput::default().to_string(), "(0=)");
    }

    #[test]
    fn test_fudge_values_can_be_negative() {
        let output = RollOutput {
            raw: vec![-1, -1, 0],
            kept: vec![-1, -1, 0],
        };
        assert_eq!(output.to_string(), "(-2=-1+-1+0)");
    }

    #[test]
    fn test_value_saturates() {
        let output = RollOutput {
            raw: vec![i64::MAX, 5],
            kept: vec![i64::MAX, 5],
        };
        assert_eq!(output.value(), i64::MAX);
    }
}
