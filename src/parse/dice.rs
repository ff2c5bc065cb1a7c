use log::trace;
use winnow::{
    ascii::digit1,
    combinator::opt,
    token::{one_of, take_till},
    PResult, Parser,
};

use super::{ComparePoint, Dice, Faces, KeepKind, RollOptions, Selection, MAX_DICE, MAX_EXPECTED_DRAWS};
use crate::NotationError;

const MODIFIER_LETTERS: [char; 6] = ['r', 'R', 'k', 'K', 'd', 'D'];

/// A modifier letter followed by everything up to the next modifier letter.
fn modifier_token<'s>(input: &mut &'s str) -> PResult<(char, &'s str)> {
    (one_of(MODIFIER_LETTERS), take_till(1.., MODIFIER_LETTERS)).parse_next(input)
}

fn reroll_rule<'s>(input: &mut &'s str) -> PResult<(Option<char>, Option<char>, &'s str)> {
    (opt(one_of(['<', '>'])), opt('='), digit1).parse_next(input)
}

fn keep_drop_amount<'s>(input: &mut &'s str) -> PResult<(Option<char>, &'s str)> {
    (opt(one_of(['h', 'H', 'l', 'L'])), digit1).parse_next(input)
}

/// Parses a run of ascii digits, numbers too big for `T` become `saturated`.
pub(crate) fn parse_digits<T: std::str::FromStr>(digits: &str, saturated: T) -> T {
    digits.parse().unwrap_or(saturated)
}

impl RollOptions {
    /// Parses the modifiers of a dice group.
    ///
    /// Parsing stops at the first character that doesn't start a modifier,
    /// anything after it is ignored. Malformed modifiers don't stop parsing,
    /// they make the options invalid.
    pub fn parse(source: &str) -> Self {
        let mut options = RollOptions {
            source: source.to_owned(),
            ..Default::default()
        };

        let mut selected = false;
        let mut rest = source;
        while let Ok((letter, value)) = modifier_token.parse_next(&mut rest) {
            trace!("modifier `{letter}{value}` in `{source}`");
            let token = format!("{letter}{value}");

            match letter.to_ascii_lowercase() {
                'r' => options.parse_reroll(&token, value),
                letter => {
                    if std::mem::replace(&mut selected, true) {
                        options.invalidate(NotationError::KeepDropConflict);
                    }
                    if letter == 'k' {
                        options.parse_selection(&token, value, Selection::Keep, KeepKind::Highest);
                    } else {
                        options.parse_selection(&token, value, Selection::Drop, KeepKind::Lowest);
                    }
                }
            }
        }

        options
    }

    fn parse_reroll(&mut self, token: &str, mut value: &str) {
        let Ok((compare, equals, digits)) = reroll_rule.parse_next(&mut value) else {
            self.invalidate(NotationError::MissingAmount(token.to_owned()));
            return;
        };

        let n = parse_digits(digits, i64::MAX);
        if n == 0 {
            self.invalidate(NotationError::ZeroAmount(token.to_owned()));
            return;
        }

        let compare_point = match (compare, equals.is_some()) {
            (Some('<'), true) => ComparePoint::LessThanOrEqual(n),
            (Some('<'), false) => ComparePoint::LessThan(n),
            (Some(_), true) => ComparePoint::GreaterThanOrEqual(n),
            (Some(_), false) => ComparePoint::GreaterThan(n),
            (None, _) => ComparePoint::Equal(n),
        };
        self.rerolls.push(compare_point);
    }

    fn parse_selection(
        &mut self,
        token: &str,
        mut value: &str,
        selection: fn(KeepKind, u32) -> Selection,
        default_kind: KeepKind,
    ) {
        let Ok((kind, digits)) = keep_drop_amount.parse_next(&mut value) else {
            self.invalidate(NotationError::MissingAmount(token.to_owned()));
            return;
        };

        let amount = parse_digits(digits, u32::MAX);
        if amount == 0 {
            self.invalidate(NotationError::ZeroAmount(token.to_owned()));
            return;
        }

        let kind = match kind.map(|c| c.to_ascii_lowercase()) {
            Some('h') => KeepKind::Highest,
            Some(_) => KeepKind::Lowest,
            None => default_kind,
        };
        self.selection = Some(selection(kind, amount));
    }

    /// Only the first error is kept.
    fn invalidate(&mut self, error: NotationError) {
        self.error.get_or_insert(error);
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
    pub fn rerolls(&self) -> &[ComparePoint] {
        &self.rerolls
    }
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }
    pub fn keep_count(&self) -> Option<u32> {
        match self.selection {
            Some(Selection::Keep(_, amount)) => Some(amount),
            _ => None,
        }
    }
    pub fn drop_count(&self) -> Option<u32> {
        match self.selection {
            Some(Selection::Drop(_, amount)) => Some(amount),
            _ => None,
        }
    }
    pub fn selects_highest(&self) -> bool {
        matches!(
            self.selection,
            Some(Selection::Keep(KeepKind::Highest, _) | Selection::Drop(KeepKind::Highest, _))
        )
    }
    pub fn selects_lowest(&self) -> bool {
        matches!(
            self.selection,
            Some(Selection::Keep(KeepKind::Lowest, _) | Selection::Drop(KeepKind::Lowest, _))
        )
    }

    /// True if any reroll rule matches the value.
    pub fn needs_reroll(&self, value: i64) -> bool {
        self.rerolls.iter().any(|cmp| cmp.matches(value))
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
    pub fn error(&self) -> Option<&NotationError> {
        self.error.as_ref()
    }
}

impl std::fmt::Display for RollOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl ComparePoint {
    pub fn matches(self, value: i64) -> bool {
        match self {
            ComparePoint::Equal(n) => value == n,
            ComparePoint::LessThan(n) => value < n,
            ComparePoint::LessThanOrEqual(n) => value <= n,
            ComparePoint::GreaterThan(n) => value > n,
            ComparePoint::GreaterThanOrEqual(n) => value >= n,
        }
    }

    fn value(self) -> i64 {
        match self {
            ComparePoint::Equal(n)
            | ComparePoint::LessThan(n)
            | ComparePoint::LessThanOrEqual(n)
            | ComparePoint::GreaterThan(n)
            | ComparePoint::GreaterThanOrEqual(n) => n,
        }
    }
}

impl Faces {
    pub fn min_value(self) -> i64 {
        match self {
            Faces::Standard(_) => 1,
            Faces::Fudge => -1,
        }
    }

    /// Highest face, dice with more than `i64::MAX` sides top out there.
    pub fn max_value(self) -> i64 {
        match self {
            Faces::Standard(sides) => i64::try_from(sides).unwrap_or(i64::MAX),
            Faces::Fudge => 1,
        }
    }

    pub fn count(self) -> u64 {
        (i128::from(self.max_value()) - i128::from(self.min_value()) + 1) as u64
    }

    /// Number of faces not matched by any of the reroll rules.
    ///
    /// The `<`, `<=`, `>` and `>=` rules cut the faces down to a single
    /// range, the `=` rules then remove single faces from it.
    pub fn surviving_faces(self, rerolls: &[ComparePoint]) -> u64 {
        let mut low = i128::from(self.min_value());
        let mut high = i128::from(self.max_value());
        let mut excluded = Vec::new();

        for cmp in rerolls {
            let n = i128::from(cmp.value());
            match cmp {
                ComparePoint::Equal(_) => excluded.push(n),
                ComparePoint::LessThan(_) => low = low.max(n),
                ComparePoint::LessThanOrEqual(_) => low = low.max(n + 1),
                ComparePoint::GreaterThan(_) => high = high.min(n),
                ComparePoint::GreaterThanOrEqual(_) => high = high.min(n - 1),
            }
        }
        if low > high {
            return 0;
        }

        excluded.sort_unstable();
        excluded.dedup();
        let removed = excluded.iter().filter(|n| (low..=high).contains(*n)).count();
        (high - low + 1 - removed as i128) as u64
    }
}

/// Average number of draws needed to keep `quantity` dice, `None` if no face survives.
fn expected_draws(quantity: u32, faces: Faces, rerolls: &[ComparePoint]) -> Option<u128> {
    let surviving = u128::from(faces.surviving_faces(rerolls));
    if surviving == 0 {
        return None;
    }
    Some(u128::from(quantity) * u128::from(faces.count()) / surviving)
}

fn cap_quantity(quantity: u32) -> (u32, bool) {
    (quantity.min(MAX_DICE), quantity > MAX_DICE)
}

fn check(quantity: u32, faces: Faces, options: &RollOptions) -> Result<(), NotationError> {
    if quantity == 0 {
        return Err(NotationError::ZeroDice);
    }
    if let Faces::Standard(sides) = faces {
        if sides < 2 {
            return Err(NotationError::TooFewFaces(sides));
        }
        if i64::try_from(sides).is_err() {
            return Err(NotationError::FacesOutOfRange(sides.to_string()));
        }
    }
    if let Some(error) = &options.error {
        return Err(error.clone());
    }
    match expected_draws(quantity, faces, &options.rerolls) {
        None => Err(NotationError::RerollExhaustsDie(faces)),
        Some(draws) if draws > u128::from(MAX_EXPECTED_DRAWS) => {
            Err(NotationError::RerollsTooLikely(faces))
        }
        Some(_) => Ok(()),
    }
}

impl Dice {
    /// Creates a new dice group.
    /// A quantity above [`MAX_DICE`] is lowered to it and the dice are marked as capped.
    pub fn new(quantity: u32, faces: Faces, options: RollOptions) -> Self {
        let (quantity, capped) = cap_quantity(quantity);
        let error = check(quantity, faces, &options).err();

        Self {
            quantity,
            capped,
            faces,
            options,
            error,
        }
    }

    /// Builds the dice from the pieces of a `{quantity}d{faces}{modifiers}` group.
    pub(crate) fn from_notation(quantity: &str, faces: &str, modifiers: &str) -> Self {
        let quantity = if quantity.is_empty() {
            1
        } else {
            parse_digits(quantity, u32::MAX)
        };
        let options = RollOptions::parse(modifiers);

        if faces.eq_ignore_ascii_case("f") {
            return Self::new(quantity, Faces::Fudge, options);
        }
        match faces.parse() {
            Ok(sides) => Self::new(quantity, Faces::Standard(sides), options),
            Err(_) => {
                let (quantity, capped) = cap_quantity(quantity);
                Self {
                    quantity,
                    capped,
                    faces: Faces::Standard(0),
                    options,
                    error: Some(NotationError::FacesOutOfRange(faces.to_owned())),
                }
            }
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn is_capped(&self) -> bool {
        self.capped
    }
    pub fn faces(&self) -> Faces {
        self.faces
    }
    pub fn options(&self) -> &RollOptions {
        &self.options
    }
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
    pub fn error(&self) -> Option<&NotationError> {
        self.error.as_ref()
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}{}", self.quantity, self.faces, self.options)
    }
}
