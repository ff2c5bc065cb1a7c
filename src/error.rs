use crate::parse::Faces;

/// Reasons a piece of notation cannot be rolled.
///
/// Parsing never fails outright, instead every operation keeps the first
/// error it ran into and the expression reports the first invalid operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotationError {
    #[error("the expression is empty")]
    Empty,

    #[error("the expression does not roll any dice")]
    NoDice,

    #[error("the expression starts with an operator")]
    LeadingOperator,

    #[error("the expression ends with an operator")]
    TrailingOperator,

    #[error("at least one die has to be rolled")]
    ZeroDice,

    #[error("a die needs more than one face, got {0}")]
    TooFewFaces(u64),

    #[error("a die with {0} faces is too large")]
    FacesOutOfRange(String),

    #[error("modifier `{0}` is missing its amount")]
    MissingAmount(String),

    #[error("modifier `{0}` needs an amount greater than 0")]
    ZeroAmount(String),

    #[error("keep and drop can't be used on the same dice")]
    KeepDropConflict,

    #[error("the reroll rules match every face of a d{0}")]
    RerollExhaustsDie(Faces),

    #[error("the reroll rules leave too few faces of a d{0} to ever finish rolling")]
    RerollsTooLikely(Faces),

    #[error("`{0}` is not a valid constant")]
    InvalidConstant(String),

    #[error("`{0}` is not an operator, use + or -")]
    UnknownOperator(char),
}
