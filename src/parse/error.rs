use std::fmt;
use std::ops::Range;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Range<usize>, slice: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            slice: slice.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    EmptyExpression,
    InvalidExpression,
    InvalidDiceCount,
    InvalidFaceCount,
    InvalidModifierCount,
    ModifierExceedsCount,
    InvalidRerollThreshold,
    UnboundedExplosion,
    DivisionByZero,
    TooManyDice { max: usize },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExpression => f.write_str("expression is empty"),
            Self::InvalidExpression => f.write_str("not a valid dice expression"),
            Self::InvalidDiceCount => f.write_str("dice count must be at least 1"),
            Self::InvalidFaceCount => f.write_str("dice must have at least 1 face"),
            Self::InvalidModifierCount => {
                f.write_str("keep/drop count must be at least 1")
            }
            Self::ModifierExceedsCount => {
                f.write_str("keep/drop count cannot exceed the number of dice")
            }
            Self::InvalidRerollThreshold => {
                f.write_str("reroll threshold must be at least 1 and below the face count")
            }
            Self::UnboundedExplosion => f.write_str("single-faced dice cannot explode"),
            Self::DivisionByZero => f.write_str("divisor can be zero"),
            Self::TooManyDice { max } => write!(f, "more than {} dice in one expression", max),
        }
    }
}
