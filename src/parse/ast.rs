use crate::common::*;
use std::fmt;

/// A parsed dice expression: a first term followed by operator/term pairs, evaluated
/// strictly left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub first: Term,
    pub tail: Vec<ArithmeticTerm>,
    pub(crate) source: String,
}

impl Expression {
    pub(crate) fn new(first: Term, tail: Vec<ArithmeticTerm>, source: String) -> Self {
        Self { first, tail, source }
    }

    /// The trimmed, lowercased text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for term in &self.tail {
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ArithmeticTerm {
    pub op: Operator,
    pub operand: Term,
}

impl ArithmeticTerm {
    pub fn new(op: Operator, operand: impl Into<Term>) -> Self {
        Self {
            op,
            operand: operand.into(),
        }
    }
}

impl fmt::Display for ArithmeticTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}

#[enum_dispatch::enum_dispatch]
pub trait TermInfo {
    /// Dice rolled before any reroll or explosion.
    fn dice_count(&self) -> usize;

    /// Whether the term can evaluate to zero.
    fn may_be_zero(&self) -> bool;
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[enum_dispatch::enum_dispatch(TermInfo)]
pub enum Term {
    Dice(DiceTerm),
    Literal(Literal),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Literal(x) => fmt::Display::fmt(x, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Literal(pub Int);

impl TermInfo for Literal {
    fn dice_count(&self) -> usize {
        0
    }

    fn may_be_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Int> for Term {
    fn from(x: Int) -> Self {
        Self::Literal(Literal(x))
    }
}

/// Keep or drop the `n` highest or lowest results of a term.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Selection {
    pub kind: KeepDrop,
    pub n: Num,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.n)
    }
}

/// Replace results at or below `threshold`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Reroll {
    pub kind: RerollKind,
    pub threshold: NonZeroUInt,
}

impl fmt::Display for Reroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.threshold)
    }
}

/// An `NdM` unit with its modifiers.
///
/// The parser guarantees `selection.n <= count` and `reroll.threshold < faces`, and never
/// produces an exploding term with a single face.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DiceTerm {
    pub count: Num,
    pub faces: NonZeroUInt,
    pub selection: Option<Selection>,
    pub explode: bool,
    pub reroll: Option<Reroll>,
}

impl DiceTerm {
    pub const fn new(count: Num, faces: NonZeroUInt) -> Self {
        Self {
            count,
            faces,
            selection: None,
            explode: false,
            reroll: None,
        }
    }

    pub fn with_selection(mut self, kind: KeepDrop, n: Num) -> Self {
        self.selection = Some(Selection { kind, n });
        self
    }

    pub fn exploding(mut self) -> Self {
        self.explode = true;
        self
    }

    pub fn with_reroll(mut self, kind: RerollKind, threshold: NonZeroUInt) -> Self {
        self.reroll = Some(Reroll { kind, threshold });
        self
    }
}

impl TermInfo for DiceTerm {
    fn dice_count(&self) -> usize {
        self.count.get()
    }

    fn may_be_zero(&self) -> bool {
        // Every face is at least 1, so only dropping the whole pool can reach zero.
        matches!(
            self.selection,
            Some(Selection { kind, n }) if !kind.is_keep() && n == self.count
        )
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        if let Some(sel) = &self.selection {
            write!(f, "{}", sel)?;
        }
        if self.explode {
            f.write_str("!")?;
        }
        if let Some(reroll) = &self.reroll {
            write!(f, "{}", reroll)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;

    #[test]
    fn test_dice_display() {
        assert_eq!(dice(1, 20).to_string(), "1d20");
        assert_eq!(
            dice(4, 6)
                .with_selection(KeepDrop::KeepHighest, num(3))
                .exploding()
                .with_reroll(RerollKind::Once, faces(2))
                .to_string(),
            "4d6kh3!r2"
        );
    }

    #[test]
    fn test_may_be_zero() {
        assert!(Literal(0).may_be_zero());
        assert!(!Literal(3).may_be_zero());
        assert!(!dice(2, 6).may_be_zero());
        assert!(!dice(2, 6).with_selection(KeepDrop::KeepLowest, num(2)).may_be_zero());
        assert!(!dice(2, 6).with_selection(KeepDrop::DropLowest, num(1)).may_be_zero());
        assert!(dice(2, 6).with_selection(KeepDrop::DropHighest, num(2)).may_be_zero());
    }

    #[test]
    fn test_term_dispatch() {
        let term: Term = dice(3, 8).into();
        assert_eq!(term.dice_count(), 3);
        let term: Term = Literal(5).into();
        assert_eq!(term.dice_count(), 0);
    }
}
