use std::fmt::{self, Write};
use std::num::{NonZeroU32, NonZeroUsize};
pub use vec1::vec1;

/// Running totals and integer literals.
pub type Int = i64;
/// A single face value.
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

/// Number of dice in a term.
pub type Num = NonZeroUsize;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeepDrop {
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
}

impl KeepDrop {
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::KeepHighest | Self::KeepLowest)
    }

    /// Whether the selection sorts the results from highest to lowest.
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::KeepHighest | Self::DropHighest)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeepHighest => "kh",
            Self::KeepLowest => "kl",
            Self::DropHighest => "dh",
            Self::DropLowest => "dl",
        }
    }
}

impl fmt::Display for KeepDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RerollKind {
    /// Replace a low result exactly once, keeping the replacement whatever it is.
    Once,
    /// Keep replacing until the result is above the threshold.
    Recursive,
}

impl RerollKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "r",
            Self::Recursive => "rr",
        }
    }
}

impl fmt::Display for RerollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Applies the operator to the running total.
    ///
    /// `+`, `-` and `*` saturate at the bounds of [`Int`]. `/` is floor division, so a
    /// negative running total rounds toward negative infinity. The parser rejects every
    /// divisor that could be zero, so `rhs` is never zero here.
    pub fn apply(self, lhs: Int, rhs: Int) -> Int {
        match self {
            Self::Add => lhs.saturating_add(rhs),
            Self::Sub => lhs.saturating_sub(rhs),
            Self::Mul => lhs.saturating_mul(rhs),
            Self::Div => floor_div(lhs, rhs),
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

fn floor_div(lhs: Int, rhs: Int) -> Int {
    if rhs == 0 {
        return 0;
    }
    let quotient = lhs.checked_div(rhs).unwrap_or(Int::MAX);
    if lhs.checked_rem(rhs).unwrap_or(0) != 0 && (lhs < 0) != (rhs < 0) {
        quotient - 1
    } else {
        quotient
    }
}
