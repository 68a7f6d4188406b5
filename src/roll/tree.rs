use super::{roller::Roller, RollContext};
use crate::common::*;
use crate::parse::ast::{DiceTerm, Reroll, Selection};
use std::fmt;

/// A result that was replaced by a reroll.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RerollRecord {
    /// Position in [Roll::raw_results] of the replaced die.
    pub index: usize,
    pub original_value: UInt,
    pub rerolled_value: UInt,
}

impl fmt::Display for RerollRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.original_value, self.rerolled_value)
    }
}

/// The outcome of rolling one [DiceTerm].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Roll {
    pub faces: UInt,
    /// Resolved value of every die in draw order, exploded extras included.
    pub raw_results: Vec<UInt>,
    /// What is left of `raw_results` after keep/drop.
    pub final_results: Vec<UInt>,
    pub total: Int,
    pub reroll_history: Vec<RerollRecord>,
}

impl Roll {
    /// Rolls every die of `term`: reroll first, then explosion, then keep/drop over the
    /// whole pool.
    pub fn roll_new<R: Roller>(ctx: &mut RollContext<R>, term: &DiceTerm) -> Self {
        let sides = term.faces;
        let mut raw_results = Vec::new();
        let mut reroll_history = Vec::new();

        for _ in 0..term.count.get() {
            let mut die = Die::roll_new(ctx, sides);
            if let Some(reroll) = term.reroll {
                die.apply_reroll(ctx, sides, reroll);
            }
            reroll_history.extend(die.records(raw_results.len()));
            raw_results.push(die.value());

            if term.explode {
                let mut last = die.value();
                while last == sides.get() {
                    last = ctx.roll_one(sides);
                    raw_results.push(last);
                }
            }
        }

        let final_results = select(&raw_results, term.selection);
        let total = final_results.iter().copied().map(Int::from).sum();

        tracing::trace!(
            faces = sides.get(),
            raw = ?raw_results,
            kept = ?final_results,
            rerolls = reroll_history.len(),
            "rolled dice term"
        );

        Self {
            faces: sides.get(),
            raw_results,
            final_results,
            total,
            reroll_history,
        }
    }

    /// Whether keep/drop changed the results.
    pub fn is_selected(&self) -> bool {
        self.final_results != self.raw_results
    }

    pub fn has_rerolls(&self) -> bool {
        !self.reroll_history.is_empty()
    }

    /// Reroll records for one position, in draw order.
    pub fn rerolls_at(&self, index: usize) -> impl Iterator<Item = &RerollRecord> + '_ {
        self.reroll_history.iter().filter(move |r| r.index == index)
    }
}

/// One die position: its first draw followed by any replacements.
#[derive(Debug, Clone)]
struct Die {
    history: NonEmpty<UInt>,
}

impl Die {
    fn roll_new<R: Roller>(ctx: &mut RollContext<R>, sides: NonZeroUInt) -> Self {
        Self {
            history: vec1![ctx.roll_one(sides)],
        }
    }

    fn value(&self) -> UInt {
        *self.history.last()
    }

    fn reroll<R: Roller>(&mut self, ctx: &mut RollContext<R>, sides: NonZeroUInt) {
        let value = ctx.roll_one(sides);
        self.history.push(value);
    }

    fn apply_reroll<R: Roller>(
        &mut self,
        ctx: &mut RollContext<R>,
        sides: NonZeroUInt,
        reroll: Reroll,
    ) {
        let threshold = reroll.threshold.get();
        match reroll.kind {
            RerollKind::Once => {
                if self.value() <= threshold {
                    self.reroll(ctx, sides);
                }
            }
            // Terminates since the parser guarantees threshold < sides.
            RerollKind::Recursive => {
                while self.value() <= threshold {
                    self.reroll(ctx, sides);
                }
            }
        }
    }

    fn records(&self, index: usize) -> impl Iterator<Item = RerollRecord> + '_ {
        self.history.as_slice().windows(2).map(move |w| RerollRecord {
            index,
            original_value: w[0],
            rerolled_value: w[1],
        })
    }
}

/// Applies keep/drop to a copy of `raw`. The sort is stable, so equal results keep their
/// relative order.
fn select(raw: &[UInt], selection: Option<Selection>) -> Vec<UInt> {
    let Selection { kind, n } = match selection {
        Some(sel) => sel,
        None => return raw.to_vec(),
    };

    let mut sorted = raw.to_vec();
    if kind.is_descending() {
        sorted.sort_by(|a, b| b.cmp(a));
    } else {
        sorted.sort();
    }

    let n = n.get().min(sorted.len());
    if kind.is_keep() {
        sorted.truncate(n);
        sorted
    } else {
        sorted.split_off(n)
    }
}

/// The right-hand side of one evaluation step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Operand {
    Literal(Int),
    /// Index into [RollResult::rolls].
    Roll(usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Step {
    /// `None` for the first term.
    pub op: Option<Operator>,
    pub operand: Operand,
}

/// The outcome of evaluating a whole expression.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RollResult {
    /// The normalized source text.
    pub expression: String,
    pub rolls: Vec<Roll>,
    pub total: Int,
    pub detail: String,
    pub(crate) steps: Vec<Step>,
}

impl RollResult {
    pub(crate) fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            rolls: Vec::new(),
            total: 0,
            detail: String::new(),
            steps: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, op: Option<Operator>, part: Part) {
        let (value, operand) = match part {
            Part::Literal(x) => (x, Operand::Literal(x)),
            Part::Roll(roll) => {
                let value = roll.total;
                self.rolls.push(roll);
                (value, Operand::Roll(self.rolls.len() - 1))
            }
        };
        self.total = match op {
            Some(op) => op.apply(self.total, value),
            None => value,
        };
        self.steps.push(Step { op, operand });
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn has_rerolls(&self) -> bool {
        self.rolls.iter().any(Roll::has_rerolls)
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} = {}", self.expression, self.detail, self.total)
    }
}

/// A term after evaluation, before it is folded into the running total.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Part {
    Literal(Int),
    Roll(Roll),
}
