use super::{
    roller::Roller,
    stringify::{SimpleStringifier, Stringify},
    tree::*,
};
use crate::common::*;
use crate::parse::{
    ast,
    visit::{AstVisitor, Accept},
};

pub type DefaultRoller = rand::prelude::ThreadRng;

/// Holds the random source for one evaluation.
pub struct RollContext<R = DefaultRoller> {
    roller: R,
    draws: usize,
}

impl<R: Roller> RollContext<R> {
    pub fn new(roller: R) -> Self {
        Self { roller, draws: 0 }
    }

    pub fn roll_one(&mut self, sides: NonZeroUInt) -> UInt {
        self.draws += 1;
        self.roller.roll(sides)
    }

    /// Samples drawn so far, rerolls and explosions included.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Evaluates `expr` strictly left to right, with no operator precedence.
    pub fn eval(&mut self, expr: &ast::Expression) -> RollResult {
        let mut result = RollResult::new(expr.source());

        let first = expr.first.accept(self);
        result.push(None, first);
        for term in &expr.tail {
            let part = term.operand.accept(self);
            result.push(Some(term.op), part);
        }
        result.detail = SimpleStringifier::new().str_steps(&result);

        tracing::debug!(
            expression = %result.expression,
            total = result.total,
            rolls = result.rolls.len(),
            draws = self.draws,
            "evaluated dice expression"
        );
        result
    }
}

impl Default for RollContext<DefaultRoller> {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Roller> AstVisitor for RollContext<R> {
    type Output = Part;

    fn visit_literal(&mut self, x: &ast::Literal) -> Self::Output {
        Part::Literal(x.0)
    }

    fn visit_dice(&mut self, dice: &ast::DiceTerm) -> Self::Output {
        Part::Roll(Roll::roll_new(self, dice))
    }
}
