mod ctx;
mod roller;
mod stringify;
mod tree;

pub use ctx::{DefaultRoller, RollContext};
pub use roller::{FnRoller, Roller};
pub use stringify::{
    error_message, format, success_message, FormatOptions, MessageStringifier, SimpleStringifier,
    Stringify, DICE_GLYPH, ERROR_GLYPH, SUCCESS_GLYPH,
};
pub use tree::{Operand, Part, RerollRecord, Roll, RollResult, Step};

use crate::parse::ast;

/// Evaluates a parsed expression against `roller`.
pub fn eval<R: Roller>(expr: &ast::Expression, roller: R) -> RollResult {
    RollContext::new(roller).eval(expr)
}
