//! Dice-notation expression engine.
//!
//! Parses expressions such as `4d6kh3 + 2` or `2d10r2!`, rolls them against an injectable
//! random source and renders the outcome.
//!
//! ```
//! use dice_notation::roll::{format, FnRoller, FormatOptions};
//!
//! let result = dice_notation::evaluate_with("3d6+2", FnRoller(|_| 4)).unwrap();
//! assert_eq!(result.total, 14);
//! assert_eq!(result.detail, "[4,4,4] + 2");
//! assert_eq!(format(&result, &FormatOptions::default()), "🎲 3d6+2 = [4,4,4] + 2 = 14");
//! ```

mod common;
pub mod parse;
pub mod roll;

pub use common::{Int, KeepDrop, NonZeroUInt, Num, Operator, RerollKind, UInt};
pub use parse::{parse, parse_with_limits, Limits, ParseError, ParseErrorKind};
pub use roll::{Roll, RollResult, Roller};

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses and rolls `input` with the thread-local random generator.
pub fn evaluate(input: &str) -> Result<RollResult> {
    evaluate_with(input, rand::thread_rng())
}

/// Parses and rolls `input` with `roller`. Nothing is drawn unless the whole input parses.
pub fn evaluate_with<R: Roller>(input: &str, roller: R) -> Result<RollResult> {
    evaluate_with_limits(input, roller, Limits::default())
}

pub fn evaluate_with_limits<R: Roller>(
    input: &str,
    roller: R,
    limits: Limits,
) -> Result<RollResult> {
    let expr = parse_with_limits(input, limits)?;
    Ok(roll::eval(&expr, roller))
}
