pub mod ast;
mod error;
mod lexer;
mod parser;
pub mod visit;

pub use error::{ParseError, ParseErrorKind};

/// Ceilings checked while parsing, before anything is rolled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Limits {
    /// Maximum sum of dice counts across every term of one expression.
    pub max_dice: Option<usize>,
}

impl Limits {
    pub const fn unbounded() -> Self {
        Self { max_dice: None }
    }

    pub const fn max_dice(max: usize) -> Self {
        Self {
            max_dice: Some(max),
        }
    }
}

/// Parses a dice expression such as `4d6kh3 + 2`.
///
/// The input is trimmed and lowercased first.
///
/// # Examples
/// ```
/// let expr = dice_notation::parse(" 3D6+2 ").unwrap();
/// assert_eq!(expr.source(), "3d6+2");
/// assert_eq!(expr.to_string(), "3d6+2");
/// ```
pub fn parse(input: &str) -> Result<ast::Expression, ParseError> {
    parse_with_limits(input, Limits::default())
}

pub fn parse_with_limits(input: &str, limits: Limits) -> Result<ast::Expression, ParseError> {
    let source = input.trim().to_lowercase();
    let parsed = parser::Parser::new(&source, limits).parse();
    if let Err(err) = &parsed {
        tracing::debug!(kind = ?err.kind, slice = %err.slice, "rejected dice expression");
    }
    parsed
}
