use super::{ast::*, error::*, lexer::*, Limits};
use crate::common::*;
use logos_iter::LogosIter;
use std::ops::Range;
use std::str::FromStr;

type PResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over the token stream.
///
/// Grammar, after trimming and lowercasing:
///
/// ```text
/// Expression := Term (Operator Term)*
/// Term       := DiceTerm | Integer
/// DiceTerm   := Integer? 'd' Integer (KeepDrop Integer?)? '!'? (RerollKind Integer?)?
/// KeepDrop   := 'kh' | 'kl' | 'dh' | 'dl'
/// RerollKind := 'rr' | 'r'
/// ```
pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    limits: Limits,
    dice: usize,
    span: Range<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, limits: Limits) -> Self {
        Self {
            source,
            lexer: lexer(source),
            limits,
            dice: 0,
            span: 0..0,
        }
    }

    pub fn parse(mut self) -> PResult<Expression> {
        if self.source.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyExpression, 0..0, ""));
        }

        let (first, span) = self.parse_term()?;
        self.count_dice(&first, span)?;
        let mut tail = Vec::new();

        while self.lexer.peek().is_some() {
            let op = self.parse_operator()?;
            let op_start = self.span.start;
            let (operand, span) = self.parse_term()?;
            self.count_dice(&operand, span.clone())?;
            if op == Operator::Div && operand.may_be_zero() {
                return Err(self.error_at(ParseErrorKind::DivisionByZero, op_start..span.end));
            }
            tail.push(ArithmeticTerm::new(op, operand));
        }

        Ok(Expression::new(first, tail, self.source.to_owned()))
    }

    /// Consumes the next token, remembering its span. The span is captured straight away
    /// since peeking may move the lexer on.
    fn advance(&mut self) -> Option<TokenKind> {
        let next = self.lexer.next();
        self.span = match next {
            Some(_) => self.lexer.span(),
            None => self.source.len()..self.source.len(),
        };
        next
    }

    fn slice(&self) -> &'a str {
        self.source.get(self.span.clone()).unwrap_or_default()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn peek_map<T>(&mut self, f: impl FnOnce(&TokenKind) -> Option<T>) -> Option<T> {
        self.lexer.peek().and_then(f)
    }

    fn error_at(&self, kind: ParseErrorKind, span: Range<usize>) -> ParseError {
        let slice = self.source.get(span.clone()).unwrap_or_default();
        ParseError::new(kind, span, slice)
    }

    /// Everything from the last consumed token onward is unparseable.
    fn rest_error(&self) -> ParseError {
        let start = self.span.start.min(self.source.len());
        self.error_at(ParseErrorKind::InvalidExpression, start..self.source.len())
    }

    fn end_error(&self) -> ParseError {
        let end = self.source.len();
        self.error_at(ParseErrorKind::InvalidExpression, end..end)
    }

    fn count_dice(&mut self, term: &Term, span: Range<usize>) -> PResult<()> {
        self.dice = self.dice.saturating_add(term.dice_count());
        match self.limits.max_dice {
            Some(max) if self.dice > max => {
                Err(self.error_at(ParseErrorKind::TooManyDice { max }, span))
            }
            _ => Ok(()),
        }
    }

    fn parse_operator(&mut self) -> PResult<Operator> {
        match self.advance().and_then(|kind| kind.as_operator()) {
            Some(op) => Ok(op),
            None => Err(self.rest_error()),
        }
    }

    fn parse_term(&mut self) -> PResult<(Term, Range<usize>)> {
        match self.advance() {
            Some(TokenKind::Dice) => {
                let start = self.span.start;
                let dice = self.parse_dice()?;
                Ok((dice.into(), start..self.span.end))
            }
            Some(TokenKind::Integer) => {
                let span = self.span.clone();
                match self.slice().parse::<Int>() {
                    Ok(x) => Ok((Literal(x).into(), span)),
                    Err(_) => Err(self.error_at(ParseErrorKind::InvalidExpression, span)),
                }
            }
            Some(_) => Err(self.rest_error()),
            None => Err(self.end_error()),
        }
    }

    /// Consumes an optional integer following a modifier. `Some(None)` means an integer was
    /// present but does not fit `T`.
    fn modifier_value<T: FromStr>(&mut self) -> Option<Option<T>> {
        if self.matches(TokenKind::Integer) {
            self.advance();
            Some(self.slice().parse().ok())
        } else {
            None
        }
    }

    fn parse_dice(&mut self) -> PResult<DiceTerm> {
        use ParseErrorKind::*;

        let span = self.span.clone();
        let source = self.source;
        let (count, faces) = source
            .get(span.clone())
            .and_then(|s| s.split_once('d'))
            .ok_or_else(|| self.error_at(InvalidExpression, span.clone()))?;

        let count = if count.is_empty() {
            Some(1)
        } else {
            count.parse::<usize>().ok()
        };
        let count = count
            .and_then(Num::new)
            .ok_or_else(|| self.error_at(InvalidDiceCount, span.clone()))?;
        let faces = faces
            .parse::<UInt>()
            .ok()
            .and_then(NonZeroUInt::new)
            .ok_or_else(|| self.error_at(InvalidFaceCount, span.clone()))?;

        let mut dice = DiceTerm::new(count, faces);

        if let Some(kind) = self.peek_map(TokenKind::as_keep_drop) {
            self.advance();
            let start = self.span.start;
            let n = self.modifier_value::<usize>().unwrap_or(Some(1));
            let sel_span = start..self.span.end;
            let n = match n.and_then(Num::new) {
                Some(n) => n,
                None => return Err(self.error_at(InvalidModifierCount, sel_span)),
            };
            if n > count {
                return Err(self.error_at(ModifierExceedsCount, sel_span));
            }
            dice = dice.with_selection(kind, n);
        }

        if self.matches(TokenKind::Explode) {
            self.advance();
            if faces.get() == 1 {
                return Err(self.error_at(UnboundedExplosion, span.start..self.span.end));
            }
            dice = dice.exploding();
        }

        if let Some(kind) = self.peek_map(TokenKind::as_reroll) {
            self.advance();
            let start = self.span.start;
            let threshold = self.modifier_value::<UInt>().unwrap_or(Some(1));
            let reroll_span = start..self.span.end;
            let threshold = match threshold
                .and_then(NonZeroUInt::new)
                .filter(|t| t.get() < faces.get())
            {
                Some(t) => t,
                None => return Err(self.error_at(InvalidRerollThreshold, reroll_span)),
            };
            dice = dice.with_reroll(kind, threshold);
        }

        Ok(dice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;
    use KeepDrop::*;
    use ParseErrorKind::*;

    fn parse(s: &str) -> PResult<Expression> {
        Parser::new(s, Limits::default()).parse()
    }

    fn check(s: &str, first: impl Into<Term>, tail: Vec<ArithmeticTerm>) {
        let parsed = parse(s).unwrap();
        assert_eq!(parsed.first, first.into());
        assert_eq!(parsed.tail, tail);
    }

    macro_rules! check_err {
        ($input:expr, $kind:expr, $slice:expr) => {
            let err = parse($input).unwrap_err();
            assert_eq!(err.kind, $kind, "kind for {:?}", $input);
            assert_eq!(&err.slice, $slice, "slice for {:?}", $input);
        };
    }

    #[test]
    fn test_parse_literals() {
        check("32", lit(32), vec![]);
        check("1+2", lit(1), vec![ArithmeticTerm::new(Operator::Add, lit(2))]);
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", dice(1, 20), vec![]);
        check("d4", dice(1, 4), vec![]);
        check("4d6kh", dice(4, 6).with_selection(KeepHighest, num(1)), vec![]);
        check("4d6dl2", dice(4, 6).with_selection(DropLowest, num(2)), vec![]);
        check("3d6!", dice(3, 6).exploding(), vec![]);
        check("2d10r", dice(2, 10).with_reroll(RerollKind::Once, faces(1)), vec![]);
        check(
            "2d10rr3",
            dice(2, 10).with_reroll(RerollKind::Recursive, faces(3)),
            vec![],
        );
        check(
            "10d8kl3!r2",
            dice(10, 8)
                .with_selection(KeepLowest, num(3))
                .exploding()
                .with_reroll(RerollKind::Once, faces(2)),
            vec![],
        );
    }

    #[test]
    fn test_parse_longest_match() {
        check("3d6+2", dice(3, 6), vec![ArithmeticTerm::new(Operator::Add, lit(2))]);
        check(
            "3d6 + 2 * 3 - d4 / 2",
            dice(3, 6),
            vec![
                ArithmeticTerm::new(Operator::Add, lit(2)),
                ArithmeticTerm::new(Operator::Mul, lit(3)),
                ArithmeticTerm::new(Operator::Sub, dice(1, 4)),
                ArithmeticTerm::new(Operator::Div, lit(2)),
            ],
        );
    }

    #[test]
    fn test_parse_errors() {
        check_err!("", EmptyExpression, "");
        check_err!("xyz", InvalidExpression, "xyz");
        check_err!("3d6+", InvalidExpression, "");
        check_err!("3d6 x", InvalidExpression, "x");
        check_err!("3d6 2", InvalidExpression, "2");
        check_err!("-3", InvalidExpression, "-3");
        check_err!("4d", InvalidExpression, "d");
        check_err!("0d6", InvalidDiceCount, "0d6");
        check_err!("2d0", InvalidFaceCount, "2d0");
        check_err!("2d6kh0", InvalidModifierCount, "kh0");
        check_err!("2d6kh3", ModifierExceedsCount, "kh3");
        check_err!("d10r10", InvalidRerollThreshold, "r10");
        check_err!("d10rr0", InvalidRerollThreshold, "rr0");
        check_err!("d1r", InvalidRerollThreshold, "r");
        check_err!("d1!", UnboundedExplosion, "d1!");
        check_err!("10/0", DivisionByZero, "/0");
        check_err!("10/2d6dh2", DivisionByZero, "/2d6dh2");
        check_err!("99999999999999999999", InvalidExpression, "99999999999999999999");
    }

    #[test]
    fn test_modifier_order_is_fixed() {
        check_err!("3d6!kh1", InvalidExpression, "kh1");
        check_err!("3d6r2!", InvalidExpression, "!");
    }

    #[test]
    fn test_division_by_nonzero_dice() {
        check(
            "10/2d6dh1",
            lit(10),
            vec![ArithmeticTerm::new(
                Operator::Div,
                dice(2, 6).with_selection(DropHighest, num(1)),
            )],
        );
    }

    #[test]
    fn test_dice_limit() {
        let limits = Limits::max_dice(10);
        assert!(Parser::new("5d6+5d6", limits).parse().is_ok());
        let err = Parser::new("5d6+6d6", limits).parse().unwrap_err();
        assert_eq!(err.kind, TooManyDice { max: 10 });
        assert_eq!(&err.slice, "6d6");
    }
}
