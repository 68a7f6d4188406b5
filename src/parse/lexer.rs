use crate::common::*;
use logos::{Lexer as LogosLexer, Logos};
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub type Lexer<'a> = PeekableLexer<'a, LogosLexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    // Scanned as one token so `3d6` wins over `3` followed by garbage.
    #[regex(r"[0-9]*d[0-9]+")]
    Dice,

    #[token("kh")]
    KeepHighest,
    #[token("kl")]
    KeepLowest,
    #[token("dh")]
    DropHighest,
    #[token("dl")]
    DropLowest,

    #[token("!")]
    Explode,

    #[token("r")]
    RerollOnce,
    #[token("rr")]
    RerollRecursive,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Dice => "<dice>",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            DropHighest => "'dh'",
            DropLowest => "'dl'",
            Explode => "'!'",
            RerollOnce => "'r'",
            RerollRecursive => "'rr'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Error => "<error>",
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        use Operator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }

    pub fn as_keep_drop(&self) -> Option<KeepDrop> {
        use KeepDrop::*;
        Some(match self {
            Self::KeepHighest => KeepHighest,
            Self::KeepLowest => KeepLowest,
            Self::DropHighest => DropHighest,
            Self::DropLowest => DropLowest,
            _ => return None,
        })
    }

    pub fn as_reroll(&self) -> Option<RerollKind> {
        Some(match self {
            Self::RerollOnce => RerollKind::Once,
            Self::RerollRecursive => RerollKind::Recursive,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn tokens(s: &str) -> Vec<(TokenKind, &str)> {
        let mut lex = TokenKind::lexer(s);
        let mut out = Vec::new();
        while let Some(tok) = lex.next() {
            out.push((tok, lex.slice()));
        }
        out
    }

    #[test]
    fn test_lex_dice_before_integer() {
        assert_eq!(tokens("3d6+2"), vec![(Dice, "3d6"), (Plus, "+"), (Integer, "2")]);
        assert_eq!(tokens("d20"), vec![(Dice, "d20")]);
        assert_eq!(tokens("12"), vec![(Integer, "12")]);
    }

    #[test]
    fn test_lex_modifiers() {
        assert_eq!(
            tokens("4d6dh1!rr2"),
            vec![
                (Dice, "4d6"),
                (DropHighest, "dh"),
                (Integer, "1"),
                (Explode, "!"),
                (RerollRecursive, "rr"),
                (Integer, "2"),
            ]
        );
        assert_eq!(
            tokens("2d10r kl"),
            vec![(Dice, "2d10"), (RerollOnce, "r"), (KeepLowest, "kl")]
        );
    }

    #[test]
    fn test_lex_skips_whitespace() {
        assert_eq!(
            tokens(" 1d4 *\t3 "),
            vec![(Dice, "1d4"), (Star, "*"), (Integer, "3")]
        );
    }

    #[test]
    fn test_lex_error() {
        assert_eq!(tokens("x").first().map(|t| t.0), Some(Error));
    }
}
