//! Lexer and parser for dice notation.
//!
//! Grammar, case-insensitive on the `d` separator and tolerant of whitespace
//! between tokens:
//!
//! ```text
//! expression := [count] "d" sides [("+" | "-") modifier]
//! ```

use logos::Logos;

use super::DiceExpression;
use crate::error::{MechError, MechResult};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f\x0B]+")]
enum Token {
    #[regex("[0-9]+")]
    Number,

    #[regex("[dD]")]
    Separator,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Separator => write!(f, "'d'"),
            Self::Plus => write!(f, "'+'"),
            Self::Minus => write!(f, "'-'"),
        }
    }
}

/// Lex `input` into tokens paired with their source text.
fn lex(input: &str) -> MechResult<Vec<(Token, &str)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.slice())),
            Err(()) => {
                return Err(MechError::malformed(
                    input,
                    format!(
                        "unexpected character {:?} at offset {}",
                        lexer.slice(),
                        lexer.span().start
                    ),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Parse dice notation such as `"d20"`, `"2d6+3"` or `" 3 D 4 - 1 "`.
///
/// The count defaults to 1 and the modifier to 0. Zero dice, more than
/// [`MAX_DICE`](super::MAX_DICE) dice, zero sides, doubled signs, trailing
/// input and out-of-range numbers are all [`MechError::MalformedExpression`].
pub fn parse(input: &str) -> MechResult<DiceExpression> {
    let tokens = lex(input)?;
    let mut tokens = tokens.into_iter().peekable();

    let count = match tokens.peek() {
        Some(&(Token::Number, text)) => {
            tokens.next();
            number::<u32>(input, text, "dice count")?
        }
        _ => 1,
    };

    match tokens.next() {
        Some((Token::Separator, _)) => {}
        Some((other, _)) => {
            return Err(MechError::malformed(input, format!("expected 'd', found {other}")));
        }
        None => return Err(MechError::malformed(input, "missing 'd' separator")),
    }

    let sides = match tokens.next() {
        Some((Token::Number, text)) => number::<u32>(input, text, "die sides")?,
        Some((other, _)) => {
            return Err(MechError::malformed(
                input,
                format!("expected number of sides, found {other}"),
            ));
        }
        None => return Err(MechError::malformed(input, "missing number of sides")),
    };

    let modifier = match tokens.next() {
        None => 0,
        Some((sign @ (Token::Plus | Token::Minus), _)) => {
            let magnitude = match tokens.next() {
                Some((Token::Number, text)) => number::<i64>(input, text, "modifier")?,
                Some((other, _)) => {
                    return Err(MechError::malformed(
                        input,
                        format!("expected modifier after {sign}, found {other}"),
                    ));
                }
                None => {
                    return Err(MechError::malformed(
                        input,
                        format!("missing modifier after {sign}"),
                    ));
                }
            };
            let signed = if sign == Token::Minus {
                -magnitude
            } else {
                magnitude
            };
            i32::try_from(signed)
                .map_err(|_| MechError::malformed(input, "modifier out of range"))?
        }
        Some((other, _)) => {
            return Err(MechError::malformed(
                input,
                format!("unexpected {other} after sides"),
            ));
        }
    };

    if let Some((other, _)) = tokens.next() {
        return Err(MechError::malformed(input, format!("trailing {other}")));
    }

    DiceExpression::new(count, sides, modifier)
        .map_err(|e| match e {
            MechError::MalformedExpression { reason, .. } => MechError::malformed(input, reason),
            other => other,
        })
}

fn number<T: std::str::FromStr>(input: &str, text: &str, what: &str) -> MechResult<T> {
    text.parse::<T>()
        .map_err(|_| MechError::malformed(input, format!("{what} {text} is out of range")))
}
