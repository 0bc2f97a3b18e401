use std::fmt;
use std::ops::Range;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::error::{FormulaError, UnrecognizedTokenError, source};

/// Hydrate/adduct separators. All of them are interchangeable; U+0387 is the
/// canonical equivalent of the middle dot and turns up in copied data.
pub const DOTS: [char; 4] = ['·', '\u{0387}', '•', '∙'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind<'de>,
    pub literal: &'de str,
    /// Byte offset of `literal` in the whole formula.
    pub offset: usize,
}

impl Token<'_> {
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.literal.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'de> {
    Atom { symbol: &'de str, count: f64 },
    LeftDelimiter { form: LeftForm, multiplier: f64 },
    RightDelimiter { count: f64 },
}

/// The shapes a left delimiter can take.
///
/// Declaration order is matching precedence: the lexer tries each form in
/// turn and keeps the first one that matches, so the most specific forms
/// come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeftForm {
    DotNumberBracket,
    NumberBracket,
    DotBracket,
    DotNumber,
    Dot,
    Number,
    Bracket,
}

impl LeftForm {
    pub const fn has_dot(self) -> bool {
        matches!(
            self,
            LeftForm::DotNumberBracket | LeftForm::DotBracket | LeftForm::DotNumber | LeftForm::Dot
        )
    }

    pub const fn has_number(self) -> bool {
        matches!(
            self,
            LeftForm::DotNumberBracket
                | LeftForm::NumberBracket
                | LeftForm::DotNumber
                | LeftForm::Number
        )
    }

    pub const fn opens_group(self) -> bool {
        matches!(
            self,
            LeftForm::DotNumberBracket
                | LeftForm::NumberBracket
                | LeftForm::DotBracket
                | LeftForm::Bracket
        )
    }

    /// Matches this form at the start of `rest`, returning the byte length of
    /// the whole delimiter and where its number sits, if it has one.
    fn match_at(self, rest: &str) -> Option<(usize, Option<Range<usize>>)> {
        let mut len = 0;
        if self.has_dot() {
            len += dot_len(rest)?;
        }

        let mut number = None;
        if self.has_number() {
            // a bare number must be a full decimal; next to a dot or bracket `2.` is accepted too
            let n = number_len(&rest[len..], self != LeftForm::Number)?;
            number = Some(len..len + n);
            len += n;
        }

        if self.opens_group() {
            len += bracket_len(&rest[len..], ['(', '['])?;
        }

        Some((len, number))
    }
}

fn dot_len(rest: &str) -> Option<usize> {
    rest.chars()
        .next()
        .filter(|c| DOTS.contains(c))
        .map(char::len_utf8)
}

fn bracket_len(rest: &str, brackets: [char; 2]) -> Option<usize> {
    rest.starts_with(brackets).then_some(1)
}

/// Length of the unsigned number at the start of `rest`: `\d+(\.\d+)?`, or
/// with `trailing_point` also `\d+\.`.
fn number_len(rest: &str, trailing_point: bool) -> Option<usize> {
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }

    let after = &rest[digits..];
    if !after.starts_with('.') {
        return Some(digits);
    }
    let fraction = after[1..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len() - 1);
    match fraction {
        0 if trailing_point => Some(digits + 1),
        0 => Some(digits),
        _ => Some(digits + 1 + fraction),
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::Atom { symbol, count } => {
                write!(f, "ATOM {lit} {symbol} {}", Number(count))
            }
            TokenKind::LeftDelimiter { form, multiplier } => {
                write!(f, "LEFT_DELIMITER {lit} {form} {}", Number(multiplier))
            }
            TokenKind::RightDelimiter { count } => {
                write!(f, "RIGHT_DELIMITER {lit} {}", Number(count))
            }
        }
    }
}

struct Number(f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n == n.trunc() {
            write!(f, "{n}.0")
        } else {
            write!(f, "{n}")
        }
    }
}

/// Splits a formula into atoms and delimiters.
///
/// Yields at most one error, after which the iterator is exhausted.
pub struct Lexer<'de> {
    name: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(name: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            name,
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    /// Tries the three token classes in priority order: atom, left
    /// delimiter, right delimiter.
    fn match_head(&self) -> Result<Option<(TokenKind<'de>, usize)>, FormulaError> {
        if let Some(len) = self.match_atom() {
            let literal = &self.rest[..len];
            let symbol_len = literal
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(literal.len());
            let count = self.number_or_one(&literal[symbol_len..], symbol_len)?;
            let kind = TokenKind::Atom {
                symbol: &literal[..symbol_len],
                count,
            };
            return Ok(Some((kind, len)));
        }

        for form in LeftForm::iter() {
            let Some((len, number)) = form.match_at(self.rest) else {
                continue;
            };
            let multiplier = match number {
                Some(range) => self.number_or_one(&self.rest[range.clone()], range.start)?,
                None => 1.0,
            };
            return Ok(Some((TokenKind::LeftDelimiter { form, multiplier }, len)));
        }

        if bracket_len(self.rest, [')', ']']).is_some() {
            let tail = number_len(&self.rest[1..], false).unwrap_or(0);
            let count = self.number_or_one(&self.rest[1..1 + tail], 1)?;
            return Ok(Some((TokenKind::RightDelimiter { count }, 1 + tail)));
        }

        Ok(None)
    }

    /// `[A-Z][a-z]?` followed by an optional number.
    fn match_atom(&self) -> Option<usize> {
        let bytes = self.rest.as_bytes();
        if !bytes.first()?.is_ascii_uppercase() {
            return None;
        }
        let symbol = if bytes.get(1).is_some_and(u8::is_ascii_lowercase) {
            2
        } else {
            1
        };
        Some(symbol + number_len(&self.rest[symbol..], false).unwrap_or(0))
    }

    /// Parses `literal`, found `at` bytes into the unconsumed input, or
    /// returns 1.0 for an empty literal. Numbers too large for `f64` are
    /// rejected.
    fn number_or_one(&self, literal: &str, at: usize) -> Result<f64, FormulaError> {
        if literal.is_empty() {
            return Ok(1.0);
        }
        literal
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.unrecognized(at, literal.len()))
    }

    /// An error for the `len` bytes found `at` bytes into the unconsumed
    /// input, or for the single character there when `len` is 0.
    fn unrecognized(&self, at: usize, len: usize) -> FormulaError {
        let head = &self.rest[at..];
        let token = head.chars().next().unwrap_or_default();
        let len = if len == 0 { token.len_utf8() } else { len };
        UnrecognizedTokenError {
            src: source(self.name, self.whole),
            bad_bit: (self.byte + at..self.byte + at + len).into(),
            token,
            head: head.to_string(),
        }
        .into()
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, FormulaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (kind, len) = match self.match_head() {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                let e = self.unrecognized(0, 0);
                self.rest = "";
                return Some(Err(e));
            }
            Err(e) => {
                self.rest = "";
                return Some(Err(e));
            }
        };

        let token = Token {
            kind,
            literal: &self.rest[..len],
            offset: self.byte,
        };
        self.rest = &self.rest[len..];
        self.byte += len;
        Some(Ok(token))
    }
}
