use std::{cmp::Ordering, fmt, num::ParseIntError};

use nom::{error::ErrorKind, AsBytes, Err, IResult, InputLength};

use crate::parser::Span;

#[derive(PartialEq, Debug, Clone)]
pub enum ParseErrorKind {
    ParseIntErr(ParseIntError),
    NonSymbolBinder(String),
    EmptyForm,
    Nom(ErrorKind),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseIntErr(e) => write!(f, "Error parsing number: {e}"),
            Self::NonSymbolBinder(got) => {
                write!(f, "Binder must be a symbol, got `{got}`")
            }
            Self::EmptyForm => write!(f, "Empty form `()` has no meaning"),
            e => write!(f, "internal parser error {e:?}"),
        }
    }
}

impl ParseErrorKind {
    pub fn is_nom_err(&self) -> bool {
        matches!(self, Self::Nom(_))
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ParseError<I: AsBytes> {
    pub input: I,
    pub expected: Option<&'static str>,
    pub errors: Vec<ParseErrorKind>,
}

impl<I: AsBytes> ParseError<I> {
    pub fn new(input: I, error: ParseErrorKind) -> Self {
        ParseError {
            input,
            expected: None,
            errors: vec![error],
        }
    }

    pub fn throw<A>(input: I, e: ParseErrorKind) -> IResult<I, A, Self> {
        Err(Err::Error(ParseError::new(input, e)))
    }
}

impl fmt::Display for ParseError<Span<'_>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "at line {}:{}",
            self.input.location_line(),
            self.input.get_column()
        )?;
        let line = String::from_utf8_lossy(self.input.get_line_beginning());
        writeln!(f, "{} | {}", self.input.location_line(), line)?;

        let cols = format!("{} | ", self.input.location_line()).len() + self.input.get_column();
        for _ in 0..(cols - 1) {
            write!(f, " ")?;
        }
        writeln!(f, "^")?;

        if let Some(exp) = self.expected {
            writeln!(f, "Expected {exp}")?;
        }

        let mut errs = self.errors.iter().filter(|x| !x.is_nom_err()).peekable();
        match errs.peek() {
            None => writeln!(f, "Internal parser error")?,
            Some(_) => {
                writeln!(f, "Reported errors:")?;
                for kind in errs {
                    writeln!(f, "- {kind}")?;
                }
            }
        }
        Ok(())
    }
}

impl<I: AsBytes> nom::error::ParseError<I> for ParseError<I>
where
    I: InputLength,
    I: Clone,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        ParseError::new(input, ParseErrorKind::Nom(kind))
    }

    fn append(input: I, kind: ErrorKind, mut other: Self) -> Self {
        match input.input_len().cmp(&other.input.input_len()) {
            Ordering::Less => ParseError::new(input, ParseErrorKind::Nom(kind)),
            Ordering::Equal => {
                other.errors.push(ParseErrorKind::Nom(kind));
                other
            }
            Ordering::Greater => other,
        }
    }

    fn or(self, mut other: Self) -> Self {
        match self.input.input_len().cmp(&other.input.input_len()) {
            Ordering::Less => self,
            Ordering::Equal => {
                for x in self.errors {
                    other.errors.push(x);
                }
                other
            }
            Ordering::Greater => other,
        }
    }
}

impl<I: AsBytes> nom::error::ContextError<I> for ParseError<I>
where
    I: InputLength,
    I: Clone,
{
    fn add_context(input: I, ctx: &'static str, other: Self) -> Self {
        match input.input_len().cmp(&other.input.input_len()) {
            Ordering::Less => ParseError {
                input,
                expected: Some(ctx),
                errors: vec![],
            },
            Ordering::Equal => match other.expected {
                None => ParseError {
                    input,
                    expected: Some(ctx),
                    errors: other.errors,
                },
                _ => other,
            },
            Ordering::Greater => other,
        }
    }
}
