//! The surface reader.
//!
//! Programs arrive as s-expressions and read into [`Term`] trees over the
//! reference [`Atom`](crate::eval::lang::Atom) payload. The reader rejects
//! binder positions that are not symbols, so the machine never sees them.

use anyhow::{bail, Result};
use nom::sequence::preceded;
use nom::Parser;

use crate::eval::lang::Atom;
use crate::term::Term;

use self::error::ParseError;

pub mod error;
pub mod syntax;

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;
pub type ParseResult<'a, T> = nom::IResult<Span<'a>, T, ParseError<Span<'a>>>;

/// Reads one term from `input`. Trailing input after the term is ignored.
pub fn read(input: &str) -> Result<Term<Atom>> {
    match preceded(syntax::parse_space, syntax::parse_term).parse(Span::new(input)) {
        Ok((_, term)) => Ok(term),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => bail!("{}", e),
        Err(nom::Err::Incomplete(_)) => bail!("incomplete input"),
    }
}
