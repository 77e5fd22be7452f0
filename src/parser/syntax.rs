use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, multispace0},
    combinator::verify,
    error::context,
    multi::many0,
    sequence::{preceded, terminated},
};

use crate::eval::lang::Atom;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::{ParseResult, Span};
use crate::term::Term;

/// The reserved prefix that routes an application head to the primitive-op
/// layer instead of ordinary application.
pub const OP_PREFIX: &str = "op:";

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | ';')
}

pub fn parse_line_comment(i: Span<'_>) -> ParseResult<'_, Span<'_>> {
    let (i, _) = char(';')(i)?;
    take_till(|c| c == '\n')(i)
}

pub fn parse_space(i: Span<'_>) -> ParseResult<'_, Vec<Span<'_>>> {
    let (i, _) = multispace0(i)?;
    many0(terminated(parse_line_comment, multispace0))(i)
}

pub fn parse_symbol_name(i: Span<'_>) -> ParseResult<'_, String> {
    let (i, s) = verify(take_till(|c| !is_symbol_char(c)), |s: &Span<'_>| {
        !s.fragment().is_empty() && !s.fragment().starts_with(|c: char| c.is_ascii_digit())
    })(i)?;
    Ok((i, s.to_string()))
}

// Numbers and `true`/`false` read as literals; everything else is a name.
fn atom_term(name: &str) -> Term<Atom> {
    if let Ok(n) = name.parse::<i64>() {
        return Term::Literal(Atom::Num(n));
    }
    match name {
        "true" => Term::Literal(Atom::Bool(true)),
        "false" => Term::Literal(Atom::Bool(false)),
        _ => Term::symbol(name),
    }
}

/// One maximal run of symbol characters, classified after tokenizing: a run
/// that reads as a signed decimal is a number, a run beginning with a
/// non-digit is a name, and a digit-leading run that is not a number
/// (`5x`, an out-of-range decimal) is an error rather than a truncated
/// token.
pub fn parse_atom(from: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, token) = verify(take_till(|c| !is_symbol_char(c)), |s: &Span<'_>| {
        !s.fragment().is_empty()
    })(from)?;
    let text = *token.fragment();
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return match text.parse::<i64>() {
            Ok(n) => Ok((i, Term::Literal(Atom::Num(n)))),
            Err(e) => ParseError::throw(from, ParseErrorKind::ParseIntErr(e)),
        };
    }
    Ok((i, atom_term(text)))
}

pub fn parse_term(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    alt((parse_list, parse_atom))(i)
}

/// The first run of symbol characters at `i`, for error reporting.
fn offending(i: Span<'_>) -> String {
    let token: String = i
        .fragment()
        .chars()
        .take_while(|c| is_symbol_char(*c))
        .take(24)
        .collect();
    if token.is_empty() {
        i.fragment().chars().take(1).collect()
    } else {
        token
    }
}

/// A name in binding position. Anything that is not a symbol is rejected
/// here rather than at evaluation time.
fn parse_binder(from: Span<'_>) -> ParseResult<'_, String> {
    let (i, _) = parse_space(from)?;
    match parse_symbol_name(i) {
        Ok(ok) => Ok(ok),
        Err(_) => ParseError::throw(i, ParseErrorKind::NonSymbolBinder(offending(i))),
    }
}

fn parse_close(i: Span<'_>) -> ParseResult<'_, ()> {
    let (i, _) = parse_space(i)?;
    let (i, _) = char(')')(i)?;
    Ok((i, ()))
}

fn parse_operands(i: Span<'_>) -> ParseResult<'_, Vec<Term<Atom>>> {
    let (i, operands) = many0(preceded(parse_space, parse_term))(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, operands))
}

fn parse_unary(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, inner) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, inner))
}

fn parse_params(i: Span<'_>) -> ParseResult<'_, Vec<String>> {
    let (i, _) = parse_space(i)?;
    let (i, _) = char('(')(i)?;
    let (i, params) = many0(preceded(parse_space, parse_symbol_name))(i)?;
    let (i, _) = parse_space(i)?;
    match char::<_, ParseError<Span<'_>>>(')')(i) {
        Ok((i, _)) => Ok((i, params)),
        Err(_) => ParseError::throw(i, ParseErrorKind::NonSymbolBinder(offending(i))),
    }
}

fn parse_abstract(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, params) = parse_params(i)?;
    let (i, body) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, Term::lambda(params, body)))
}

fn parse_let(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, name) = parse_binder(i)?;
    let (i, bound) = preceded(parse_space, parse_term)(i)?;
    let (i, body) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, Term::let_(name, bound, body)))
}

fn parse_letrec_binding(i: Span<'_>) -> ParseResult<'_, (String, Term<Atom>)> {
    let (i, _) = char('(')(i)?;
    let (i, name) = parse_binder(i)?;
    let (i, def) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, (name, def)))
}

fn parse_letrec(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, _) = parse_space(i)?;
    let (i, _) = char('(')(i)?;
    let (i, bindings) = many0(preceded(parse_space, parse_letrec_binding))(i)?;
    let (i, _) = parse_close(i)?;
    let (i, body) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, Term::letrec(bindings, body)))
}

fn parse_shift(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, name) = parse_binder(i)?;
    let (i, body) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, Term::shift(name, body)))
}

fn parse_if(i: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, condition) = preceded(parse_space, parse_term)(i)?;
    let (i, consequent) = preceded(parse_space, parse_term)(i)?;
    let (i, alternative) = preceded(parse_space, parse_term)(i)?;
    let (i, _) = parse_close(i)?;
    Ok((i, Term::if_(condition, consequent, alternative)))
}

fn parse_form(i: Span<'_>, head: String) -> ParseResult<'_, Term<Atom>> {
    match head.as_str() {
        "λ" | "lambda" => context("function form: (λ (x …) body)", parse_abstract)(i),
        "let" => context("let form: (let x e b)", parse_let)(i),
        "letrec" => context("letrec form: (letrec ((x e) …) b)", parse_letrec)(i),
        "reset" => {
            let (i, body) = context("reset form: (reset e)", parse_unary)(i)?;
            Ok((i, Term::reset(body)))
        }
        "shift" => context("shift form: (shift k e)", parse_shift)(i),
        "if" => context("if form: (if c t e)", parse_if)(i),
        "!" => {
            let (i, inner) = context("suspend form: (! e)", parse_unary)(i)?;
            Ok((i, Term::suspend(inner)))
        }
        "?" => {
            let (i, inner) = context("resume form: (? e)", parse_unary)(i)?;
            Ok((i, Term::resume(inner)))
        }
        name if name.starts_with(OP_PREFIX) => {
            let op = name[OP_PREFIX.len()..].to_string();
            let (i, operands) = parse_operands(i)?;
            Ok((i, Term::Op(op, operands)))
        }
        name => {
            let (i, operands) = parse_operands(i)?;
            Ok((i, Term::apply(atom_term(name), operands)))
        }
    }
}

pub fn parse_list(from: Span<'_>) -> ParseResult<'_, Term<Atom>> {
    let (i, _) = char('(')(from)?;
    let (i, _) = parse_space(i)?;
    if i.fragment().starts_with(')') {
        return ParseError::throw(i, ParseErrorKind::EmptyForm);
    }
    match parse_symbol_name(i) {
        Ok((i, head)) => parse_form(i, head),
        // Compound or literal head, e.g. ((? f) x): plain application.
        Err(_) => {
            let (i, operator) = parse_term(i)?;
            let (i, operands) = parse_operands(i)?;
            Ok((i, Term::apply(operator, operands)))
        }
    }
}
