use std::fmt;

use serde::{Deserialize, Serialize};

/// The distinguished symbol that resolves to the top continuation instead of
/// going through the environment. Useful as a "discard" continuation when
/// throwing to a captured one.
pub const TOP_SYMBOL: &str = "_";

/// A term of the intermediate language.
///
/// Terms are partitioned into two polarities. Positive terms
/// (`Literal`, `Symbol`, `Op`, `Suspend`) are data-like and reduce to a value
/// without consuming a machine step; every other variant is negative and
/// requires a step to evaluate. `is_positive` is the predicate for the split.
///
/// The payload type `P` of literals is opaque to the machine; only the host's
/// `literal` and `op` hooks ever inspect it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Term<P> {
    /// A host-defined scalar payload.
    Literal(P),
    /// A name, resolved in the environment.
    Symbol(String),
    /// A primitive operation applied to operand terms.
    Op(String, Vec<Term<P>>),
    /// Freezes a term (possibly negative) into a value: `(! t)`.
    Suspend(Box<Term<P>>),
    /// Unfreezes a suspended term, making it the current control: `(? t)`.
    Resume(Box<Term<P>>),
    /// A function of zero or more parameters.
    Abstract(Vec<String>, Box<Term<P>>),
    /// Application of an operator term to operand terms.
    Apply(Box<Term<P>>, Vec<Term<P>>),
    /// `(let x e b)`: evaluate `e`, bind it to `x`, continue with `b`.
    Let(String, Box<Term<P>>, Box<Term<P>>),
    /// Mutually recursive local definitions.
    Letrec(Vec<(String, Term<P>)>, Box<Term<P>>),
    /// Installs a delimiter for `Shift`.
    Reset(Box<Term<P>>),
    /// Captures the continuation up to the nearest enclosing `Reset`.
    Shift(String, Box<Term<P>>),
    /// Two-way branch on a boolean scalar.
    If(Box<Term<P>>, Box<Term<P>>, Box<Term<P>>),
}

impl<P> Term<P> {
    /// True exactly for the data-like variants that reduce without a step.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Self::Literal(_) | Self::Symbol(_) | Self::Op(..) | Self::Suspend(_)
        )
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn op(name: impl Into<String>, operands: Vec<Term<P>>) -> Self {
        Self::Op(name.into(), operands)
    }

    pub fn suspend(inner: Term<P>) -> Self {
        Self::Suspend(Box::new(inner))
    }

    pub fn resume(inner: Term<P>) -> Self {
        Self::Resume(Box::new(inner))
    }

    pub fn lambda(params: Vec<String>, body: Term<P>) -> Self {
        Self::Abstract(params, Box::new(body))
    }

    pub fn apply(operator: Term<P>, operands: Vec<Term<P>>) -> Self {
        Self::Apply(Box::new(operator), operands)
    }

    pub fn let_(name: impl Into<String>, bound: Term<P>, body: Term<P>) -> Self {
        Self::Let(name.into(), Box::new(bound), Box::new(body))
    }

    pub fn letrec(bindings: Vec<(String, Term<P>)>, body: Term<P>) -> Self {
        Self::Letrec(bindings, Box::new(body))
    }

    pub fn reset(body: Term<P>) -> Self {
        Self::Reset(Box::new(body))
    }

    pub fn shift(name: impl Into<String>, body: Term<P>) -> Self {
        Self::Shift(name.into(), Box::new(body))
    }

    pub fn if_(condition: Term<P>, consequent: Term<P>, alternative: Term<P>) -> Self {
        Self::If(
            Box::new(condition),
            Box::new(consequent),
            Box::new(alternative),
        )
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    write!(f, "(")?;
    let mut iter = names.iter().peekable();
    while let Some(name) = iter.next() {
        match iter.peek() {
            Some(_) => write!(f, "{name} ")?,
            None => write!(f, "{name}")?,
        }
    }
    write!(f, ")")
}

fn write_terms<P: fmt::Display>(f: &mut fmt::Formatter<'_>, terms: &[Term<P>]) -> fmt::Result {
    for term in terms {
        write!(f, " {term}")?;
    }
    Ok(())
}

impl<P: fmt::Display> fmt::Display for Term<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(payload) => write!(f, "{payload}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Op(name, operands) => {
                write!(f, "(op:{name}")?;
                write_terms(f, operands)?;
                write!(f, ")")
            }
            Self::Suspend(inner) => write!(f, "(! {inner})"),
            Self::Resume(inner) => write!(f, "(? {inner})"),
            Self::Abstract(params, body) => {
                write!(f, "(λ ")?;
                write_names(f, params)?;
                write!(f, " {body})")
            }
            Self::Apply(operator, operands) => {
                write!(f, "({operator}")?;
                write_terms(f, operands)?;
                write!(f, ")")
            }
            Self::Let(name, bound, body) => write!(f, "(let {name} {bound} {body})"),
            Self::Letrec(bindings, body) => {
                write!(f, "(letrec (")?;
                let mut iter = bindings.iter().peekable();
                while let Some((name, def)) = iter.next() {
                    match iter.peek() {
                        Some(_) => write!(f, "({name} {def}) ")?,
                        None => write!(f, "({name} {def})")?,
                    }
                }
                write!(f, ") {body})")
            }
            Self::Reset(body) => write!(f, "(reset {body})"),
            Self::Shift(name, body) => write!(f, "(shift {name} {body})"),
            Self::If(condition, consequent, alternative) => {
                write!(f, "(if {condition} {consequent} {alternative})")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn positivity_is_total_over_the_variants() {
        let positive: Vec<Term<i64>> = vec![
            Term::Literal(1),
            Term::symbol("x"),
            Term::op("add", vec![]),
            Term::suspend(Term::symbol("x")),
            Term::suspend(Term::reset(Term::Literal(1))),
        ];
        let negative: Vec<Term<i64>> = vec![
            Term::resume(Term::symbol("x")),
            Term::lambda(vec!["x".into()], Term::symbol("x")),
            Term::apply(Term::symbol("f"), vec![]),
            Term::let_("x", Term::Literal(1), Term::symbol("x")),
            Term::letrec(vec![], Term::Literal(1)),
            Term::reset(Term::Literal(1)),
            Term::shift("k", Term::symbol("k")),
            Term::if_(Term::Literal(1), Term::Literal(2), Term::Literal(3)),
        ];

        assert!(positive.iter().all(Term::is_positive));
        assert!(!negative.iter().any(Term::is_positive));
    }

    #[test]
    fn terms_interchange_as_tagged_json() {
        let term: Term<i64> = Term::let_(
            "x",
            Term::Literal(1),
            Term::op("add", vec![Term::symbol("x"), Term::symbol("x")]),
        );
        let json = serde_json::to_string(&term).unwrap();
        assert_eq!(
            r#"{"Let":["x",{"Literal":1},{"Op":["add",[{"Symbol":"x"},{"Symbol":"x"}]]}]}"#,
            json
        );
        assert_eq!(term, serde_json::from_str(&json).unwrap());
    }

    #[test]
    fn print_term() {
        let term: Term<i64> = Term::let_(
            "n",
            Term::op("add", vec![Term::Literal(1), Term::Literal(2)]),
            Term::op("mul", vec![Term::symbol("n"), Term::Literal(2)]),
        );
        assert_eq!("(let n (op:add 1 2) (op:mul n 2))", term.to_string());

        let term: Term<i64> = Term::apply(
            Term::resume(Term::symbol("f")),
            vec![Term::symbol("x"), Term::suspend(Term::symbol("y"))],
        );
        assert_eq!("((? f) x (! y))", term.to_string());

        let term: Term<i64> = Term::lambda(
            vec!["a".into(), "b".into()],
            Term::if_(Term::symbol("a"), Term::symbol("b"), Term::symbol("_")),
        );
        assert_eq!("(λ (a b) (if a b _))", term.to_string());
    }
}
