use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::value::{Payload, Value};

/// The extension seam between the machine and its host.
///
/// `Lang` is what makes the machine embeddable: the core threads states and
/// continuations, and everything payload-shaped is delegated here. Primitive
/// operations are dispatched by name and are not first-class; they exist only
/// inside `Op` terms and can never be passed around as values.
pub trait Lang<P: Payload> {
    /// Maps a raw literal payload into a value.
    fn literal(&self, payload: &P) -> Result<Value<P>, EvalError> {
        Ok(Value::Scalar(payload.clone()))
    }

    /// Applies the named primitive operation to already-evaluated operands.
    fn op(&self, name: &str, args: Vec<Value<P>>) -> Result<Value<P>, EvalError> {
        let _ = args;
        Err(EvalError::UnknownOp(name.to_string()))
    }
}

/// The reference payload: 64-bit integers and booleans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    Num(i64),
    Bool(bool),
}

impl Payload for Atom {
    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Num(_) => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Integer and boolean primitives over [`Atom`].
///
/// Anything that does not line up (an unknown name, a wrong arity, an
/// operand of the wrong type, a continuation where a scalar is needed)
/// fails `UnknownOp` rather than falling through to a neighboring case.
#[derive(Clone, Copy, Debug, Default)]
pub struct Arith;

impl Lang<Atom> for Arith {
    fn op(&self, name: &str, args: Vec<Value<Atom>>) -> Result<Value<Atom>, EvalError> {
        use Atom::{Bool, Num};

        let mismatch = || EvalError::UnknownOp(format!("{name} on {args:?}"));

        let scalars: Vec<Atom> = args
            .iter()
            .map(|arg| arg.scalar().copied().ok_or_else(mismatch))
            .collect::<Result<_, _>>()?;

        let result = match (name, scalars.as_slice()) {
            ("add", [Num(a), Num(b)]) => Num(a.wrapping_add(*b)),
            ("sub", [Num(a), Num(b)]) => Num(a.wrapping_sub(*b)),
            ("mul", [Num(a), Num(b)]) => Num(a.wrapping_mul(*b)),
            ("mod", [Num(a), Num(b)]) if *b != 0 => Num(a.rem_euclid(*b)),
            ("eq", [a, b]) => Bool(a == b),
            ("lt", [Num(a), Num(b)]) => Bool(a < b),
            ("and", [Bool(a), Bool(b)]) => Bool(*a && *b),
            ("not", [Bool(a)]) => Bool(!a),
            _ => return Err(mismatch()),
        };
        Ok(Value::Scalar(result))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eval::evaluate;
    use crate::term::Term;

    fn num(n: i64) -> Value<Atom> {
        Value::Scalar(Atom::Num(n))
    }

    fn boolean(b: bool) -> Value<Atom> {
        Value::Scalar(Atom::Bool(b))
    }

    #[test]
    fn arith_ops() {
        let lang = Arith;
        assert_eq!(Ok(num(3)), lang.op("add", vec![num(1), num(2)]));
        assert_eq!(Ok(num(-1)), lang.op("sub", vec![num(1), num(2)]));
        assert_eq!(Ok(num(42)), lang.op("mul", vec![num(6), num(7)]));
        assert_eq!(Ok(num(1)), lang.op("mod", vec![num(7), num(3)]));
        assert_eq!(Ok(boolean(true)), lang.op("eq", vec![num(7), num(7)]));
        assert_eq!(Ok(boolean(false)), lang.op("eq", vec![num(7), boolean(true)]));
        assert_eq!(Ok(boolean(true)), lang.op("lt", vec![num(3), num(7)]));
        assert_eq!(
            Ok(boolean(false)),
            lang.op("and", vec![boolean(true), boolean(false)])
        );
        assert_eq!(Ok(boolean(true)), lang.op("not", vec![boolean(false)]));
    }

    #[test]
    fn mismatches_are_unknown_ops() {
        let lang = Arith;
        for bad in [
            lang.op("frobnicate", vec![num(1)]),
            lang.op("add", vec![num(1)]),
            lang.op("add", vec![num(1), num(2), num(3)]),
            lang.op("add", vec![num(1), boolean(true)]),
            lang.op("lt", vec![boolean(true), boolean(false)]),
            lang.op("not", vec![num(1)]),
            lang.op("mod", vec![num(1), num(0)]),
        ] {
            assert!(matches!(bad, Err(EvalError::UnknownOp(_))), "{bad:?}");
        }
    }

    #[test]
    fn default_literal_is_a_scalar() {
        let lang = Arith;
        assert_eq!(Ok(num(5)), lang.literal(&Atom::Num(5)));
    }

    /// A host with a restricted literal set.
    #[derive(Clone, Copy, Debug)]
    struct Unsigned;

    impl Lang<Atom> for Unsigned {
        fn literal(&self, payload: &Atom) -> Result<Value<Atom>, EvalError> {
            match payload {
                Atom::Num(n) if *n < 0 => Err(EvalError::BadLiteral(format!("{payload:?}"))),
                _ => Ok(Value::Scalar(*payload)),
            }
        }
    }

    #[test]
    fn hosts_can_reject_literals() {
        let negative: Term<Atom> = Term::Literal(Atom::Num(-1));
        assert!(matches!(
            evaluate(negative, &Unsigned, 10),
            Err(EvalError::BadLiteral(_))
        ));

        let positive: Term<Atom> = Term::Literal(Atom::Num(1));
        assert_eq!(Ok(num(1)), evaluate(positive, &Unsigned, 10).map(|(v, _)| v));
    }
}
