use std::fmt;

use crate::cont::Continuation;
use crate::env::Env;
use crate::term::Term;

/// Capability bound on host payloads.
///
/// The machine treats payloads as opaque except for the boolean view, which
/// the `If` rule needs in order to branch. A payload with no boolean reading
/// keeps the default and makes every `If` on it fail.
pub trait Payload: Clone + fmt::Debug + PartialEq {
    /// Boolean view of the payload, if it has one.
    fn as_bool(&self) -> Option<bool> {
        None
    }
}

/// A runtime value: either a host scalar or a reified continuation.
///
/// There is no separate closure variant. A closure is a `Kont` wrapping a
/// binderless `Let` frame, so thunks, closures and captured continuations all
/// share one representation and `Resume` treats any of them as a place to
/// jump.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<P> {
    Scalar(P),
    Kont(Continuation<P>),
}

impl<P> Value<P> {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_kont(&self) -> bool {
        matches!(self, Self::Kont(_))
    }

    pub fn scalar(&self) -> Option<&P> {
        match self {
            Self::Scalar(payload) => Some(payload),
            Self::Kont(_) => None,
        }
    }

    /// The closure view: the suspended body and its captured environment,
    /// when this value is a binderless `Let` frame.
    pub fn as_closure(&self) -> Option<(&Term<P>, &Env<P>)> {
        match self {
            Self::Kont(Continuation::Let {
                names,
                body,
                saved_env,
                ..
            }) if names.is_empty() => Some((body, saved_env)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    impl Payload for i64 {}

    #[test]
    fn closure_view() {
        let closure: Value<i64> =
            Value::Kont(Continuation::thunk(Term::symbol("x"), Env::new()));
        assert!(closure.as_closure().is_some());
        assert!(closure.is_kont());

        let top: Value<i64> = Value::Kont(Continuation::Top);
        assert!(top.as_closure().is_none());

        let scalar = Value::Scalar(5i64);
        assert!(scalar.as_closure().is_none());
        assert_eq!(Some(&5), scalar.scalar());
    }
}
