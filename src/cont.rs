use crate::env::Env;
use crate::term::Term;
use crate::value::Value;

/// The work remaining to be done, as a first-class value.
#[derive(Clone, Debug, PartialEq)]
pub enum Continuation<P> {
    /// Bottom of the stack. Delivering a value here halts the machine once
    /// the meta-stack is empty.
    Top,
    /// Frame pushed by `Apply`, consumed by `Abstract` or by throwing to a
    /// captured continuation.
    Arg {
        values: Vec<Value<P>>,
        continuation: Box<Continuation<P>>,
    },
    /// Frame pushed by `Let`, consumed once the bound term has a value.
    ///
    /// With no binders this frame doubles as the representation of thunks and
    /// closures: the delivered value is dropped and control jumps into `body`
    /// under `saved_env`.
    Let {
        names: Vec<String>,
        body: Term<P>,
        saved_env: Env<P>,
        continuation: Box<Continuation<P>>,
    },
}

impl<P> Continuation<P> {
    pub fn is_top(&self) -> bool {
        matches!(self, Self::Top)
    }

    /// Packages a term with the environment in force into a jumpable frame.
    pub fn thunk(body: Term<P>, saved_env: Env<P>) -> Self {
        Self::Let {
            names: Vec::new(),
            body,
            saved_env,
            continuation: Box::new(Self::Top),
        }
    }
}
