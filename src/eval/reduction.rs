use tracing::trace;

use crate::cont::Continuation;
use crate::env::{Binding, Env};
use crate::error::EvalError;
use crate::eval::lang::Lang;
use crate::eval::{State, StepResult};
use crate::store::Store;
use crate::term::{Term, TOP_SYMBOL};
use crate::value::{Payload, Value};

/// Reduces a positive term to a value in the given context, without
/// producing a new state.
///
/// Loops because `Suspend` peels off of positive terms: suspending a term
/// that is already data is the identity, so `(! (! x))` reduces like `x`.
pub(super) fn eval_positive<P: Payload, L: Lang<P>>(
    term: &Term<P>,
    env: &Env<P>,
    store: &Store<P>,
    lang: &L,
) -> Result<Value<P>, EvalError> {
    let mut term = term;
    loop {
        match term {
            Term::Literal(payload) => return lang.literal(payload),
            Term::Symbol(name) if name == TOP_SYMBOL => {
                return Ok(Value::Kont(Continuation::Top))
            }
            Term::Symbol(name) => {
                return match env.lookup(name)? {
                    Binding::Addr(addr) => store.fetch(addr).cloned(),
                    // A definition closes over the environment in force now,
                    // so recursive definitions can reach themselves.
                    Binding::Def(def) => {
                        Ok(Value::Kont(Continuation::thunk(def.clone(), env.clone())))
                    }
                };
            }
            Term::Op(name, operands) => {
                let mut args = Vec::with_capacity(operands.len());
                for operand in operands {
                    args.push(eval_positive(operand, env, store, lang)?);
                }
                return lang.op(name, args);
            }
            Term::Suspend(inner) if inner.is_positive() => term = inner,
            Term::Suspend(inner) => {
                return Ok(Value::Kont(Continuation::thunk(
                    (**inner).clone(),
                    env.clone(),
                )))
            }
            negative => return Err(EvalError::InvalidPositive(format!("{negative:?}"))),
        }
    }
}

/// Delivers a value to the current continuation, looping until the machine
/// either makes progress (a new state) or halts (a terminal value).
pub(super) fn apply_continuation<P: Payload>(
    mut value: Value<P>,
    mut kont: Continuation<P>,
    mut store: Store<P>,
    mut meta: Vec<Continuation<P>>,
) -> Result<StepResult<P>, EvalError> {
    loop {
        match kont {
            Continuation::Top => match meta.pop() {
                None => {
                    trace!("halt: {value:?}");
                    return Ok(StepResult::Done(value));
                }
                Some(saved) => kont = saved,
            },
            // Throwing to a captured continuation: the frame's successor is
            // deferred to the meta-stack first, then the captured
            // continuation takes over with the first operand as its input.
            Continuation::Arg {
                values,
                continuation,
            } => {
                let captured = match value {
                    Value::Kont(captured) => captured,
                    other => {
                        return Err(EvalError::ExpectedContinuation(format!("{other:?}")))
                    }
                };
                let mut values = values.into_iter();
                let Some(first) = values.next() else {
                    return Err(EvalError::ArityOrContext(
                        "continuation applied to no arguments".to_string(),
                    ));
                };
                meta.push(*continuation);
                kont = captured;
                value = first;
            }
            Continuation::Let {
                names,
                body,
                saved_env,
                continuation,
            } => {
                let env = bind_names(names, value, saved_env, &mut store)?;
                return Ok(StepResult::More(State {
                    control: body,
                    env,
                    store,
                    kont: *continuation,
                    meta,
                }));
            }
        }
    }
}

/// Binds a delivered value under a `Let` frame's names.
///
/// No binders means the frame is a thunk or closure and the value is
/// dropped. Several binders destructure an argument frame that was itself
/// captured as a value.
fn bind_names<P: Payload>(
    names: Vec<String>,
    value: Value<P>,
    env: Env<P>,
    store: &mut Store<P>,
) -> Result<Env<P>, EvalError> {
    match names.as_slice() {
        [] => Ok(env),
        [name] => {
            let addr = store.alloc(value);
            Ok(env.bind(name.clone(), Binding::Addr(addr)))
        }
        _ => match value {
            Value::Kont(Continuation::Arg { values, .. }) if values.len() == names.len() => {
                let mut env = env;
                for (name, value) in names.iter().zip(values) {
                    let addr = store.alloc(value);
                    env = env.bind(name.clone(), Binding::Addr(addr));
                }
                Ok(env)
            }
            other => Err(EvalError::ArityOrContext(format!(
                "cannot bind {} names to {other:?}",
                names.len()
            ))),
        },
    }
}
