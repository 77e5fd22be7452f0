//! The abstract machine.
//!
//! Evaluation is a sequence of small steps over a [`State`]. Data-like
//! (positive) control terms reduce to values inside a step and are handed to
//! the current continuation; computational (negative) terms each make one
//! transition. `Apply`, `Let` and `Letrec` are purely structural: they fold
//! into the continuation or the environment and the step keeps going, so a
//! yielded state always sits at an observable boundary.

use tracing::{debug, trace};

use crate::cont::Continuation;
use crate::env::{Binding, Env};
use crate::error::EvalError;
use crate::store::Store;
use crate::term::Term;
use crate::value::{Payload, Value};

use self::lang::Lang;
use self::reduction::{apply_continuation, eval_positive};

pub mod lang;
mod reduction;

/// A machine state: the control term, the environment and store it runs in,
/// the current continuation, and the stack of continuations saved by
/// `Reset`.
#[derive(Clone, Debug, PartialEq)]
pub struct State<P> {
    pub control: Term<P>,
    pub env: Env<P>,
    pub store: Store<P>,
    pub kont: Continuation<P>,
    pub meta: Vec<Continuation<P>>,
}

/// The outcome of one step: either the machine can keep going, or it halted
/// with a value.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum StepResult<P> {
    More(State<P>),
    Done(Value<P>),
}

impl<P> StepResult<P> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Builds the initial state for a program: empty environment, empty store,
/// top continuation, empty meta-stack.
pub fn inject<P: Clone>(term: Term<P>) -> State<P> {
    State {
        control: term,
        env: Env::new(),
        store: Store::new(),
        kont: Continuation::Top,
        meta: Vec::new(),
    }
}

/// Advances the machine by one small step.
pub fn step<P: Payload, L: Lang<P>>(
    state: State<P>,
    lang: &L,
) -> Result<StepResult<P>, EvalError> {
    let State {
        mut control,
        mut env,
        mut store,
        mut kont,
        mut meta,
    } = state;

    loop {
        trace!("control: {control:?}");

        if control.is_positive() {
            let value = eval_positive(&control, &env, &store, lang)?;
            return apply_continuation(value, kont, store, meta);
        }

        match control {
            // Structural: operands reduce left to right into an argument
            // frame and the operator becomes the control.
            Term::Apply(operator, operands) => {
                let mut values = Vec::with_capacity(operands.len());
                for operand in &operands {
                    values.push(eval_positive(operand, &env, &store, lang)?);
                }
                control = *operator;
                kont = Continuation::Arg {
                    values,
                    continuation: Box::new(kont),
                };
            }
            // Structural: the bound term becomes the control under a frame
            // that remembers the body and the environment to finish in.
            Term::Let(name, bound, body) => {
                kont = Continuation::Let {
                    names: vec![name],
                    body: *body,
                    saved_env: env.clone(),
                    continuation: Box::new(kont),
                };
                control = *bound;
            }
            // Structural: names bind to their definition terms, not to
            // addresses. Each lookup re-closes the definition over the
            // then-current environment.
            Term::Letrec(bindings, body) => {
                for (name, def) in bindings {
                    env = env.bind(name, Binding::Def(def));
                }
                control = *body;
            }
            Term::Shift(name, body) => {
                let addr = store.alloc(Value::Kont(kont));
                let env = env.bind(name, Binding::Addr(addr));
                return Ok(StepResult::More(State {
                    control: *body,
                    env,
                    store,
                    kont: Continuation::Top,
                    meta,
                }));
            }
            Term::Reset(body) => {
                meta.push(kont);
                return Ok(StepResult::More(State {
                    control: *body,
                    env,
                    store,
                    kont: Continuation::Top,
                    meta,
                }));
            }
            Term::If(condition, consequent, alternative) => {
                let value = eval_positive(&condition, &env, &store, lang)?;
                let branch = match &value {
                    Value::Scalar(payload) => payload.as_bool(),
                    Value::Kont(_) => None,
                };
                let Some(branch) = branch else {
                    return Err(EvalError::IfRequiresBool(format!("{value:?}")));
                };
                return Ok(StepResult::More(State {
                    control: if branch { *consequent } else { *alternative },
                    env,
                    store,
                    kont,
                    meta,
                }));
            }
            Term::Resume(inner) => {
                let value = eval_positive(&inner, &env, &store, lang)?;
                match value {
                    // A closure: jump into its body under its captured
                    // environment, keeping the current continuation.
                    Value::Kont(Continuation::Let {
                        names,
                        body,
                        saved_env,
                        ..
                    }) if names.is_empty() => {
                        return Ok(StepResult::More(State {
                            control: body,
                            env: saved_env,
                            store,
                            kont,
                            meta,
                        }));
                    }
                    // Anything else is handed to the current continuation as
                    // is, so resuming a scalar delivers the scalar.
                    other => return apply_continuation(other, kont, store, meta),
                }
            }
            Term::Abstract(params, body) => {
                let Continuation::Arg {
                    values,
                    continuation,
                } = kont
                else {
                    return Err(EvalError::ArityOrContext(
                        "function entered without an argument frame".to_string(),
                    ));
                };
                debug_assert_eq!(
                    params.len(),
                    values.len(),
                    "arity mismatch entering a function"
                );
                for (param, value) in params.into_iter().zip(values) {
                    let addr = store.alloc(value);
                    env = env.bind(param, Binding::Addr(addr));
                }
                return Ok(StepResult::More(State {
                    control: *body,
                    env,
                    store,
                    kont: *continuation,
                    meta,
                }));
            }
            _ => unreachable!("positive terms are dispatched before the match"),
        }
    }
}

/// Drives the machine to completion, bounded by a step limit.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'a, L> {
    lang: &'a L,
    limit: usize,
}

impl<'a, L> Evaluator<'a, L> {
    pub fn new(lang: &'a L, limit: usize) -> Self {
        Self { lang, limit }
    }

    /// Injects `term` and steps until the machine halts, returning the
    /// terminal value and the number of steps taken.
    pub fn eval<P: Payload>(&self, term: Term<P>) -> Result<(Value<P>, usize), EvalError>
    where
        L: Lang<P>,
    {
        let mut state = inject(term);
        for iteration in 1..=self.limit {
            match step(state, self.lang)? {
                StepResult::More(next) => state = next,
                StepResult::Done(value) => {
                    debug!("evaluation halted after {iteration} steps");
                    return Ok((value, iteration));
                }
            }
        }
        Err(EvalError::LimitExceeded(self.limit))
    }
}

/// One-shot convenience over [`Evaluator`].
pub fn evaluate<P: Payload, L: Lang<P>>(
    term: Term<P>,
    lang: &L,
    limit: usize,
) -> Result<(Value<P>, usize), EvalError> {
    Evaluator::new(lang, limit).eval(term)
}
