use proptest::prelude::*;

use delimit::eval::lang::{Arith, Atom};
use delimit::eval::{evaluate, inject, step, StepResult};
use delimit::term::Term;

const LIMIT: usize = 10_000;

/// Closed-ish terms without `letrec`, so every generated program terminates:
/// each transition consumes term structure, and without recursive
/// definitions nothing re-enters a term it already left.
fn arb_term() -> impl Strategy<Value = Term<Atom>> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(|n| Term::Literal(Atom::Num(n))),
        any::<bool>().prop_map(|b| Term::Literal(Atom::Bool(b))),
        "[a-z][a-z0-9]{0,2}".prop_map(|name| Term::symbol(name)),
        Just(Term::symbol("_")),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Term::suspend),
            inner.clone().prop_map(Term::resume),
            inner.clone().prop_map(Term::reset),
            inner.clone().prop_map(|body| Term::shift("k", body)),
            (inner.clone(), inner.clone())
                .prop_map(|(bound, body)| Term::let_("x", bound, body)),
            ("[a-z]", inner.clone()).prop_map(|(p, body)| Term::lambda(vec![p], body)),
            (inner.clone(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(operator, operands)| Term::apply(operator, operands)),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|xs| Term::op("add", xs)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Term::if_(c, t, e)),
        ]
    })
}

proptest! {
    /// The positivity predicate is total and lands exactly on the data-like
    /// variants.
    #[test]
    fn positivity_is_definite(term in arb_term()) {
        let expected = matches!(
            term,
            Term::Literal(_) | Term::Symbol(_) | Term::Op(..) | Term::Suspend(_)
        );
        prop_assert_eq!(expected, term.is_positive());
    }

    /// Stepping the same state twice gives the same outcome, errors
    /// included.
    #[test]
    fn step_is_deterministic(term in arb_term()) {
        let state = inject(term);
        prop_assert_eq!(step(state.clone(), &Arith), step(state, &Arith));
    }

    /// Whole-run determinism: values, iteration counts and errors all agree.
    #[test]
    fn evaluation_is_deterministic(term in arb_term()) {
        prop_assert_eq!(
            evaluate(term.clone(), &Arith, LIMIT),
            evaluate(term, &Arith, LIMIT)
        );
    }

    /// `(? (! t))` computes what `t` computes.
    ///
    /// A term that is already a suspension is excluded: suspending data is
    /// the identity, so `(! (! e))` is the same closure as `(! e)` and the
    /// resume enters it one level deeper than `t` alone would go.
    #[test]
    fn suspend_resume_identity(term in arb_term()) {
        prop_assume!(!matches!(term, Term::Suspend(_)));
        let wrapped = Term::resume(Term::suspend(term.clone()));
        prop_assert_eq!(
            evaluate(term, &Arith, LIMIT).map(|(value, _)| value),
            evaluate(wrapped, &Arith, LIMIT).map(|(value, _)| value)
        );
    }

    /// Generated programs either halt or fail within the step limit; the
    /// machine never wedges.
    #[test]
    fn stepping_makes_progress(term in arb_term()) {
        let mut state = inject(term);
        let mut halted = false;
        for _ in 0..LIMIT {
            match step(state, &Arith) {
                Ok(StepResult::More(next)) => state = next,
                Ok(StepResult::Done(_)) | Err(_) => {
                    halted = true;
                    break;
                }
            }
        }
        prop_assert!(halted);
    }
}
