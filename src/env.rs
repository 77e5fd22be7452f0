use crate::error::EvalError;
use crate::store::Address;
use crate::term::Term;

/// What a name resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding<P> {
    /// A location in the store.
    Addr(Address),
    /// A local definition, as introduced by `letrec`. Looking it up closes
    /// over the environment in force at the lookup, which is what makes the
    /// definition able to see itself.
    Def(Term<P>),
}

/// A persistent mapping from names to bindings.
///
/// Binding is functional: `bind` returns a new environment that shadows the
/// name, leaving the receiver untouched. Captured continuations embed
/// environments by value, and the structural sharing underneath makes that
/// embedding cheap while guaranteeing the capture-time snapshot stays intact.
#[derive(Clone, Debug, PartialEq)]
pub struct Env<P> {
    bindings: im::HashMap<String, Binding<P>>,
}

impl<P: Clone> Env<P> {
    pub fn new() -> Self {
        Self {
            bindings: im::HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Binding<P>, EvalError> {
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::UnboundSymbol(name.to_string()))
    }

    pub fn bind(&self, name: impl Into<String>, binding: Binding<P>) -> Self {
        Self {
            bindings: self.bindings.update(name.into(), binding),
        }
    }
}

impl<P: Clone> Default for Env<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bind_shadows_without_touching_the_prior_env() {
        let empty: Env<i64> = Env::new();
        let outer = empty.bind("x", Binding::Addr(Address::test(0)));
        let inner = outer.bind("x", Binding::Addr(Address::test(1)));

        assert_eq!(&Binding::Addr(Address::test(0)), outer.lookup("x").unwrap());
        assert_eq!(&Binding::Addr(Address::test(1)), inner.lookup("x").unwrap());
        assert!(matches!(
            empty.lookup("x"),
            Err(EvalError::UnboundSymbol(_))
        ));
    }

    #[test]
    fn snapshots_do_not_observe_later_binds() {
        let base: Env<i64> = Env::new().bind("a", Binding::Addr(Address::test(0)));
        let snapshot = base.clone();
        let extended = base.bind("b", Binding::Addr(Address::test(1)));

        assert!(snapshot.lookup("b").is_err());
        assert!(extended.lookup("b").is_ok());
        assert!(snapshot.lookup("a").is_ok());
    }
}
