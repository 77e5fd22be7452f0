use std::collections::HashMap;
use std::fmt;

use crate::error::EvalError;
use crate::value::Value;

/// An opaque location in the store, fresh within a run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(u64);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[cfg(test)]
impl Address {
    pub(crate) fn test(n: u64) -> Self {
        Self(n)
    }
}

/// The value store. Addresses come from a monotone counter and are never
/// rebound, so the store only ever grows within a run and captured
/// continuations can share it by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Store<P> {
    cells: HashMap<Address, Value<P>>,
    next: u64,
}

impl<P> Store<P> {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            next: 0,
        }
    }

    /// Writes `value` at a fresh address and returns the address.
    pub fn alloc(&mut self, value: Value<P>) -> Address {
        let addr = Address(self.next);
        self.next += 1;
        self.cells.insert(addr.clone(), value);
        addr
    }

    pub fn fetch(&self, addr: &Address) -> Result<&Value<P>, EvalError> {
        self.cells
            .get(addr)
            .ok_or_else(|| EvalError::UnboundAddress(addr.clone()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<P> Default for Store<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alloc_is_fresh() {
        let mut store: Store<i64> = Store::new();
        let a = store.alloc(Value::Scalar(1));
        let b = store.alloc(Value::Scalar(1));

        assert_ne!(a, b);
        assert_eq!(&Value::Scalar(1), store.fetch(&a).unwrap());
        assert_eq!(2, store.len());
    }

    #[test]
    fn fetch_of_a_foreign_address_fails() {
        let mut one: Store<i64> = Store::new();
        let mut other: Store<i64> = Store::new();
        let _ = other.alloc(Value::Scalar(1));
        let _ = other.alloc(Value::Scalar(2));
        let a = one.alloc(Value::Scalar(1));
        let beyond = Address(a.0 + 1);

        assert!(matches!(
            one.fetch(&beyond),
            Err(EvalError::UnboundAddress(_))
        ));
    }
}
