use thiserror::Error;

use crate::store::Address;

/// Errors raised while driving the machine. All of them are fatal to the
/// current run; a host restarts by injecting a fresh state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),
    #[error("unbound address: {0}")]
    UnboundAddress(Address),
    #[error("negative term in positive position: {0}")]
    InvalidPositive(String),
    #[error("if condition must be a boolean scalar, got {0}")]
    IfRequiresBool(String),
    #[error("expected a continuation value, got {0}")]
    ExpectedContinuation(String),
    #[error("bad application context: {0}")]
    ArityOrContext(String),
    #[error("unknown primitive operation: {0}")]
    UnknownOp(String),
    #[error("bad literal payload: {0}")]
    BadLiteral(String),
    #[error("step limit of {0} exceeded")]
    LimitExceeded(usize),
}
