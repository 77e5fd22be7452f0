//! An embeddable evaluator for a small, untyped call-by-push-value
//! intermediate language with delimited control.
//!
//! The language splits terms by polarity: positive terms are data and reduce
//! to values without a step, negative terms are computations that drive the
//! machine. `shift`/`reset` give programs first-class delimited
//! continuations, and a two-level continuation stack (the current
//! continuation plus a meta-stack of delimiters) keeps captures properly
//! scoped.
//!
//! Hosts embed the machine by implementing [`eval::lang::Lang`], which is a
//! `literal` hook mapping literal payloads to values plus an `op` hook for
//! primitive operations, and then looping [`eval::step`] from
//! [`eval::inject`] until it yields a terminal value. States may be
//! inspected or modified between steps; a single step is the smallest
//! observable unit of progress.

pub mod cont;
pub mod env;
pub mod error;
pub mod eval;
pub mod parser;
pub mod store;
pub mod term;
pub mod value;
