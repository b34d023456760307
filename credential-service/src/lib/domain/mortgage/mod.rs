//! Repayment arithmetic backing the calculator form.
//!
//! Stateless; the only failure mode is invalid numeric input.

pub mod errors;
pub mod models;
