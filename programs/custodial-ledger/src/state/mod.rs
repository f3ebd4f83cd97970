//! # State Module
//!
//! Everything the ledger owns: identities, configuration, the balance map
//! with its totals, and the execution lock guarding withdrawals.
//!
//! ## Key Concepts:
//!
//! - **Principal**: the identity an operation runs on behalf of.
//! - **Ledger**: a self-contained instance; two ledgers never share state.
//! - **Guard**: the execution lock, held only while a withdrawal runs.

pub mod guard;
pub mod ledger;
pub mod principal;

pub use guard::*;
pub use ledger::*;
pub use principal::*;
