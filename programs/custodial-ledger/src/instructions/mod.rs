//! # Instructions Module
//!
//! The operations a ledger exposes. Each file adds one family of methods to
//! [`Ledger`](crate::Ledger).
//!
//! ## Available Instructions:
//!
//! | Instruction | Mutates | Outbound call | Guarded |
//! |-------------|---------|---------------|---------|
//! | `deposit` | yes | no | no |
//! | `withdraw` | yes | yes | yes |
//! | `receive` / `fallback` | never (always rejects) | no | no |
//! | `balance_of` / `stats` / `reconcile` | no | no | no |
//!
//! ## Instruction Flow:
//!
//! ```text
//! validate → mutate → (outbound transfer) → emit
//!     │          │              │
//!     └──────────┴──────────────┴──► any failure: revert to prior state
//! ```

pub mod deposit;
pub mod queries;
pub mod receive;
pub mod withdraw;

use tracing::warn;

use crate::errors::LedgerError;
use crate::state::Principal;

/// Log a rejection and hand the error back for `return Err(..)`.
pub(crate) fn rejected(
    operation: &'static str,
    caller: &Principal,
    err: LedgerError,
) -> LedgerError {
    warn!(
        operation,
        caller = %caller,
        code = err.code(),
        "Rejected: {}",
        err
    );
    err
}
