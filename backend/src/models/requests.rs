//! # Script Request Models
//!
//! Structures for the operation script replayed by the backend.
//! Each operation is one call against the ledger, tagged by `op`.

use custodial_ledger::Principal;
use serde::{Deserialize, Serialize};

/// A full operation script.
///
/// ## Example JSON
///
/// ```json
/// {
///     "operations": [
///         { "op": "deposit",   "principal": "alice", "amount": 100 },
///         { "op": "withdraw",  "principal": "alice", "amount": 10 },
///         { "op": "balance_of", "principal": "alice" },
///         { "op": "stats" },
///         { "op": "receive",   "principal": "bob",   "amount": 5 }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationScript {
    /// Operations, applied in order.
    pub operations: Vec<LedgerOperation>,
}

/// One ledger call.
///
/// ## Notes
///
/// - `amount` is in the ledger's smallest unit
/// - `receive` sends value to the ledger without going through `deposit`
///   (always rejected; useful for checking that refusal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LedgerOperation {
    /// Deposit `amount` as `principal`.
    Deposit { principal: Principal, amount: u64 },

    /// Withdraw `amount` as `principal`.
    Withdraw { principal: Principal, amount: u64 },

    /// Read `principal`'s balance.
    #[serde(rename = "balance_of")]
    BalanceOf { principal: Principal },

    /// Read ledger totals.
    Stats,

    /// Push value directly at the ledger.
    Receive { principal: Principal, amount: u64 },
}

impl LedgerOperation {
    /// Name used in reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerOperation::Deposit { .. } => "deposit",
            LedgerOperation::Withdraw { .. } => "withdraw",
            LedgerOperation::BalanceOf { .. } => "balance_of",
            LedgerOperation::Stats => "stats",
            LedgerOperation::Receive { .. } => "receive",
        }
    }
}
