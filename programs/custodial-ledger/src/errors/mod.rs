//! # Error Handling Module
//!
//! Every way a ledger operation can be rejected. Each rejection aborts the
//! whole operation: whatever the call already changed is rolled back before
//! the error reaches the caller.
//!
//! ## Error Codes
//!
//! Codes are stable and grouped by category so clients can branch on a
//! number instead of matching message text.
//!
//! | Category | Codes | Variants |
//! |----------|-------|----------|
//! | Input validation | 6000 | `InvalidValue` |
//! | Cap errors | 6010-6011 | `BankCapExceeded`, `WithdrawLimitExceeded` |
//! | Balance errors | 6020 | `InsufficientBalance` |
//! | Transfer errors | 6030 | `TransferFailed` |
//! | State errors | 6040 | `Reentrancy` |
//!
//! ## Example
//!
//! ```rust
//! use custodial_ledger::{Ledger, LedgerConfig, LedgerError, Principal};
//!
//! let ledger = Ledger::new(LedgerConfig::new(100, 10));
//! let alice = Principal::from("alice");
//!
//! ledger.deposit(&alice, 5).unwrap();
//! let err = ledger.withdraw(&alice, 6).unwrap_err();
//!
//! assert_eq!(err, LedgerError::InsufficientBalance { available: 5, requested: 6 });
//! assert_eq!(err.code(), 6020);
//! ```

use thiserror::Error;

use crate::state::Principal;

/// # LedgerError
///
/// All rejections the ledger can produce. Variants carry the amounts and
/// limits involved so a caller can diagnose the failure without reading
/// ledger state again.
///
/// `Reentrancy` is the one variant without a payload: a nested withdrawal is
/// refused before anything about it is inspected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // ============================================
    // INPUT VALIDATION ERRORS (6000)
    // ============================================

    /// A zero amount was supplied, or value arrived outside of `deposit`.
    ///
    /// ## When this occurs:
    /// - `deposit(_, 0)` or `withdraw(_, 0)`
    /// - any call to `receive` / `fallback`
    #[error("Invalid value: amount must be non-zero and routed through deposit")]
    InvalidValue,

    // ============================================
    // CAP ERRORS (6010-6011)
    // ============================================

    /// Accepting the deposit would push `total_held` over `cap_total`.
    ///
    /// No partial acceptance: the whole deposit is refused.
    #[error("Bank cap exceeded: holding {current_total}, attempted {attempted}, cap {cap}")]
    BankCapExceeded {
        /// `total_held` at the time of the call
        current_total: u64,
        /// The amount the caller tried to deposit
        attempted: u64,
        /// The configured `cap_total`
        cap: u64,
    },

    /// A single withdrawal asked for more than `cap_per_withdrawal`.
    #[error("Withdraw limit exceeded: requested {requested}, limit {limit}")]
    WithdrawLimitExceeded {
        /// The amount the caller tried to withdraw
        requested: u64,
        /// The configured `cap_per_withdrawal`
        limit: u64,
    },

    // ============================================
    // BALANCE ERRORS (6020)
    // ============================================

    /// The caller's own balance does not cover the withdrawal.
    ///
    /// ## Example:
    /// ```text
    /// balance: 5
    /// withdraw(6) → InsufficientBalance { available: 5, requested: 6 }
    /// ```
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The caller's balance at the time of the call
        available: u64,
        /// The amount the caller tried to withdraw
        requested: u64,
    },

    // ============================================
    // TRANSFER ERRORS (6030)
    // ============================================

    /// The outbound transfer to the caller was refused.
    ///
    /// The balance debit applied before the transfer has been reverted by
    /// the time this error is returned.
    #[error("Transfer of {amount} to {to} failed")]
    TransferFailed {
        /// The intended recipient (always the withdrawing principal)
        to: Principal,
        /// The amount that could not be sent
        amount: u64,
    },

    // ============================================
    // STATE ERRORS (6040)
    // ============================================

    /// A withdrawal was attempted while another one on the same ledger was
    /// still in progress.
    #[error("Reentrant call")]
    Reentrancy,
}

impl LedgerError {
    /// Stable numeric code for this error (see the module table).
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::InvalidValue => 6000,
            LedgerError::BankCapExceeded { .. } => 6010,
            LedgerError::WithdrawLimitExceeded { .. } => 6011,
            LedgerError::InsufficientBalance { .. } => 6020,
            LedgerError::TransferFailed { .. } => 6030,
            LedgerError::Reentrancy => 6040,
        }
    }

    /// Whether the ledger itself would ever retry this rejection.
    ///
    /// Always `false`. Callers may resubmit at their own discretion once the
    /// condition behind the rejection has changed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Result of reconciling ledger totals against the balance map.
///
/// Produced by [`Ledger::reconcile`](crate::Ledger::reconcile); a healthy
/// ledger never returns one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `total_held` differs from the sum of all balances.
    #[error("Total held {total_held} does not match sum of balances {sum_of_balances}")]
    TotalMismatch {
        total_held: u64,
        sum_of_balances: u128,
    },

    /// `total_held` is above `cap_total`.
    #[error("Total held {total_held} exceeds cap {cap}")]
    CapBreached { total_held: u64, cap: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            LedgerError::InvalidValue,
            LedgerError::BankCapExceeded {
                current_total: 0,
                attempted: 0,
                cap: 0,
            },
            LedgerError::WithdrawLimitExceeded {
                requested: 0,
                limit: 0,
            },
            LedgerError::InsufficientBalance {
                available: 0,
                requested: 0,
            },
            LedgerError::TransferFailed {
                to: Principal::from("a"),
                amount: 0,
            },
            LedgerError::Reentrancy,
        ];

        let mut codes: Vec<u32> = errors.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(|e| !e.is_retryable()));
    }

    #[test]
    fn test_messages_carry_context() {
        let err = LedgerError::BankCapExceeded {
            current_total: 100,
            attempted: 1,
            cap: 100,
        };
        assert_eq!(
            err.to_string(),
            "Bank cap exceeded: holding 100, attempted 1, cap 100"
        );

        let err = LedgerError::TransferFailed {
            to: Principal::from("bob"),
            amount: 7,
        };
        assert_eq!(err.to_string(), "Transfer of 7 to bob failed");
    }

    #[test]
    fn test_reentrancy_has_no_payload() {
        // Reentrancy is the only rejection without diagnostic fields.
        assert_eq!(LedgerError::Reentrancy.to_string(), "Reentrant call");
    }
}
