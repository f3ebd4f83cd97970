//! # Custodial Ledger
//!
//! Holds value on behalf of principals and gives it back on request.
//!
//! ## Overview
//!
//! - **Deposits**: value attached to a call is credited to the caller
//! - **Withdrawals**: the caller's own balance is debited and paid out
//! - **Caps**: a global ceiling on everything held, and a ceiling per withdrawal
//! - **Reentrancy safety**: payouts happen after the debit and under a lock
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            LEDGER                                │
//! │                                                                  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐   │
//! │  │  balances    │  │  totals      │  │  config (immutable)  │   │
//! │  │  principal → │  │  total_held  │  │  cap_total           │   │
//! │  │     amount   │  │  counters    │  │  cap_per_withdrawal  │   │
//! │  └──────────────┘  └──────────────┘  └──────────────────────┘   │
//! │                                                                  │
//! │  ┌──────────────────────┐   ┌────────────────────────────────┐  │
//! │  │  ReentrancyGuard     │   │  event log (Deposited /        │  │
//! │  │  (withdraw only)     │   │             Withdrawn)         │  │
//! │  └──────────────────────┘   └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ send(ledger, to, amount)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    VALUE TRANSFER RAIL                           │
//! │          (PayoutBook by default; may call back in)               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Summary
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `deposit` | Credit the caller; rejects zero and cap breaches |
//! | `withdraw` | Debit then pay the caller; guarded, reverts on payout failure |
//! | `balance_of` | Current balance of a principal |
//! | `stats` | `(total_held, deposit_count, withdraw_count)` |
//! | `receive` / `fallback` | Unsolicited value; always rejected |
//! | `reconcile` | Recheck totals against balances |
//!
//! ## Example Usage
//!
//! ```rust
//! use custodial_ledger::{Ledger, LedgerConfig, LedgerError, Principal};
//!
//! let ledger = Ledger::new(LedgerConfig::new(100, 10));
//! let alice = Principal::from("alice");
//!
//! ledger.deposit(&alice, 100).unwrap();
//! assert_eq!(
//!     ledger.deposit(&alice, 1),
//!     Err(LedgerError::BankCapExceeded { current_total: 100, attempted: 1, cap: 100 })
//! );
//!
//! ledger.withdraw(&alice, 10).unwrap();
//! assert_eq!(ledger.stats().total_held, 90);
//! ```

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod transfer;

pub use errors::*;
pub use events::*;
pub use state::*;
pub use transfer::*;
