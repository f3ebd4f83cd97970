//! # Value Transfer Module
//!
//! The outbound leg of a withdrawal: moving value from the ledger to the
//! withdrawing principal.
//!
//! A rail is external logic from the ledger's point of view. It receives a
//! shared reference to the ledger and may call back into it, exactly the way
//! a recipient's code can run during a payout:
//!
//! ```text
//! Ledger::withdraw ──► ValueTransfer::send(ledger, to, amount)
//!                              │
//!                              └──► ledger.withdraw(..)  → Err(Reentrancy)
//!                              └──► ledger.deposit(..)   → allowed
//!                              └──► ledger.balance_of(..) → already debited
//! ```
//!
//! A rail that returns `Err` makes the ledger revert the whole withdrawal.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use crate::state::{Ledger, Principal};

/// Failure reported by an outbound rail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient (or the rail) refused the value.
    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}

/// Outbound value-transfer mechanism used by [`Ledger::withdraw`].
pub trait ValueTransfer: Sized {
    /// Send `amount` to `to`.
    ///
    /// Called after the ledger has already debited `to`; any re-entry
    /// through `ledger` observes the debited balance.
    fn send(&self, ledger: &Ledger<Self>, to: &Principal, amount: u64) -> Result<(), TransferError>;
}

/// # PayoutBook
///
/// Default rail. Keeps a running record of everything paid out per
/// recipient, and refuses payouts to blocked recipients.
///
/// ```rust
/// use custodial_ledger::{Ledger, LedgerConfig, LedgerError, PayoutBook, Principal};
///
/// let mallory = Principal::from("mallory");
/// let rail = PayoutBook::with_blocked([mallory.clone()]);
/// let ledger = Ledger::with_transfer(LedgerConfig::new(100, 50), rail);
///
/// ledger.deposit(&mallory, 10).unwrap();
/// assert_eq!(
///     ledger.withdraw(&mallory, 10),
///     Err(LedgerError::TransferFailed { to: mallory.clone(), amount: 10 })
/// );
/// assert_eq!(ledger.balance_of(&mallory), 10);
/// ```
#[derive(Debug, Default)]
pub struct PayoutBook {
    payouts: RefCell<HashMap<Principal, u64>>,
    blocked: HashSet<Principal>,
}

impl PayoutBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A book that rejects every payout addressed to one of `blocked`.
    pub fn with_blocked(blocked: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            payouts: RefCell::new(HashMap::new()),
            blocked: blocked.into_iter().collect(),
        }
    }

    /// Total paid out to `to` so far.
    pub fn paid_to(&self, to: &Principal) -> u64 {
        self.payouts.borrow().get(to).copied().unwrap_or(0)
    }

    /// Total paid out across all recipients.
    pub fn total_paid(&self) -> u64 {
        self.payouts.borrow().values().sum()
    }

    /// All payouts, sorted by recipient.
    pub fn payouts(&self) -> Vec<(Principal, u64)> {
        let mut payouts: Vec<_> = self
            .payouts
            .borrow()
            .iter()
            .map(|(who, amount)| (who.clone(), *amount))
            .collect();
        payouts.sort();
        payouts
    }

    pub fn is_blocked(&self, to: &Principal) -> bool {
        self.blocked.contains(to)
    }
}

impl ValueTransfer for PayoutBook {
    fn send(
        &self,
        _ledger: &Ledger<Self>,
        to: &Principal,
        amount: u64,
    ) -> Result<(), TransferError> {
        if self.is_blocked(to) {
            return Err(TransferError::Rejected {
                reason: format!("recipient {} refuses payouts", to),
            });
        }

        let mut payouts = self.payouts.borrow_mut();
        let paid = payouts.entry(to.clone()).or_insert(0);
        *paid = paid.saturating_add(amount);
        debug!(recipient = %to, amount, total = *paid, "Payout recorded");

        Ok(())
    }
}
