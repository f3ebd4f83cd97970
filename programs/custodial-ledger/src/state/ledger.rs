//! # Ledger Account Structure
//!
//! The single component holding all custodial state. Think of it as the
//! vault's record book:
//! - who holds how much (`balances`)
//! - how much is held in total (`total_held`)
//! - how many deposits and withdrawals went through (counters)
//! - the two ceilings fixed at construction (`LedgerConfig`)
//!
//! ## Invariants (before and after every operation)
//!
//! | # | Invariant |
//! |---|-----------|
//! | 1 | `total_held == Σ balances` |
//! | 2 | `total_held <= cap_total` |
//! | 3 | no balance ever goes below zero |
//! | 4 | the execution lock is only held while a withdrawal runs |
//!
//! ## Interior Mutability
//!
//! Operations take `&self`. The outbound transfer of a withdrawal hands a
//! shared reference of the ledger to external logic, which may call back in.
//! State lives in a `RefCell` and no borrow is ever held across that call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::LedgerEvent;
use crate::state::{Principal, ReentrancyGuard};
use crate::transfer::{PayoutBook, ValueTransfer};

/// # LedgerConfig
///
/// The two ceilings, fixed when the ledger is created.
///
/// | Field | Description |
/// |-------|-------------|
/// | cap_total | Maximum value `total_held` may ever reach |
/// | cap_per_withdrawal | Maximum value one withdrawal may move out |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub cap_total: u64,
    pub cap_per_withdrawal: u64,
}

impl LedgerConfig {
    pub fn new(cap_total: u64, cap_per_withdrawal: u64) -> Self {
        Self {
            cap_total,
            cap_per_withdrawal,
        }
    }
}

/// # LedgerStats
///
/// Snapshot returned by [`Ledger::stats`]. The counters are for
/// observability only; no invariant depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Sum of every balance
    pub total_held: u64,
    /// Successful deposits so far
    pub deposit_count: u64,
    /// Successful withdrawals so far
    pub withdraw_count: u64,
}

/// Mutable bookkeeping. Cloned wholesale to take a checkpoint.
#[derive(Debug, Clone, Default)]
pub(crate) struct LedgerState {
    pub(crate) balances: HashMap<Principal, u64>,
    pub(crate) total_held: u64,
    pub(crate) deposit_count: u64,
    pub(crate) withdraw_count: u64,
}

/// Everything needed to undo a call: state as it was plus how long the
/// event log was.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    state: LedgerState,
    events_len: usize,
}

/// # Ledger
///
/// Custodial ledger over a value-transfer rail `T`.
///
/// ## Example
///
/// ```rust
/// use custodial_ledger::{Ledger, LedgerConfig, Principal};
///
/// let ledger = Ledger::new(LedgerConfig::new(100, 10));
/// let alice = Principal::from("alice");
///
/// ledger.deposit(&alice, 20).unwrap();
/// ledger.withdraw(&alice, 10).unwrap();
///
/// assert_eq!(ledger.balance_of(&alice), 10);
/// assert_eq!(ledger.transfer().paid_to(&alice), 10);
/// ```
pub struct Ledger<T = PayoutBook> {
    config: LedgerConfig,
    pub(crate) state: RefCell<LedgerState>,
    pub(crate) events: RefCell<Vec<LedgerEvent>>,
    pub(crate) guard: ReentrancyGuard,
    pub(crate) transfer: T,
}

impl Ledger<PayoutBook> {
    /// Create a ledger that pays out through a fresh [`PayoutBook`].
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_transfer(config, PayoutBook::new())
    }
}

impl<T: ValueTransfer> Ledger<T> {
    /// Create a ledger with a custom outbound rail.
    ///
    /// All balances, totals and counters start at zero and the lock is clear.
    pub fn with_transfer(config: LedgerConfig, transfer: T) -> Self {
        debug!(
            cap_total = config.cap_total,
            cap_per_withdrawal = config.cap_per_withdrawal,
            "Ledger created"
        );

        Self {
            config,
            state: RefCell::new(LedgerState::default()),
            events: RefCell::new(Vec::new()),
            guard: ReentrancyGuard::new(),
            transfer,
        }
    }

    /// The immutable ceilings.
    pub fn config(&self) -> LedgerConfig {
        self.config
    }

    /// The outbound rail.
    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Whether a withdrawal is currently in progress.
    pub fn is_locked(&self) -> bool {
        self.guard.is_entered()
    }

    /// Copy of the committed event log, oldest first.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn emit(&self, event: LedgerEvent) {
        info!(
            event = event.name(),
            principal = %event.principal(),
            amount = event.amount(),
            "Ledger event"
        );
        self.events.borrow_mut().push(event);
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.borrow().clone(),
            events_len: self.events.borrow().len(),
        }
    }

    /// Restore state and truncate the event log to `checkpoint`.
    ///
    /// Also discards anything committed by nested calls made after the
    /// checkpoint was taken.
    pub(crate) fn rollback(&self, checkpoint: Checkpoint) {
        *self.state.borrow_mut() = checkpoint.state;
        self.events.borrow_mut().truncate(checkpoint.events_len);
    }
}

impl<T> fmt::Debug for Ledger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Ledger")
            .field("config", &self.config)
            .field("accounts", &state.balances.len())
            .field("total_held", &state.total_held)
            .field("deposit_count", &state.deposit_count)
            .field("withdraw_count", &state.withdraw_count)
            .field("locked", &self.guard.is_entered())
            .finish()
    }
}
