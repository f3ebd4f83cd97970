//! # Deposit Instruction
//!
//! Accepts value into the caller's account. The amount is the value attached
//! to the call; size and value arrive together.
//!
//! ## What Happens During a Deposit:
//!
//! ```text
//! BEFORE:                              AFTER (deposit 30):
//!
//! balances[alice]: 20                  balances[alice]: 50 (+30)
//! total_held:      70                  total_held:      100 (+30)
//! deposit_count:   4                   deposit_count:   5
//! cap_total:       100                 cap_total:       100
//! ```
//!
//! No outbound call is made here, so a deposit needs no lock and is allowed
//! even while a withdrawal's payout is in progress.

use tracing::debug;

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::instructions::rejected;
use crate::state::{Ledger, Principal};
use crate::transfer::ValueTransfer;

impl<T: ValueTransfer> Ledger<T> {
    /// # deposit
    ///
    /// Credit `amount` to `caller`.
    ///
    /// ## Returns
    ///
    /// * `Ok(())` - Deposit committed, `Deposited` emitted
    /// * `Err(LedgerError::InvalidValue)` - `amount` is zero
    /// * `Err(LedgerError::BankCapExceeded)` - `total_held + amount > cap_total`
    pub fn deposit(&self, caller: &Principal, amount: u64) -> Result<(), LedgerError> {
        // ===================================
        // STEP 1: Validate Input
        // ===================================

        if amount == 0 {
            return Err(rejected("deposit", caller, LedgerError::InvalidValue));
        }

        let cap = self.config().cap_total;
        let mut state = self.state.borrow_mut();
        let current_total = state.total_held;

        // All-or-nothing: an overflowing sum is over the cap as well.
        let new_total = match current_total.checked_add(amount) {
            Some(total) if total <= cap => total,
            _ => {
                return Err(rejected(
                    "deposit",
                    caller,
                    LedgerError::BankCapExceeded {
                        current_total,
                        attempted: amount,
                        cap,
                    },
                ))
            }
        };

        // ===================================
        // STEP 2: Update Ledger State
        // ===================================

        // Bounded by cap_total, so neither sum can overflow.
        let balance = state.balances.entry(caller.clone()).or_insert(0);
        *balance += amount;
        let new_balance = *balance;

        state.total_held = new_total;
        state.deposit_count += 1;
        drop(state);

        debug!(caller = %caller, amount, new_balance, total_held = new_total, "Deposit applied");

        // ===================================
        // STEP 3: Emit Event
        // ===================================

        self.emit(LedgerEvent::Deposited {
            principal: caller.clone(),
            amount,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Ledger, LedgerConfig, LedgerError, LedgerEvent, Principal};

    #[test]
    fn test_deposit_credits_balance() {
        let ledger = Ledger::new(LedgerConfig::new(1_000, 10));
        let alice = Principal::from("alice");

        ledger.deposit(&alice, 40).unwrap();
        ledger.deposit(&alice, 2).unwrap();

        assert_eq!(ledger.balance_of(&alice), 42);
        let stats = ledger.stats();
        assert_eq!(stats.total_held, 42);
        assert_eq!(stats.deposit_count, 2);
        assert_eq!(stats.withdraw_count, 0);
        assert_eq!(
            ledger.events(),
            vec![
                LedgerEvent::Deposited {
                    principal: alice.clone(),
                    amount: 40,
                },
                LedgerEvent::Deposited {
                    principal: alice,
                    amount: 2,
                },
            ]
        );
    }

    #[test]
    fn test_deposit_zero_rejected() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");

        assert_eq!(ledger.deposit(&alice, 0), Err(LedgerError::InvalidValue));
        assert_eq!(ledger.stats().deposit_count, 0);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_deposit_up_to_cap_then_reject() {
        // cap=100, per-tx=10
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");

        ledger.deposit(&alice, 100).unwrap();
        assert_eq!(ledger.stats().total_held, 100);

        assert_eq!(
            ledger.deposit(&alice, 1),
            Err(LedgerError::BankCapExceeded {
                current_total: 100,
                attempted: 1,
                cap: 100,
            })
        );
        assert_eq!(ledger.balance_of(&alice), 100);
        assert_eq!(ledger.stats().deposit_count, 1);
    }

    #[test]
    fn test_deposit_cap_is_global_and_all_or_nothing() {
        let ledger = Ledger::new(LedgerConfig::new(50, 10));
        let alice = Principal::from("alice");
        let bob = Principal::from("bob");

        ledger.deposit(&alice, 30).unwrap();
        assert_eq!(
            ledger.deposit(&bob, 21),
            Err(LedgerError::BankCapExceeded {
                current_total: 30,
                attempted: 21,
                cap: 50,
            })
        );
        // Nothing of the 21 was accepted.
        assert_eq!(ledger.balance_of(&bob), 0);

        ledger.deposit(&bob, 20).unwrap();
        assert_eq!(ledger.stats().total_held, 50);
    }

    #[test]
    fn test_deposit_overflow_reported_as_cap() {
        let ledger = Ledger::new(LedgerConfig::new(u64::MAX, 10));
        let alice = Principal::from("alice");

        ledger.deposit(&alice, u64::MAX - 1).unwrap();
        assert_eq!(
            ledger.deposit(&alice, 2),
            Err(LedgerError::BankCapExceeded {
                current_total: u64::MAX - 1,
                attempted: 2,
                cap: u64::MAX,
            })
        );
    }

    #[test]
    fn test_zero_cap_ledger_accepts_nothing() {
        let ledger = Ledger::new(LedgerConfig::new(0, 0));
        assert_eq!(
            ledger.deposit(&Principal::from("alice"), 1),
            Err(LedgerError::BankCapExceeded {
                current_total: 0,
                attempted: 1,
                cap: 0,
            })
        );
    }
}
