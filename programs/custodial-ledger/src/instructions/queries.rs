//! # Read-only Queries
//!
//! `balance_of` and `stats` never fail and never change anything. `reconcile`
//! recomputes totals from the balance map, the same check an off-chain
//! auditor would run against the event log.

use tracing::debug;

use crate::errors::InvariantViolation;
use crate::state::{Ledger, LedgerStats, Principal};
use crate::transfer::ValueTransfer;

impl<T: ValueTransfer> Ledger<T> {
    /// Current balance of `principal`; zero for a principal never seen.
    pub fn balance_of(&self, principal: &Principal) -> u64 {
        self.state
            .borrow()
            .balances
            .get(principal)
            .copied()
            .unwrap_or(0)
    }

    /// `(total_held, deposit_count, withdraw_count)`.
    pub fn stats(&self) -> LedgerStats {
        let state = self.state.borrow();
        LedgerStats {
            total_held: state.total_held,
            deposit_count: state.deposit_count,
            withdraw_count: state.withdraw_count,
        }
    }

    /// Every principal that has ever deposited, with its balance, sorted by
    /// principal. Fully withdrawn accounts stay listed with zero.
    pub fn accounts(&self) -> Vec<(Principal, u64)> {
        let mut accounts: Vec<_> = self
            .state
            .borrow()
            .balances
            .iter()
            .map(|(who, balance)| (who.clone(), *balance))
            .collect();
        accounts.sort();
        accounts
    }

    /// Check `total_held == Σ balances` and `total_held <= cap_total`.
    pub fn reconcile(&self) -> Result<(), InvariantViolation> {
        let state = self.state.borrow();
        let sum_of_balances: u128 = state.balances.values().map(|b| u128::from(*b)).sum();

        if sum_of_balances != u128::from(state.total_held) {
            return Err(InvariantViolation::TotalMismatch {
                total_held: state.total_held,
                sum_of_balances,
            });
        }

        let cap = self.config().cap_total;
        if state.total_held > cap {
            return Err(InvariantViolation::CapBreached {
                total_held: state.total_held,
                cap,
            });
        }

        debug!(
            accounts = state.balances.len(),
            total_held = state.total_held,
            "Reconciled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::InvariantViolation;
    use crate::{Ledger, LedgerConfig, Principal};

    /// Small deterministic generator so the sequence test is reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u64) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 33) % bound
        }
    }

    #[test]
    fn test_reads_are_stable() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");
        ledger.deposit(&alice, 12).unwrap();

        assert_eq!(ledger.balance_of(&alice), ledger.balance_of(&alice));
        assert_eq!(ledger.stats(), ledger.stats());
        assert_eq!(ledger.balance_of(&Principal::from("nobody")), 0);
    }

    #[test]
    fn test_emptied_account_stays_listed() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");
        ledger.deposit(&alice, 10).unwrap();
        ledger.withdraw(&alice, 10).unwrap();

        assert_eq!(ledger.accounts(), vec![(alice, 0)]);
    }

    #[test]
    fn test_reconcile_detects_tampering() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");
        ledger.deposit(&alice, 40).unwrap();

        ledger.state.borrow_mut().total_held = 41;
        assert_eq!(
            ledger.reconcile(),
            Err(InvariantViolation::TotalMismatch {
                total_held: 41,
                sum_of_balances: 40,
            })
        );

        {
            let mut state = ledger.state.borrow_mut();
            state.total_held = 140;
            state.balances.insert(alice.clone(), 140);
        }
        assert_eq!(
            ledger.reconcile(),
            Err(InvariantViolation::CapBreached {
                total_held: 140,
                cap: 100,
            })
        );
    }

    #[test]
    fn test_invariants_hold_over_random_sequence() {
        let config = LedgerConfig::new(500, 25);
        let ledger = Ledger::new(config);
        let principals: Vec<Principal> = ["alice", "bob", "carol", "dave"]
            .into_iter()
            .map(Principal::from)
            .collect();
        let mut rng = Lcg(42);

        for _ in 0..2_000 {
            let who = &principals[rng.next(principals.len() as u64) as usize];
            let amount = rng.next(40);
            let before = ledger.balance_of(who);

            if rng.next(2) == 0 {
                if ledger.deposit(who, amount).is_ok() {
                    assert_eq!(ledger.balance_of(who), before + amount);
                }
            } else if ledger.withdraw(who, amount).is_ok() {
                assert!(amount <= config.cap_per_withdrawal);
                assert!(amount <= before);
                assert_eq!(ledger.balance_of(who), before - amount);
            } else {
                assert_eq!(ledger.balance_of(who), before);
            }

            let stats = ledger.stats();
            let sum: u64 = principals.iter().map(|p| ledger.balance_of(p)).sum();
            assert_eq!(stats.total_held, sum);
            assert!(stats.total_held <= config.cap_total);
            assert!(!ledger.is_locked());
        }

        assert!(ledger.reconcile().is_ok());
        let stats = ledger.stats();
        assert_eq!(ledger.transfer().total_paid(), {
            let deposited: u64 = ledger
                .events()
                .iter()
                .filter(|e| matches!(e, crate::LedgerEvent::Deposited { .. }))
                .map(|e| e.amount())
                .sum();
            deposited - stats.total_held
        });
    }
}
