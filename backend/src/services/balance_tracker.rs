//! # Balance Tracker Service
//!
//! The BalanceTracker audits a ledger the way an off-chain indexer would:
//! it rebuilds every balance from the committed event log and compares the
//! result with what the ledger itself reports.
//!
//! ## Reconciliation Flow
//!
//! ```text
//! 1. Replay Deposited / Withdrawn events into a fresh balance map
//!               ↓
//! 2. For each principal, compare replayed balance vs ledger balance
//!               ↓
//! 3. Ask the ledger to recheck its own totals (Σ balances, cap)
//!               ↓
//! 4. Any mismatch → logged and reported, run marked unreconciled
//! ```
//!
//! The ledger is the **source of truth**; the replay only detects drift.

use std::collections::{BTreeMap, BTreeSet};

use custodial_ledger::{Ledger, LedgerEvent, Principal, ValueTransfer};
use tracing::{debug, info, warn};

use crate::models::BalanceResponse;
use crate::utils::{format_amount, truncate_string};

/// A principal whose replayed balance differs from the ledger's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub principal: Principal,
    /// Balance rebuilt from events
    pub replayed: i128,
    /// Balance the ledger reports
    pub actual: u64,
}

/// Outcome of [`BalanceTracker::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub discrepancies: Vec<Discrepancy>,
    /// The ledger's own invariant check failure, if any.
    pub invariant_error: Option<String>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty() && self.invariant_error.is_none()
    }

    /// One-line summary for the report, `None` when clean.
    pub fn error_summary(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }

        let mut parts: Vec<String> = self
            .discrepancies
            .iter()
            .map(|d| format!("{}: replayed {} vs ledger {}", d.principal, d.replayed, d.actual))
            .collect();
        if let Some(err) = &self.invariant_error {
            parts.push(err.clone());
        }
        Some(parts.join("; "))
    }
}

/// The Balance Tracker service.
///
/// ## Usage
///
/// ```rust,ignore
/// let tracker = BalanceTracker::new();
/// let result = tracker.reconcile(&ledger);
/// assert!(result.is_clean());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalanceTracker;

impl BalanceTracker {
    pub fn new() -> Self {
        Self
    }

    /// Rebuild balances from an event log.
    ///
    /// Signed so a log with a withdrawal but no matching deposit shows up as
    /// a negative balance instead of wrapping.
    pub fn replay(&self, events: &[LedgerEvent]) -> BTreeMap<Principal, i128> {
        let mut balances = BTreeMap::new();
        for event in events {
            let entry = balances.entry(event.principal().clone()).or_insert(0i128);
            match event {
                LedgerEvent::Deposited { amount, .. } => *entry += i128::from(*amount),
                LedgerEvent::Withdrawn { amount, .. } => *entry -= i128::from(*amount),
            }
        }
        balances
    }

    /// Compare the replayed event log with the ledger and run the ledger's
    /// own invariant check.
    pub fn reconcile<T: ValueTransfer>(&self, ledger: &Ledger<T>) -> Reconciliation {
        info!("Starting reconciliation");

        let replayed = self.replay(&ledger.events());
        let mut result = Reconciliation::default();

        let accounts = ledger.accounts();
        let known: BTreeSet<&Principal> = accounts.iter().map(|(p, _)| p).collect();

        // Principals that only exist in the log.
        for (principal, expected) in &replayed {
            if *expected != 0 && !known.contains(principal) {
                result.discrepancies.push(Discrepancy {
                    principal: principal.clone(),
                    replayed: *expected,
                    actual: 0,
                });
            }
        }

        for (principal, actual) in accounts.iter().cloned() {
            let expected = replayed.get(&principal).copied().unwrap_or(0);
            if expected != i128::from(actual) {
                warn!(
                    "Balance discrepancy for {}: replayed={}, ledger={}",
                    truncate_string(principal.as_str(), 24),
                    expected,
                    actual
                );
                result.discrepancies.push(Discrepancy {
                    principal,
                    replayed: expected,
                    actual,
                });
            } else {
                debug!("Balance ok for {}: {}", principal, actual);
            }
        }

        if let Err(err) = ledger.reconcile() {
            warn!("Ledger invariant check failed: {}", err);
            result.invariant_error = Some(err.to_string());
        }

        info!(
            "Reconciliation complete: {} discrepancies, total held {}",
            result.discrepancies.len(),
            format_amount(ledger.stats().total_held)
        );

        result
    }

    /// Closing balances of every principal the ledger has seen.
    pub fn closing_balances<T: ValueTransfer>(&self, ledger: &Ledger<T>) -> Vec<BalanceResponse> {
        ledger
            .accounts()
            .into_iter()
            .map(|(principal, balance)| BalanceResponse { principal, balance })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodial_ledger::LedgerConfig;

    #[test]
    fn test_replay_rebuilds_balances() {
        let alice = Principal::from("alice");
        let bob = Principal::from("bob");
        let events = vec![
            LedgerEvent::Deposited {
                principal: alice.clone(),
                amount: 30,
            },
            LedgerEvent::Deposited {
                principal: bob.clone(),
                amount: 5,
            },
            LedgerEvent::Withdrawn {
                principal: alice.clone(),
                amount: 10,
            },
            LedgerEvent::Withdrawn {
                principal: bob.clone(),
                amount: 7,
            },
        ];

        let balances = BalanceTracker::new().replay(&events);
        assert_eq!(balances[&alice], 20);
        assert_eq!(balances[&bob], -2);
    }

    #[test]
    fn test_reconcile_clean_ledger() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");
        ledger.deposit(&alice, 30).unwrap();
        ledger.withdraw(&alice, 10).unwrap();
        let _ = ledger.withdraw(&alice, 50);

        let tracker = BalanceTracker::new();
        let result = tracker.reconcile(&ledger);

        assert!(result.is_clean());
        assert_eq!(result.error_summary(), None);
        assert_eq!(
            tracker.closing_balances(&ledger),
            vec![BalanceResponse {
                principal: alice,
                balance: 20,
            }]
        );
    }

    #[test]
    fn test_error_summary_lists_discrepancies() {
        let result = Reconciliation {
            discrepancies: vec![Discrepancy {
                principal: Principal::from("alice"),
                replayed: 5,
                actual: 4,
            }],
            invariant_error: None,
        };

        assert!(!result.is_clean());
        assert_eq!(
            result.error_summary().as_deref(),
            Some("alice: replayed 5 vs ledger 4")
        );
    }
}
