//! # Ledger Manager Service
//!
//! The LedgerManager hosts one ledger for the lifetime of the process and
//! drives it from an operation script.
//!
//! ## Responsibilities
//!
//! - Create the ledger from configuration (caps, blocked payees)
//! - Load and parse the operation script
//! - Apply each operation in order, recording the outcome
//! - Reconcile at the end and assemble the run report
//!
//! ## Flow Example: Batch Run
//!
//! ```text
//! 1. load_script(path)
//!                ↓
//! 2. for each operation: apply() → OperationOutcome
//!    (a rejected operation is recorded, the batch continues)
//!                ↓
//! 3. BalanceTracker.reconcile()
//!                ↓
//! 4. RunReport returned to caller
//! ```

use std::fs;

use chrono::Utc;
use custodial_ledger::{Ledger, PayoutBook};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{
    LedgerOperation, OperationOutcome, OperationScript, PayoutResponse, RunReport,
};
use crate::utils::format_amount;

use super::BalanceTracker;

/// Errors that can occur around a batch run.
///
/// Ledger rejections are not errors at this level; they are outcomes.
#[derive(Debug, Error)]
pub enum RunError {
    /// The script file could not be read.
    #[error("Failed to read script {path}: {source}")]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The script file is not a valid operation script.
    #[error("Failed to parse script {path}: {source}")]
    ScriptParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load an operation script from disk.
pub fn load_script(path: &str) -> Result<OperationScript, RunError> {
    let raw = fs::read_to_string(path).map_err(|source| RunError::ScriptRead {
        path: path.to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| RunError::ScriptParse {
        path: path.to_string(),
        source,
    })
}

/// The service hosting the ledger.
///
/// ## Usage
///
/// ```rust,ignore
/// let manager = LedgerManager::new(&config);
/// let script = load_script(&config.script_path)?;
/// let report = manager.run(&script);
/// ```
#[derive(Debug)]
pub struct LedgerManager {
    /// The hosted ledger.
    ledger: Ledger<PayoutBook>,

    /// Auditor used after each run.
    tracker: BalanceTracker,
}

impl LedgerManager {
    /// Create a new LedgerManager with an empty ledger.
    pub fn new(config: &AppConfig) -> Self {
        let rail = PayoutBook::with_blocked(config.blocked_payees.iter().cloned());

        info!(
            "Ledger ready: cap_total={}, cap_per_withdrawal={}, blocked payees={}",
            format_amount(config.ledger.cap_total),
            format_amount(config.ledger.cap_per_withdrawal),
            config.blocked_payees.len()
        );

        Self {
            ledger: Ledger::with_transfer(config.ledger, rail),
            tracker: BalanceTracker::new(),
        }
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &Ledger<PayoutBook> {
        &self.ledger
    }

    /// Apply one operation and record what happened.
    pub fn apply(&self, index: usize, operation: &LedgerOperation) -> OperationOutcome {
        let op = operation.name();
        debug!("Applying #{} {}", index, op);

        let result = match operation {
            LedgerOperation::Deposit { principal, amount } => {
                self.ledger.deposit(principal, *amount)
            }
            LedgerOperation::Withdraw { principal, amount } => {
                self.ledger.withdraw(principal, *amount)
            }
            LedgerOperation::Receive { principal, amount } => {
                self.ledger.receive(principal, *amount)
            }
            LedgerOperation::BalanceOf { principal } => {
                return OperationOutcome {
                    value: Some(self.ledger.balance_of(principal)),
                    ..OperationOutcome::accepted(index, op)
                };
            }
            LedgerOperation::Stats => {
                return OperationOutcome {
                    stats: Some(self.ledger.stats()),
                    ..OperationOutcome::accepted(index, op)
                };
            }
        };

        match result {
            Ok(()) => OperationOutcome::accepted(index, op),
            Err(err) => OperationOutcome::rejected(index, op, &err),
        }
    }

    /// Apply a whole script, reconcile and build the report.
    pub fn run(&self, script: &OperationScript) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Run {} started: {} operations", run_id, script.operations.len());

        let outcomes: Vec<OperationOutcome> = script
            .operations
            .iter()
            .enumerate()
            .map(|(index, operation)| self.apply(index, operation))
            .collect();

        let reconciliation = self.tracker.reconcile(&self.ledger);
        if !reconciliation.is_clean() {
            warn!("Run {} did not reconcile", run_id);
        }

        let payouts = self
            .ledger
            .transfer()
            .payouts()
            .into_iter()
            .map(|(principal, amount)| PayoutResponse { principal, amount })
            .collect();

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            config: self.ledger.config(),
            stats: self.ledger.stats(),
            balances: self.tracker.closing_balances(&self.ledger),
            events: self.ledger.events(),
            payouts,
            reconciled: reconciliation.is_clean(),
            reconciliation_error: reconciliation.error_summary(),
            outcomes,
        };

        info!(
            "Run {} finished: {} accepted, {} rejected, total held {}",
            run_id,
            report.outcomes.len() - report.rejected_count(),
            report.rejected_count(),
            format_amount(report.stats.total_held)
        );

        report
    }
}
