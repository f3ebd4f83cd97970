//! # Report Response Models
//!
//! Structures written out after a batch run. Every operation gets an
//! outcome; the run as a whole gets a report with the final ledger state.

use chrono::{DateTime, Utc};
use custodial_ledger::{LedgerConfig, LedgerError, LedgerEvent, LedgerStats, Principal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error information for a rejected operation.
///
/// ## Example JSON
///
/// ```json
/// {
///     "code": 6020,
///     "kind": "INSUFFICIENT_BALANCE",
///     "message": "Insufficient balance: available 5, requested 6"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    /// Numeric ledger error code.
    pub code: u32,

    /// Machine-readable error kind.
    pub kind: String,

    /// Human-readable message with amounts and limits.
    pub message: String,
}

impl From<&LedgerError> for OperationError {
    fn from(err: &LedgerError) -> Self {
        let kind = match err {
            LedgerError::InvalidValue => "INVALID_VALUE",
            LedgerError::BankCapExceeded { .. } => "BANK_CAP_EXCEEDED",
            LedgerError::WithdrawLimitExceeded { .. } => "WITHDRAW_LIMIT_EXCEEDED",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::TransferFailed { .. } => "TRANSFER_FAILED",
            LedgerError::Reentrancy => "REENTRANCY",
        };

        Self {
            code: err.code(),
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}

/// What happened to one scripted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    /// Position in the script (0-based).
    pub index: usize,

    /// Operation name (`deposit`, `withdraw`, ...).
    pub op: String,

    /// Whether the ledger accepted the call.
    pub accepted: bool,

    /// Returned value for reads (balance), `None` otherwise.
    pub value: Option<u64>,

    /// Returned totals for `stats`, `None` otherwise.
    pub stats: Option<LedgerStats>,

    /// Numeric ledger error code of a rejection (null on success).
    pub error_code: Option<u32>,

    /// Rejection details (null on success).
    pub error: Option<OperationError>,
}

impl OperationOutcome {
    pub fn accepted(index: usize, op: &str) -> Self {
        Self {
            index,
            op: op.to_string(),
            accepted: true,
            value: None,
            stats: None,
            error_code: None,
            error: None,
        }
    }

    pub fn rejected(index: usize, op: &str, err: &LedgerError) -> Self {
        Self {
            error_code: Some(err.code()),
            error: Some(err.into()),
            accepted: false,
            ..Self::accepted(index, op)
        }
    }
}

/// One principal's payout total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutResponse {
    pub principal: Principal,
    pub amount: u64,
}

/// One principal's closing balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub principal: Principal,
    pub balance: u64,
}

/// Report for a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished (after reconciliation).
    pub finished_at: DateTime<Utc>,

    /// Ceilings the ledger ran with.
    pub config: LedgerConfig,

    /// One entry per scripted operation, in order.
    pub outcomes: Vec<OperationOutcome>,

    /// Ledger totals at the end of the run.
    pub stats: LedgerStats,

    /// Closing balance of every principal seen.
    pub balances: Vec<BalanceResponse>,

    /// Committed events, oldest first.
    pub events: Vec<LedgerEvent>,

    /// Everything the payout rail delivered.
    pub payouts: Vec<PayoutResponse>,

    /// Whether totals matched balances and stayed within the cap.
    pub reconciled: bool,

    /// Reconciliation failure, if any.
    pub reconciliation_error: Option<String>,
}

impl RunReport {
    /// Number of operations the ledger rejected.
    pub fn rejected_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.accepted).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_outcome_has_no_error_code() {
        let json = serde_json::to_value(OperationOutcome::accepted(0, "deposit")).unwrap();

        assert_eq!(json["accepted"], true);
        assert!(json["errorCode"].is_null());
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_operation_error_from_ledger_error() {
        let err = LedgerError::WithdrawLimitExceeded {
            requested: 15,
            limit: 10,
        };
        let api: OperationError = (&err).into();

        assert_eq!(api.code, 6011);
        assert_eq!(api.kind, "WITHDRAW_LIMIT_EXCEEDED");
        assert_eq!(api.message, "Withdraw limit exceeded: requested 15, limit 10");
    }

    #[test]
    fn test_rejected_outcome_serializes_camel_case() {
        let outcome = OperationOutcome::rejected(3, "withdraw", &LedgerError::InvalidValue);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["index"], 3);
        assert_eq!(json["accepted"], false);
        assert_eq!(json["errorCode"], 6000);
        assert_eq!(json["error"]["kind"], "INVALID_VALUE");
        assert!(json["value"].is_null());
    }
}
