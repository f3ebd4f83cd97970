//! # Events Module
//!
//! Events the ledger emits after a committed deposit or withdrawal.
//!
//! Each event names the principal and the amount moved, which is enough to
//! rebuild the full deposit/withdraw history of every account from the log
//! alone.
//!
//! ## Event Flow:
//! ```text
//! deposit / withdraw commits
//!        ↓
//! LedgerEvent appended to the ledger's event log
//!        ↓
//! tracing record at INFO (principal, amount)
//!        ↓
//! Off-chain auditor replays the log
//! ```
//!
//! Events of a call that is rolled back (a failed outbound transfer) are
//! dropped with the rollback, so the log only ever shows committed history.

use serde::{Deserialize, Serialize};

use crate::state::Principal;

/// # LedgerEvent
///
/// Serialized with an `event` tag:
///
/// ```text
/// {"event":"Deposited","principal":"alice","amount":100}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// Value was accepted into `principal`'s balance.
    Deposited {
        /// The depositor
        principal: Principal,
        /// Amount credited
        amount: u64,
    },

    /// Value was released back to `principal`.
    Withdrawn {
        /// The withdrawing principal (also the recipient)
        principal: Principal,
        /// Amount sent out
        amount: u64,
    },
}

impl LedgerEvent {
    /// The principal this event is indexed by.
    pub fn principal(&self) -> &Principal {
        match self {
            LedgerEvent::Deposited { principal, .. } => principal,
            LedgerEvent::Withdrawn { principal, .. } => principal,
        }
    }

    /// The amount moved.
    pub fn amount(&self) -> u64 {
        match self {
            LedgerEvent::Deposited { amount, .. } => *amount,
            LedgerEvent::Withdrawn { amount, .. } => *amount,
        }
    }

    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Deposited { .. } => "Deposited",
            LedgerEvent::Withdrawn { .. } => "Withdrawn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LedgerEvent::Deposited {
            principal: Principal::from("alice"),
            amount: 100,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"Deposited","principal":"alice","amount":100}"#);
    }

    #[test]
    fn test_accessors() {
        let event = LedgerEvent::Withdrawn {
            principal: Principal::from("bob"),
            amount: 9,
        };
        assert_eq!(event.principal().as_str(), "bob");
        assert_eq!(event.amount(), 9);
        assert_eq!(event.name(), "Withdrawn");
    }
}
