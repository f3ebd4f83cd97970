//! # Unsolicited Value
//!
//! Value can only enter the ledger through [`Ledger::deposit`]. Anything
//! pushed at the ledger directly, with or without call data, is refused and
//! leaves every balance untouched. That keeps `total_held` explainable by
//! deposits and withdrawals alone.

use tracing::debug;

use crate::errors::LedgerError;
use crate::instructions::rejected;
use crate::state::{Ledger, Principal};
use crate::transfer::ValueTransfer;

impl<T: ValueTransfer> Ledger<T> {
    /// Plain value sent to the ledger. Always `Err(InvalidValue)`.
    pub fn receive(&self, from: &Principal, amount: u64) -> Result<(), LedgerError> {
        debug!(from = %from, amount, "Unsolicited value");
        Err(rejected("receive", from, LedgerError::InvalidValue))
    }

    /// Value sent along with call data the ledger does not understand.
    /// Always `Err(InvalidValue)`.
    pub fn fallback(
        &self,
        from: &Principal,
        amount: u64,
        calldata: &[u8],
    ) -> Result<(), LedgerError> {
        debug!(from = %from, amount, calldata_len = calldata.len(), "Unrecognised call");
        Err(rejected("fallback", from, LedgerError::InvalidValue))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Ledger, LedgerConfig, LedgerError, Principal};

    #[test]
    fn test_direct_value_rejected() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");
        ledger.deposit(&alice, 10).unwrap();
        let before = ledger.stats();

        assert_eq!(ledger.receive(&alice, 5), Err(LedgerError::InvalidValue));
        assert_eq!(ledger.receive(&Principal::from("bob"), 0), Err(LedgerError::InvalidValue));

        assert_eq!(ledger.balance_of(&alice), 10);
        assert_eq!(ledger.balance_of(&Principal::from("bob")), 0);
        assert_eq!(ledger.stats(), before);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_fallback_rejected() {
        let ledger = Ledger::new(LedgerConfig::new(100, 10));
        let alice = Principal::from("alice");

        assert_eq!(
            ledger.fallback(&alice, 3, &[0xde, 0xad, 0xbe, 0xef]),
            Err(LedgerError::InvalidValue)
        );
        assert_eq!(ledger.balance_of(&alice), 0);
        assert_eq!(ledger.stats().total_held, 0);
    }
}
