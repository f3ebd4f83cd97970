//! # Withdraw Instruction
//!
//! Releases value from the caller's account back to the caller.
//!
//! ## Checks → Effects → Interactions
//!
//! ```text
//! 1. enter guard          lock held?         → Reentrancy
//! 2. checks               balance < amount   → InsufficientBalance
//!                         amount > per-tx    → WithdrawLimitExceeded
//!                         amount == 0        → InvalidValue
//! 3. effects              balance  -= amount
//!                         total    -= amount
//!                         withdraws += 1
//! 4. interaction          rail.send(caller, amount)
//!                           └─ Err → revert 3. entirely → TransferFailed
//! 5. emit                 Withdrawn(caller, amount)
//! 6. guard token dropped  lock cleared
//! ```
//!
//! The debit lands before the payout, so anything the payout runs sees the
//! reduced balance. A nested withdrawal is refused by the guard outright.
//!
//! The check order only matters when several conditions fail at once; it
//! decides which error is reported.

use tracing::debug;

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::instructions::rejected;
use crate::state::{Ledger, Principal};
use crate::transfer::ValueTransfer;

impl<T: ValueTransfer> Ledger<T> {
    /// # withdraw
    ///
    /// Debit `amount` from `caller` and send it to `caller`.
    ///
    /// ## Returns
    ///
    /// * `Ok(())` - Payout delivered, `Withdrawn` emitted
    /// * `Err(LedgerError::Reentrancy)` - Another withdrawal is in progress
    /// * `Err(LedgerError::InsufficientBalance)` - Balance below `amount`
    /// * `Err(LedgerError::WithdrawLimitExceeded)` - `amount > cap_per_withdrawal`
    /// * `Err(LedgerError::InvalidValue)` - `amount` is zero
    /// * `Err(LedgerError::TransferFailed)` - The rail refused; nothing changed
    pub fn withdraw(&self, caller: &Principal, amount: u64) -> Result<(), LedgerError> {
        let _lock = self
            .guard
            .enter()
            .map_err(|err| rejected("withdraw", caller, err))?;

        // ===================================
        // STEP 1: Checks
        // ===================================

        let available = self.balance_of(caller);
        if available < amount {
            return Err(rejected(
                "withdraw",
                caller,
                LedgerError::InsufficientBalance {
                    available,
                    requested: amount,
                },
            ));
        }

        let limit = self.config().cap_per_withdrawal;
        if amount > limit {
            return Err(rejected(
                "withdraw",
                caller,
                LedgerError::WithdrawLimitExceeded {
                    requested: amount,
                    limit,
                },
            ));
        }

        if amount == 0 {
            return Err(rejected("withdraw", caller, LedgerError::InvalidValue));
        }

        // ===================================
        // STEP 2: Effects
        // ===================================

        let checkpoint = self.checkpoint();
        {
            let mut state = self.state.borrow_mut();
            // Written from the checked balance so the debit and total always move together.
            state.balances.insert(caller.clone(), available - amount);
            state.total_held -= amount;
            state.withdraw_count += 1;
        }

        debug!(
            caller = %caller,
            amount,
            remaining = available - amount,
            "Debit applied, sending payout"
        );

        // ===================================
        // STEP 3: Interaction
        // ===================================

        if let Err(err) = self.transfer.send(self, caller, amount) {
            self.rollback(checkpoint);
            debug!(caller = %caller, amount, "Payout refused ({}), debit reverted", err);
            return Err(rejected(
                "withdraw",
                caller,
                LedgerError::TransferFailed {
                    to: caller.clone(),
                    amount,
                },
            ));
        }

        // ===================================
        // STEP 4: Emit Event
        // ===================================

        self.emit(LedgerEvent::Withdrawn {
            principal: caller.clone(),
            amount,
        });

        Ok(())
    }
}
