//! # Reentrancy Guard
//!
//! The ledger's execution lock. A withdrawal enters the guard before it
//! looks at anything else; the returned [`GuardToken`] clears the lock when
//! it goes out of scope, so every exit path releases it:
//!
//! ```text
//! withdraw()
//!   enter() ──── lock already set? ──► Err(Reentrancy), nothing touched
//!      │
//!      ▼
//!   checks → effects → outbound transfer ──► (nested withdraw → Err(Reentrancy))
//!      │
//!      ▼
//!   token dropped ──► lock cleared (Ok, Err, rollback or panic)
//! ```

use std::cell::Cell;

use crate::errors::LedgerError;

/// Boolean execution lock with scoped release.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock, or fail with [`LedgerError::Reentrancy`] if it is
    /// already held.
    pub fn enter(&self) -> Result<GuardToken<'_>, LedgerError> {
        if self.entered.replace(true) {
            return Err(LedgerError::Reentrancy);
        }
        Ok(GuardToken { guard: self })
    }

    /// Whether a guarded section is currently running.
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Proof that the lock is held. Releases it on drop.
#[must_use = "the lock is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_release() {
        let guard = ReentrancyGuard::new();
        assert!(!guard.is_entered());

        {
            let _token = guard.enter().unwrap();
            assert!(guard.is_entered());
            assert_eq!(guard.enter().unwrap_err(), LedgerError::Reentrancy);
            // A failed nested enter must not clear the outer lock.
            assert!(guard.is_entered());
        }

        assert!(!guard.is_entered());
        assert!(guard.enter().is_ok());
    }

    #[test]
    fn test_released_on_early_return() {
        fn guarded(guard: &ReentrancyGuard) -> Result<(), LedgerError> {
            let _token = guard.enter()?;
            Err(LedgerError::InvalidValue)
        }

        let guard = ReentrancyGuard::new();
        assert_eq!(guarded(&guard), Err(LedgerError::InvalidValue));
        assert!(!guard.is_entered());
    }

    #[test]
    fn test_released_on_panic() {
        let guard = ReentrancyGuard::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _token = guard.enter().unwrap();
            panic!("outbound logic blew up");
        }));

        assert!(result.is_err());
        assert!(!guard.is_entered());
    }
}
