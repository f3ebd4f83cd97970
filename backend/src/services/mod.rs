//! # Services Module
//!
//! This module contains the services the backend runs around the hosted
//! ledger.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `LedgerManager` | Ledger lifecycle, script replay, run report |
//! | `BalanceTracker` | Event-log replay, reconciliation |
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SERVICES LAYER                            │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │                    LedgerManager                          │   │
//! │  │  • load_script()  • apply()  • run()                      │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                              │                                   │
//! │                              ▼                                   │
//! │                      ┌────────────┐                              │
//! │                      │  Balance   │                              │
//! │                      │  Tracker   │                              │
//! │                      │ Reconcile  │                              │
//! │                      └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod balance_tracker;
pub mod ledger_manager;

pub use balance_tracker::BalanceTracker;
pub use ledger_manager::{load_script, LedgerManager};
