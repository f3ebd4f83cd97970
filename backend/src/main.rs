//! # Custodial Ledger Backend
//!
//! This is the main entry point for the backend process that hosts a
//! custodial ledger. It:
//!
//! - Loads the ledger's caps from the environment
//! - Replays an operation script against a fresh ledger
//! - Reconciles balances against the event log
//! - Prints a JSON run report on stdout
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BACKEND PROCESS                           │
//! │                                                                  │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌──────────────────┐  │
//! │  │  AppConfig  │──►│  LedgerManager   │──►│  BalanceTracker  │  │
//! │  │  (env/.env) │   │  script replay   │   │  reconciliation  │  │
//! │  └─────────────┘   └──────────────────┘   └──────────────────┘  │
//! │                              │                                   │
//! │                    ┌─────────┴─────────┐                         │
//! │                    │  custodial ledger │                         │
//! │                    │  + PayoutBook     │                         │
//! │                    └───────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Copy `.env.example` to `.env` and configure
//! 2. Write an operation script (see `scripts/demo.json`)
//! 3. Run: `cargo run --bin ledger-backend`
//!
//! ## Exit Status
//!
//! - `0`: script replayed and ledger reconciled
//! - `1`: configuration/script error, or reconciliation failed

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod services;
mod utils;

use config::AppConfig;
use services::{load_script, LedgerManager};

/// Main entry point for the backend.
///
/// This function:
/// 1. Loads `.env` and initializes logging
/// 2. Loads configuration from environment
/// 3. Loads the operation script
/// 4. Runs the script against a fresh ledger
/// 5. Prints the report
fn main() -> ExitCode {
    // =========================================
    // STEP 1: Load .env, Initialize Logging
    // =========================================
    // Logs go to stderr so stdout stays clean JSON.
    let filter = load_environment(None);
    let init = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = init {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    info!("🚀 Starting Custodial Ledger Backend");

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("Ledger did not reconcile");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load `.env` into the process environment, then build the log filter.
///
/// `RUST_LOG` may come from `.env`, so the file is read first. Reads `.env`
/// from the working directory unless `dotenv_path` names another file.
fn load_environment(dotenv_path: Option<&Path>) -> EnvFilter {
    // It's okay if .env doesn't exist
    match dotenv_path {
        Some(path) => dotenvy::from_path(path).ok(),
        None => dotenvy::dotenv().ok().map(|_| ()),
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Run one batch. Returns whether the ledger reconciled.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    // =========================================
    // STEP 2: Load Configuration
    // =========================================
    let config = AppConfig::from_env()?;

    info!("📋 Configuration loaded");
    info!("   Cap total: {}", utils::format_amount(config.ledger.cap_total));
    info!(
        "   Cap per withdrawal: {}",
        utils::format_amount(config.ledger.cap_per_withdrawal)
    );
    info!("   Script: {}", config.script_path);

    // =========================================
    // STEP 3: Load Script
    // =========================================
    let script = load_script(&config.script_path)?;

    info!("📦 Script loaded: {} operations", script.operations.len());

    // =========================================
    // STEP 4: Run
    // =========================================
    let manager = LedgerManager::new(&config);
    let report = manager.run(&script);

    // =========================================
    // STEP 5: Print Report
    // =========================================
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(report.reconciled)
}
