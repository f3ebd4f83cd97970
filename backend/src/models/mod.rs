//! # Batch Models
//!
//! This module defines the input script and the output report of a batch
//! run against the hosted ledger.
//!
//! ## Organization
//!
//! - `requests.rs` - Operations read from the script
//! - `responses.rs` - Per-operation outcomes and the run report
//!
//! ## Serialization
//!
//! All models use Serde for JSON serialization/deserialization.
//! Field names are converted to camelCase, matching the rest of our tooling.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
