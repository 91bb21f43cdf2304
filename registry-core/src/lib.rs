//! Fairbrick Registry Core
//!
//! Fractional real-estate investment and income-distribution accounting
//! engine: tokenizes properties, accepts capital against those tokens, and
//! redistributes rental income to token holders proportionally to holdings.
//!
//! # Architecture
//!
//! - **Single Writer**: one sequential transaction at a time; the sequence
//!   clock defines the total order
//! - **All-or-nothing**: every precondition is checked before the first
//!   mutating write, so failures leave no partial state
//! - **Snapshot Distributions**: income-per-token is frozen per round;
//!   claims settle exactly once per (investor, round)
//!
//! # Invariants
//!
//! - `tokens_sold <= total_tokens` for every property
//! - Σ(tokens_owned) over holders == tokens_sold per property
//! - `pending_distribution >= 0` (expenses clip at the pool floor)
//! - No dividend is paid twice for the same (investor, round)

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod bank;
pub mod config;
pub mod distribution;
pub mod error;
pub mod income;
pub mod invest;
pub mod metrics;
pub mod registry;
pub mod types;
pub mod valuation;

// Re-exports
pub use bank::{Bank, SequenceClock, TransferRecord};
pub use config::PlatformConfig;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use registry::PropertyRegistry;
pub use types::{
    AccountId, DistributionId, IncomeDistribution, InvestorHolding, PlatformStats, Property,
    PropertyFinances, PropertyId, PropertyMetadata, PropertyStatus,
};
