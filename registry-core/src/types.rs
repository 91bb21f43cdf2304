//! Core types for the property registry
//!
//! All types are designed for:
//! - Deterministic serialization (serde)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (unsigned integers in the smallest currency unit)
//!
//! Fee rates and percentages are expressed in basis points (1/100 of 1%)
//! with denominator 10,000.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis-point denominator (100% == 10,000 bps)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Property identifier (assigned sequentially, never reused)
pub type PropertyId = u64;

/// Distribution identifier (chosen by the caller, unique per property)
pub type DistributionId = u64;

/// Account identifier (investor, manager, or escrow account)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Apply a basis-point rate to an amount, truncating toward zero.
///
/// Uses a u128 intermediate so `amount * bps` cannot overflow.
pub fn bps_of(amount: u64, bps: u16) -> u64 {
    ((amount as u128 * bps as u128) / BPS_DENOMINATOR) as u64
}

/// Property lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PropertyStatus {
    /// Accepting investments toward the funding target
    Fundraising = 0,
    /// Funded and producing income
    Active = 1,
    /// Operations paused by the owner
    Suspended = 2,
    /// Underlying asset sold
    Sold = 3,
    /// Delisted, no further operations
    Closed = 4,
}

impl PropertyStatus {
    /// Decode from the raw status value used by the administrative override
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PropertyStatus::Fundraising),
            1 => Some(PropertyStatus::Active),
            2 => Some(PropertyStatus::Suspended),
            3 => Some(PropertyStatus::Sold),
            4 => Some(PropertyStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyStatus::Fundraising => "FUNDRAISING",
            PropertyStatus::Active => "ACTIVE",
            PropertyStatus::Suspended => "SUSPENDED",
            PropertyStatus::Sold => "SOLD",
            PropertyStatus::Closed => "CLOSED",
        };
        write!(f, "{}", s)
    }
}

/// Descriptive property fields, length-bounded at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Display name (max 64 chars)
    pub name: String,

    /// Free-form description (max 256 chars)
    pub description: String,

    /// Physical location (max 128 chars)
    pub location: String,

    /// Property class, e.g. "residential" (max 32 chars)
    pub property_type: String,
}

/// A tokenized property record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Sequential identifier
    pub id: PropertyId,

    /// Descriptive fields
    pub metadata: PropertyMetadata,

    /// Valuation at creation; fixed baseline for appreciation
    pub original_value: u64,

    /// Current total valuation
    pub total_value: u64,

    /// Total token supply (fixed at creation)
    pub total_tokens: u64,

    /// Tokens sold to investors so far
    pub tokens_sold: u64,

    /// Price per token, computed once at creation (integer division)
    pub price_per_token: u64,

    /// Funding target that flips the property to ACTIVE
    pub target_funding: u64,

    /// Net capital raised so far
    pub raised_amount: u64,

    /// Lifecycle status
    pub status: PropertyStatus,

    /// Sequence height at creation
    pub created_at_sequence: u64,

    /// Sequence height after which investments are rejected
    pub funding_deadline: u64,

    /// Manager account (records income, runs distributions)
    pub manager: AccountId,

    /// Estimated annual rent (informational)
    pub annual_rent_estimate: u64,

    /// Number of distinct investors
    pub investor_count: u64,

    /// Escrow account holding raised capital and pooled income
    pub vault: AccountId,

    /// Listing flag, checked on investment
    pub active: bool,

    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
}

/// Per-property income and expense accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFinances {
    /// Property this record belongs to
    pub property_id: PropertyId,

    /// Lifetime rental income, net of management fees
    pub total_rental_income: u64,

    /// Lifetime expenses
    pub total_expenses: u64,

    /// Sequence height of the most recent distribution
    pub last_distribution_sequence: u64,

    /// Income awaiting distribution; never negative (expenses clip at zero)
    pub pending_distribution: u64,

    /// Lifetime amount recorded as distributed
    pub total_distributed: u64,

    /// Signed revaluation delta from `original_value`, overwritten per update
    pub appreciation: i128,

    /// Occupancy rate in basis points
    pub occupancy_bps: u16,
}

impl PropertyFinances {
    /// Empty finances record for a newly created property
    pub fn new(property_id: PropertyId) -> Self {
        Self {
            property_id,
            total_rental_income: 0,
            total_expenses: 0,
            last_distribution_sequence: 0,
            pending_distribution: 0,
            total_distributed: 0,
            appreciation: 0,
            occupancy_bps: 0,
        }
    }
}

/// An investor's position in one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorHolding {
    /// Investor account
    pub investor: AccountId,

    /// Property invested in
    pub property_id: PropertyId,

    /// Tokens currently owned
    pub tokens_owned: u64,

    /// Cumulative net investment
    pub total_invested: u64,

    /// Cumulative dividends received
    pub total_dividends_received: u64,

    /// Sequence height of the most recent claim (0 if never claimed)
    pub last_dividend_claim_sequence: u64,

    /// Sequence height of the first purchase
    pub first_investment_sequence: u64,
}

/// Immutable snapshot of one income distribution round
///
/// Only `claimed_amount` changes after creation; it accumulates the
/// dividends actually paid out and can fall short of `total_income` by the
/// per-token truncation remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeDistribution {
    /// Property the distribution belongs to
    pub property_id: PropertyId,

    /// Caller-chosen distribution identifier
    pub distribution_id: DistributionId,

    /// Full pending pool captured by this round
    pub total_income: u64,

    /// Sequence height at distribution time
    pub sequence: u64,

    /// Income per token, frozen at distribution time (integer division)
    pub income_per_token: u64,

    /// Running total of dividends claimed so far
    pub claimed_amount: u64,

    /// Circulating tokens at snapshot time
    pub total_eligible_tokens: u64,

    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
}

/// Aggregate platform statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    /// Number of properties ever created
    pub property_count: u64,

    /// Net capital raised across all properties
    pub total_raised: u64,

    /// Lifetime distributed total across all properties
    pub total_distributed: u64,

    /// Sum of pending distribution pools
    pub total_pending: u64,
}
