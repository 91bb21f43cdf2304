//! Error types for the property registry

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors
///
/// Every public operation validates all of its preconditions before the
/// first mutating write, so a returned error always means no state changed.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller is not the registry owner
    #[error("Operation restricted to registry owner")]
    OwnerOnly,

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid amount or malformed input
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Account balance too low for a transfer
    #[error("Insufficient balance: account {account} holds {available}, needs {required}")]
    InsufficientBalance {
        /// Account being debited
        account: String,
        /// Current balance
        available: u64,
        /// Amount requested
        required: u64,
    },

    /// Property is not in a state that accepts this operation
    #[error("Property {0} is not active")]
    PropertyNotActive(u64),

    /// Caller is not authorized for this operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Record already exists at this key
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Fundraising window is closed
    #[error("Investment closed for property {0}")]
    InvestmentClosed(u64),

    /// Investment below the configured minimum
    #[error("Amount below minimum investment of {0}")]
    MinimumInvestment(u64),

    /// Rate or percentage outside its allowed range
    #[error("Invalid percentage: {0} bps")]
    InvalidPercentage(u32),

    /// Not enough tokens to satisfy the request
    #[error("Insufficient tokens: {0}")]
    InsufficientTokens(String),

    /// Pending distribution pool is empty
    #[error("No income to distribute for property {0}")]
    NoIncomeToDistribute(u64),

    /// Distribution already claimed by this investor
    #[error("Distribution {distribution_id} of property {property_id} already claimed by {investor}")]
    AlreadyClaimed {
        /// Claiming investor
        investor: String,
        /// Property the distribution belongs to
        property_id: u64,
        /// Distribution identifier
        distribution_id: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
