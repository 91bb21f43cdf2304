//! Central registry engine
//!
//! `PropertyRegistry` owns every table of the accounting engine and the
//! ledger primitives, and exposes the public operations as methods. It is
//! a plain `&mut self` state machine: the surrounding process serializes
//! callers, so each operation runs as one logically instantaneous
//! transaction. All preconditions are checked before the first mutating
//! write, so a failed operation leaves no visible state change.

use crate::bank::{Bank, SequenceClock};
use crate::config::{
    PlatformConfig, MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_MANAGEMENT_FEE_BPS, MAX_NAME_LEN,
    MAX_PLATFORM_FEE_BPS, MAX_PROPERTY_TYPE_LEN,
};
use crate::metrics::Metrics;
use crate::types::{
    AccountId, DistributionId, IncomeDistribution, InvestorHolding, PlatformStats, Property,
    PropertyFinances, PropertyId, PropertyMetadata, PropertyStatus,
};
use crate::{Error, Result};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// The investment and income-distribution accounting engine
pub struct PropertyRegistry {
    /// Registry owner (may create properties and change platform settings)
    pub(crate) owner: AccountId,

    /// Platform configuration (fee rates, minimum investment)
    pub(crate) config: PlatformConfig,

    /// Sequence clock defining the total order of transactions
    pub(crate) clock: SequenceClock,

    /// Value-transfer collaborator
    pub(crate) bank: Bank,

    /// Prometheus metrics
    pub(crate) metrics: Metrics,

    /// Properties by id
    pub(crate) properties: BTreeMap<PropertyId, Property>,

    /// Finances by property id
    pub(crate) finances: BTreeMap<PropertyId, PropertyFinances>,

    /// Holdings by (investor, property)
    pub(crate) holdings: BTreeMap<(AccountId, PropertyId), InvestorHolding>,

    /// Distribution rounds by (property, distribution id)
    pub(crate) distributions: BTreeMap<(PropertyId, DistributionId), IncomeDistribution>,

    /// Claim flags: presence means "already claimed"
    pub(crate) claims: BTreeSet<(AccountId, PropertyId, DistributionId)>,

    /// Next property id to assign
    pub(crate) next_property_id: PropertyId,
}

impl PropertyRegistry {
    /// Create a registry owned by `owner`
    pub fn new(owner: AccountId, config: PlatformConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner,
            config,
            clock: SequenceClock::new(),
            bank: Bank::new(),
            metrics: Metrics::default(),
            properties: BTreeMap::new(),
            finances: BTreeMap::new(),
            holdings: BTreeMap::new(),
            distributions: BTreeMap::new(),
            claims: BTreeSet::new(),
            next_property_id: 1,
        })
    }

    /// Register a new tokenized property
    ///
    /// Owner-only. Computes `price_per_token = total_value / total_tokens`
    /// once (integer division; the remainder is unrecoverable rounding
    /// loss) and opens the property in FUNDRAISING status with an empty
    /// finances record.
    #[allow(clippy::too_many_arguments)]
    pub fn create_property(
        &mut self,
        caller: &AccountId,
        metadata: PropertyMetadata,
        total_value: u64,
        total_tokens: u64,
        target_funding: u64,
        funding_deadline: u64,
        manager: AccountId,
        annual_rent_estimate: u64,
    ) -> Result<PropertyId> {
        let sequence = self.clock.advance();

        if caller != &self.owner {
            return Err(Error::OwnerOnly);
        }
        if total_value == 0 {
            return Err(Error::InvalidAmount("Total value must be positive".into()));
        }
        if total_tokens == 0 {
            return Err(Error::InvalidAmount("Total tokens must be positive".into()));
        }
        if target_funding == 0 {
            return Err(Error::InvalidAmount(
                "Target funding must be positive".into(),
            ));
        }
        if target_funding > total_value {
            return Err(Error::InvalidAmount(
                "Target funding exceeds total value".into(),
            ));
        }
        if funding_deadline <= sequence {
            return Err(Error::InvalidAmount(
                "Funding deadline must be in the future".into(),
            ));
        }
        validate_metadata(&metadata)?;

        let id = self.next_property_id;
        let property = Property {
            id,
            metadata,
            original_value: total_value,
            total_value,
            total_tokens,
            tokens_sold: 0,
            price_per_token: total_value / total_tokens,
            target_funding,
            raised_amount: 0,
            status: PropertyStatus::Fundraising,
            created_at_sequence: sequence,
            funding_deadline,
            manager,
            annual_rent_estimate,
            investor_count: 0,
            vault: AccountId::new(format!("vault:property-{}", id)),
            active: true,
            created_at: Utc::now(),
        };

        tracing::info!(
            property_id = id,
            name = %property.metadata.name,
            total_value,
            total_tokens,
            price_per_token = property.price_per_token,
            target_funding,
            funding_deadline,
            "property created"
        );

        self.properties.insert(id, property);
        self.finances.insert(id, PropertyFinances::new(id));
        self.next_property_id += 1;
        self.metrics.properties_total.inc();

        Ok(id)
    }

    /// Update the platform fee rate (owner-only, capped at 1000 bps)
    pub fn set_platform_fee_bps(&mut self, caller: &AccountId, bps: u16) -> Result<()> {
        self.clock.advance();
        if caller != &self.owner {
            return Err(Error::OwnerOnly);
        }
        if bps > MAX_PLATFORM_FEE_BPS {
            return Err(Error::InvalidPercentage(bps as u32));
        }
        tracing::info!(old = self.config.platform_fee_bps, new = bps, "platform fee updated");
        self.config.platform_fee_bps = bps;
        Ok(())
    }

    /// Update the management fee rate (owner-only, capped at 500 bps)
    pub fn set_management_fee_bps(&mut self, caller: &AccountId, bps: u16) -> Result<()> {
        self.clock.advance();
        if caller != &self.owner {
            return Err(Error::OwnerOnly);
        }
        if bps > MAX_MANAGEMENT_FEE_BPS {
            return Err(Error::InvalidPercentage(bps as u32));
        }
        tracing::info!(old = self.config.management_fee_bps, new = bps, "management fee updated");
        self.config.management_fee_bps = bps;
        Ok(())
    }

    /// Emergency status override (owner-only)
    ///
    /// Writes the status directly, bypassing all lifecycle transition
    /// logic. This is an escape hatch, not a modeled transition.
    pub fn override_status(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        status: PropertyStatus,
    ) -> Result<()> {
        self.clock.advance();
        if caller != &self.owner {
            return Err(Error::OwnerOnly);
        }
        let property = self
            .properties
            .get_mut(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;

        tracing::warn!(
            property_id,
            old = %property.status,
            new = %status,
            "administrative status override"
        );
        property.status = status;
        Ok(())
    }

    // ---- Read-only queries ----

    /// Fetch a property record
    pub fn property(&self, property_id: PropertyId) -> Result<&Property> {
        self.properties
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))
    }

    /// Fetch a property's finances record
    pub fn finances(&self, property_id: PropertyId) -> Result<&PropertyFinances> {
        self.finances
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("finances for property {}", property_id)))
    }

    /// Fetch an investor's holding for a property
    pub fn holding(
        &self,
        investor: &AccountId,
        property_id: PropertyId,
    ) -> Result<&InvestorHolding> {
        self.holdings
            .get(&(investor.clone(), property_id))
            .ok_or_else(|| {
                Error::NotFound(format!("holding of {} in property {}", investor, property_id))
            })
    }

    /// Fetch a distribution record
    pub fn distribution(
        &self,
        property_id: PropertyId,
        distribution_id: DistributionId,
    ) -> Result<&IncomeDistribution> {
        self.distributions
            .get(&(property_id, distribution_id))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "distribution {} of property {}",
                    distribution_id, property_id
                ))
            })
    }

    /// Total number of properties ever created
    pub fn property_count(&self) -> u64 {
        self.properties.len() as u64
    }

    /// Aggregate platform statistics
    pub fn platform_stats(&self) -> PlatformStats {
        let mut stats = PlatformStats {
            property_count: self.properties.len() as u64,
            total_raised: 0,
            total_distributed: 0,
            total_pending: 0,
        };
        for property in self.properties.values() {
            stats.total_raised += property.raised_amount;
        }
        for finances in self.finances.values() {
            stats.total_distributed += finances.total_distributed;
            stats.total_pending += finances.pending_distribution;
        }
        stats
    }

    /// Current sequence height
    pub fn height(&self) -> u64 {
        self.clock.height()
    }

    /// Current platform configuration
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Registry owner
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Prometheus metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Value-transfer collaborator (read access)
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Value-transfer collaborator (for funding accounts externally)
    pub fn bank_mut(&mut self) -> &mut Bank {
        &mut self.bank
    }

    // ---- Crate-internal helpers ----

    /// Refresh the pending-pool gauge after income, expense, or distribution
    pub(crate) fn update_pending_gauge(&self) {
        let total: u64 = self
            .finances
            .values()
            .map(|f| f.pending_distribution)
            .sum();
        self.metrics.pending_pool_units.set(total.min(i64::MAX as u64) as i64);
    }
}

fn validate_metadata(metadata: &PropertyMetadata) -> Result<()> {
    if metadata.name.is_empty() || metadata.name.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidAmount(format!(
            "Name must be 1..={} characters",
            MAX_NAME_LEN
        )));
    }
    if metadata.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidAmount(format!(
            "Description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    if metadata.location.chars().count() > MAX_LOCATION_LEN {
        return Err(Error::InvalidAmount(format!(
            "Location exceeds {} characters",
            MAX_LOCATION_LEN
        )));
    }
    if metadata.property_type.chars().count() > MAX_PROPERTY_TYPE_LEN {
        return Err(Error::InvalidAmount(format!(
            "Property type exceeds {} characters",
            MAX_PROPERTY_TYPE_LEN
        )));
    }
    Ok(())
}
