//! Income and expense accounting
//!
//! Rental income enters the per-property pending-distribution pool net of
//! the management fee; expenses drain the pool, clipped at zero.

use crate::config::MAX_MEMO_LEN;
use crate::registry::PropertyRegistry;
use crate::types::{bps_of, AccountId, PropertyId, PropertyStatus};
use crate::{Error, Result};

impl PropertyRegistry {
    /// Record gross rental income for a property, returning the net amount
    /// added to the pending-distribution pool.
    ///
    /// Manager-only, ACTIVE properties only. The gross amount moves into
    /// the property vault; the management fee share stays there but is not
    /// pooled for distribution.
    pub fn record_rental_income(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        gross_amount: u64,
    ) -> Result<u64> {
        let sequence = self.clock.advance();

        let property = self
            .properties
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;

        if caller != &property.manager {
            return Err(Error::Unauthorized(format!(
                "{} is not the manager of property {}",
                caller, property_id
            )));
        }
        if property.status != PropertyStatus::Active {
            return Err(Error::PropertyNotActive(property_id));
        }
        if gross_amount == 0 {
            return Err(Error::InvalidAmount(
                "Rental income must be positive".into(),
            ));
        }

        let management_fee = bps_of(gross_amount, self.config.management_fee_bps);
        let net_income = gross_amount - management_fee;
        let vault = property.vault.clone();

        self.bank.transfer(caller, &vault, gross_amount, sequence)?;

        // Past the transfer, nothing may fail: finances is created with
        // every property and never deleted.
        let finances = self
            .finances
            .get_mut(&property_id)
            .expect("finances checked above");
        finances.total_rental_income += net_income;
        finances.pending_distribution += net_income;

        self.metrics.income_events_total.inc();
        self.update_pending_gauge();

        tracing::info!(
            manager = %caller,
            property_id,
            gross_amount,
            management_fee,
            net_income,
            "rental income recorded"
        );

        Ok(net_income)
    }

    /// Record a property expense.
    ///
    /// Reduces the pending pool by `amount`, floored at zero; the portion
    /// beyond the pool is absorbed, not tracked as a deficit.
    pub fn record_expense(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        amount: u64,
        memo: &str,
    ) -> Result<()> {
        self.clock.advance();

        let property = self
            .properties
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;

        if caller != &property.manager {
            return Err(Error::Unauthorized(format!(
                "{} is not the manager of property {}",
                caller, property_id
            )));
        }
        if property.status != PropertyStatus::Active {
            return Err(Error::PropertyNotActive(property_id));
        }
        if amount == 0 {
            return Err(Error::InvalidAmount("Expense must be positive".into()));
        }
        if memo.chars().count() > MAX_MEMO_LEN {
            return Err(Error::InvalidAmount(format!(
                "Memo exceeds {} characters",
                MAX_MEMO_LEN
            )));
        }

        let finances = self
            .finances
            .get_mut(&property_id)
            .ok_or_else(|| Error::NotFound(format!("finances for property {}", property_id)))?;
        finances.total_expenses += amount;
        finances.pending_distribution = finances.pending_distribution.saturating_sub(amount);
        let pending = finances.pending_distribution;

        self.update_pending_gauge();

        tracing::info!(
            manager = %caller,
            property_id,
            amount,
            memo,
            pending,
            "expense recorded"
        );

        Ok(())
    }

    /// Update the occupancy rate for a property (manager-only)
    pub fn update_occupancy(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        occupancy_bps: u16,
    ) -> Result<()> {
        self.clock.advance();

        let property = self
            .properties
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;
        if caller != &property.manager {
            return Err(Error::Unauthorized(format!(
                "{} is not the manager of property {}",
                caller, property_id
            )));
        }
        if occupancy_bps > 10_000 {
            return Err(Error::InvalidPercentage(occupancy_bps as u32));
        }

        let finances = self
            .finances
            .get_mut(&property_id)
            .ok_or_else(|| Error::NotFound(format!("finances for property {}", property_id)))?;
        finances.occupancy_bps = occupancy_bps;

        tracing::debug!(property_id, occupancy_bps, "occupancy updated");
        Ok(())
    }
}
