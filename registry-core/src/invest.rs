//! Investment accounting
//!
//! Converts incoming capital into token allocations, applies the platform
//! fee, and drives the FUNDRAISING → ACTIVE transition when the funding
//! target is reached.
//!
//! Rounding policy: token purchases floor-divide by `price_per_token` and
//! the difference between the requested amount and `tokens *
//! price_per_token` stays with the investor (only `actual_cost` is
//! transferred). The platform fee is deducted from `actual_cost` but not
//! credited to any ledger entity.

use crate::registry::PropertyRegistry;
use crate::types::{bps_of, AccountId, InvestorHolding, PropertyId, PropertyStatus};
use crate::{Error, Result};

impl PropertyRegistry {
    /// Invest `amount` into a property, returning tokens purchased.
    ///
    /// The investor pays `tokens * price_per_token` into the property
    /// vault; `raised_amount` grows by the amount net of the platform fee.
    /// Crossing `target_funding` flips the property to ACTIVE in the same
    /// transaction.
    pub fn invest(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        amount: u64,
    ) -> Result<u64> {
        let sequence = self.clock.advance();

        let property = self
            .properties
            .get(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;

        if !property.active {
            return Err(Error::PropertyNotActive(property_id));
        }
        if property.status != PropertyStatus::Fundraising {
            return Err(Error::InvestmentClosed(property_id));
        }
        if amount < self.config.minimum_investment {
            return Err(Error::MinimumInvestment(self.config.minimum_investment));
        }
        if sequence > property.funding_deadline {
            return Err(Error::InvestmentClosed(property_id));
        }
        if property.price_per_token == 0 {
            return Err(Error::InvalidAmount(
                "Property has zero token price".into(),
            ));
        }

        let tokens = amount / property.price_per_token;
        if tokens == 0 {
            return Err(Error::InvalidAmount(
                "Amount buys zero tokens at current price".into(),
            ));
        }
        let available = property.total_tokens - property.tokens_sold;
        if tokens > available {
            return Err(Error::InsufficientTokens(format!(
                "{} tokens requested, {} available",
                tokens, available
            )));
        }

        // The remainder of `amount` above actual_cost is never transferred.
        let actual_cost = tokens * property.price_per_token;
        let platform_fee = bps_of(actual_cost, self.config.platform_fee_bps);
        let net_investment = actual_cost - platform_fee;
        let vault = property.vault.clone();

        // First effect; atomic, so a balance failure aborts cleanly.
        self.bank.transfer(caller, &vault, actual_cost, sequence)?;

        let property = self
            .properties
            .get_mut(&property_id)
            .expect("property checked above");
        property.tokens_sold += tokens;
        property.raised_amount += net_investment;

        let first_purchase = !self
            .holdings
            .contains_key(&(caller.clone(), property_id));
        if first_purchase {
            property.investor_count += 1;
        }

        let funded = property.raised_amount >= property.target_funding;
        if funded {
            property.status = PropertyStatus::Active;
        }

        let holding = self
            .holdings
            .entry((caller.clone(), property_id))
            .or_insert_with(|| InvestorHolding {
                investor: caller.clone(),
                property_id,
                tokens_owned: 0,
                total_invested: 0,
                total_dividends_received: 0,
                last_dividend_claim_sequence: 0,
                first_investment_sequence: sequence,
            });
        holding.tokens_owned += tokens;
        holding.total_invested += net_investment;

        self.metrics.investments_total.inc();

        tracing::info!(
            investor = %caller,
            property_id,
            amount,
            tokens,
            actual_cost,
            platform_fee,
            net_investment,
            funded,
            "investment accepted"
        );

        Ok(tokens)
    }

    /// Secondary-market sale stub.
    ///
    /// Validates ownership and amount but performs no settlement; order
    /// matching lives outside this engine.
    pub fn sell_tokens(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        tokens: u64,
    ) -> Result<()> {
        self.clock.advance();

        self.property(property_id)?;
        let holding = self.holding(caller, property_id)?;

        if tokens == 0 {
            return Err(Error::InvalidAmount("Cannot sell zero tokens".into()));
        }
        if tokens > holding.tokens_owned {
            return Err(Error::InsufficientTokens(format!(
                "{} tokens requested, {} owned",
                tokens, holding.tokens_owned
            )));
        }

        tracing::warn!(
            investor = %caller,
            property_id,
            tokens,
            "sell order validated; secondary-market settlement not implemented"
        );
        Ok(())
    }

    /// Ownership share of a property in basis points
    pub fn ownership_bps(&self, investor: &AccountId, property_id: PropertyId) -> Result<u64> {
        let property = self.property(property_id)?;
        let holding = self.holding(investor, property_id)?;
        Ok(((holding.tokens_owned as u128 * 10_000) / property.total_tokens as u128) as u64)
    }
}
