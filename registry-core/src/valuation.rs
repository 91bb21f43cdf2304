//! Valuation tracking
//!
//! Manager-driven revaluation and the derived token-value query.
//! Appreciation is measured against the valuation at creation
//! (`original_value`) and overwritten on each update, never accumulated.

use crate::registry::PropertyRegistry;
use crate::types::{AccountId, PropertyId};
use crate::{Error, Result};

impl PropertyRegistry {
    /// Replace a property's valuation (manager-only, positive values only)
    pub fn update_valuation(
        &mut self,
        caller: &AccountId,
        property_id: PropertyId,
        new_value: u64,
    ) -> Result<()> {
        self.clock.advance();

        let property = self
            .properties
            .get_mut(&property_id)
            .ok_or_else(|| Error::NotFound(format!("property {}", property_id)))?;

        if caller != &property.manager {
            return Err(Error::Unauthorized(format!(
                "{} is not the manager of property {}",
                caller, property_id
            )));
        }
        if new_value == 0 {
            return Err(Error::InvalidAmount("Valuation must be positive".into()));
        }

        let appreciation = new_value as i128 - property.original_value as i128;
        property.total_value = new_value;

        if let Some(finances) = self.finances.get_mut(&property_id) {
            finances.appreciation = appreciation;
        }

        tracing::info!(
            manager = %caller,
            property_id,
            new_value,
            appreciation,
            "valuation updated"
        );

        Ok(())
    }

    /// Current per-token value of a property.
    ///
    /// Positive appreciation is added on top of the stored valuation when
    /// a finances record exists; depreciation is not subtracted.
    pub fn token_value(&self, property_id: PropertyId) -> Result<u64> {
        let property = self.property(property_id)?;
        match self.finances.get(&property_id) {
            Some(finances) => {
                let appreciation = finances.appreciation.max(0) as u128;
                Ok(((property.total_value as u128 + appreciation)
                    / property.total_tokens as u128) as u64)
            }
            None => Ok(property.total_value / property.total_tokens),
        }
    }
}
