//! Configuration for the property registry

use serde::{Deserialize, Serialize};

/// Maximum platform fee the owner may configure (10%)
pub const MAX_PLATFORM_FEE_BPS: u16 = 1_000;

/// Maximum management fee the owner may configure (5%)
pub const MAX_MANAGEMENT_FEE_BPS: u16 = 500;

/// Maximum length of a property name
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of a property description
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Maximum length of a property location
pub const MAX_LOCATION_LEN: usize = 128;

/// Maximum length of a property type tag
pub const MAX_PROPERTY_TYPE_LEN: usize = 32;

/// Maximum length of an expense memo
pub const MAX_MEMO_LEN: usize = 128;

/// Platform configuration
///
/// Fee rates are process-wide state, owner-mutable at runtime through the
/// registry (no hidden statics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform fee on each investment, in basis points
    pub platform_fee_bps: u16,

    /// Management fee on gross rental income, in basis points
    pub management_fee_bps: u16,

    /// Minimum accepted investment, in smallest currency units
    pub minimum_investment: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            platform_fee_bps: 250,    // 2.5%
            management_fee_bps: 300,  // 3%
            minimum_investment: 100_000,
        }
    }
}

impl PlatformConfig {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PlatformConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = PlatformConfig::default();

        if let Ok(bps) = std::env::var("REGISTRY_PLATFORM_FEE_BPS") {
            config.platform_fee_bps = bps
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad platform fee: {}", e)))?;
        }

        if let Ok(bps) = std::env::var("REGISTRY_MANAGEMENT_FEE_BPS") {
            config.management_fee_bps = bps
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad management fee: {}", e)))?;
        }

        if let Ok(min) = std::env::var("REGISTRY_MINIMUM_INVESTMENT") {
            config.minimum_investment = min
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad minimum investment: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check fee rates against their caps
    pub fn validate(&self) -> crate::Result<()> {
        if self.platform_fee_bps > MAX_PLATFORM_FEE_BPS {
            return Err(crate::Error::Config(format!(
                "Platform fee {} bps exceeds cap {}",
                self.platform_fee_bps, MAX_PLATFORM_FEE_BPS
            )));
        }
        if self.management_fee_bps > MAX_MANAGEMENT_FEE_BPS {
            return Err(crate::Error::Config(format!(
                "Management fee {} bps exceeds cap {}",
                self.management_fee_bps, MAX_MANAGEMENT_FEE_BPS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlatformConfig::default();
        assert_eq!(config.platform_fee_bps, 250);
        assert_eq!(config.management_fee_bps, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_excessive_fees() {
        let config = PlatformConfig {
            platform_fee_bps: 1_001,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlatformConfig {
            management_fee_bps: 501,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let toml_str = r#"
            platform_fee_bps = 100
            management_fee_bps = 200
            minimum_investment = 50000
        "#;
        let config: PlatformConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.platform_fee_bps, 100);
        assert_eq!(config.minimum_investment, 50_000);
    }
}
