//! Ledger configuration

use serde::Deserialize;

use core_kernel::{Currency, Principal};

/// Ledger configuration, fixed at deployment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Identity allowed to add policies, assign reviewers and pay claims
    pub administrator: Principal,
    /// Currency every ledger amount must be denominated in
    pub currency: Currency,
    /// Maximum claim description length, in characters
    pub max_description_len: usize,
    /// Maximum evidence records per claim
    pub max_evidence_per_claim: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            administrator: Principal::new("ledger-admin"),
            currency: Currency::USD,
            max_description_len: 500,
            max_evidence_per_claim: 32,
        }
    }
}

impl LedgerConfig {
    /// Creates a configuration with the given administrator and defaults otherwise
    pub fn new(administrator: impl Into<Principal>) -> Self {
        Self {
            administrator: administrator.into(),
            ..Default::default()
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Loads configuration from `CLAIMS_*` environment variables
    ///
    /// Unset variables fall back to [`LedgerConfig::default`].
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS"))
            .build()?
            .try_deserialize()
    }

    pub fn is_administrator(&self, principal: &Principal) -> bool {
        &self.administrator == principal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.max_description_len, 500);
        assert_eq!(config.max_evidence_per_claim, 32);
    }

    #[test]
    fn test_is_administrator() {
        let config = LedgerConfig::new("deployer");
        assert!(config.is_administrator(&Principal::new("deployer")));
        assert!(!config.is_administrator(&Principal::new("someone-else")));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: LedgerConfig = config::Config::builder()
            .set_override("administrator", "ops")
            .unwrap()
            .set_override("currency", "EUR")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.administrator, Principal::new("ops"));
        assert_eq!(config.currency, Currency::EUR);
        assert_eq!(config.max_evidence_per_claim, 32);
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        // the only test in this binary touching CLAIMS_* variables
        let vars = [
            ("CLAIMS_ADMINISTRATOR", "ops"),
            ("CLAIMS_CURRENCY", "EUR"),
            ("CLAIMS_MAX_DESCRIPTION_LEN", "77"),
            ("CLAIMS_MAX_EVIDENCE_PER_CLAIM", "5"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let config = LedgerConfig::from_env();
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.administrator, Principal::new("ops"));
        assert_eq!(config.currency, Currency::EUR);
        assert_eq!(config.max_description_len, 77);
        assert_eq!(config.max_evidence_per_claim, 5);
    }
}
