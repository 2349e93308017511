use std::{fs, path::Path, str::FromStr};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};

use crate::core::{
    program_id, SdkError, SdkResult, DAO_TREASURY, MAX_SWAP_TICK_ARRAYS, WHIRLPOOL_PROGRAM_ID,
};

/// SDK configuration, loadable from a TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SdkConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Commitment for account reads: processed, confirmed or finalized
    pub commitment: String,

    /// Vault program ID
    #[serde(with = "pubkey_serde")]
    pub program_id: Pubkey,

    /// AMM program ID
    #[serde(with = "pubkey_serde")]
    pub whirlpool_program_id: Pubkey,

    /// Owner of the LP token account receiving protocol fees
    #[serde(with = "pubkey_serde")]
    pub dao_treasury: Pubkey,

    /// Tick arrays walked per swap leg
    pub max_swap_tick_arrays: usize,

    /// AMM pools used to swap reward tokens into vault input tokens
    #[serde(default)]
    pub swap_routes: Vec<SwapRouteConfig>,
}

/// Pool through which one reward mint is swapped
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SwapRouteConfig {
    #[serde(with = "pubkey_serde")]
    pub reward_mint: Pubkey,

    #[serde(with = "pubkey_serde")]
    pub whirlpool: Pubkey,
}

impl SdkConfig {
    pub fn localnet() -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            commitment: "processed".to_string(),
            ..Self::mainnet()
        }
    }

    pub fn devnet() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            ..Self::mainnet()
        }
    }

    pub fn mainnet() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            program_id: program_id(),
            whirlpool_program_id: WHIRLPOOL_PROGRAM_ID,
            dao_treasury: DAO_TREASURY,
            max_swap_tick_arrays: MAX_SWAP_TICK_ARRAYS,
            swap_routes: Vec::new(),
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_swap_route(mut self, reward_mint: Pubkey, whirlpool: Pubkey) -> Self {
        self.swap_routes.push(SwapRouteConfig {
            reward_mint,
            whirlpool,
        });
        self
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SdkError::ConfigFile(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: SdkConfig = toml::from_str(&content).map_err(|e| {
            SdkError::ConfigFile(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::ConfigFile(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            SdkError::ConfigFile(format!("Failed to write config file {}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(SdkError::configuration("rpc_url must not be empty"));
        }

        if !(1..=MAX_SWAP_TICK_ARRAYS).contains(&self.max_swap_tick_arrays) {
            return Err(SdkError::configuration(format!(
                "max_swap_tick_arrays must be between 1 and {}, got {}",
                MAX_SWAP_TICK_ARRAYS, self.max_swap_tick_arrays
            )));
        }

        self.commitment_config()?;

        let mut seen = AHashSet::with_capacity(self.swap_routes.len());
        for route in &self.swap_routes {
            if !seen.insert(route.reward_mint) {
                return Err(SdkError::configuration(format!(
                    "duplicate swap route for reward mint {}",
                    route.reward_mint
                )));
            }
        }

        Ok(())
    }

    pub fn commitment_config(&self) -> SdkResult<CommitmentConfig> {
        let commitment = CommitmentLevel::from_str(&self.commitment).map_err(|_| {
            SdkError::configuration(format!("unknown commitment level '{}'", self.commitment))
        })?;
        Ok(CommitmentConfig { commitment })
    }

    /// Configured route for swapping `reward_mint`
    pub fn swap_route(&self, reward_mint: &Pubkey) -> SdkResult<&SwapRouteConfig> {
        self.swap_routes
            .iter()
            .find(|route| route.reward_mint == *reward_mint)
            .ok_or_else(|| {
                SdkError::configuration(format!("no swap route configured for reward mint {}", reward_mint))
            })
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Pubkeys as base58 strings
pub mod pubkey_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [SdkConfig::localnet(), SdkConfig::devnet(), SdkConfig::mainnet()] {
            config.validate().unwrap();
        }
        assert_eq!(
            SdkConfig::localnet().commitment_config().unwrap(),
            CommitmentConfig::processed()
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(SdkConfig::mainnet().with_rpc_url("  ").validate().is_err());

        let mut config = SdkConfig::mainnet();
        config.max_swap_tick_arrays = 4;
        assert!(config.validate().is_err());
        config.max_swap_tick_arrays = 0;
        assert!(config.validate().is_err());

        let mut config = SdkConfig::mainnet();
        config.commitment = "eventually".to_string();
        assert!(config.validate().is_err());

        let mint = Pubkey::new_unique();
        let config = SdkConfig::mainnet()
            .with_swap_route(mint, Pubkey::new_unique())
            .with_swap_route(mint, Pubkey::new_unique());
        assert!(matches!(config.validate(), Err(SdkError::Configuration(_))));
    }

    #[test]
    fn test_swap_route_lookup() {
        let mint = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let config = SdkConfig::devnet().with_swap_route(mint, pool);

        assert_eq!(config.swap_route(&mint).unwrap().whirlpool, pool);
        assert!(matches!(
            config.swap_route(&Pubkey::new_unique()),
            Err(SdkError::Configuration(_))
        ));
    }

    #[test]
    fn test_toml_save_and_load() {
        let config = SdkConfig::devnet()
            .with_program_id(Pubkey::new_unique())
            .with_swap_route(Pubkey::new_unique(), Pubkey::new_unique());

        let path = std::env::temp_dir().join(format!("clmm-vault-sdk-{}.toml", Pubkey::new_unique()));
        config.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(&config.program_id.to_string()));

        let loaded = SdkConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("clmm-vault-sdk-{}.toml", Pubkey::new_unique()));
        fs::write(&path, "rpc_url = 1").unwrap();
        let err = SdkConfig::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, SdkError::ConfigFile(_)));

        assert!(matches!(
            SdkConfig::load("/nonexistent/clmm-vault.toml"),
            Err(SdkError::ConfigFile(_))
        ));
    }
}
