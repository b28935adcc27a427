//! Deployment configuration loaded from TOML.

use crate::error::{ContractError, Result};
use crate::file::DEFAULT_PROVE_BLOCK_NUM;
use custodia_types::{Address, Settings, SettingsInit};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_prove_block_num() -> u64 {
    DEFAULT_PROVE_BLOCK_NUM
}

/// Where the contract lives, who governs it and its genesis pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub contract_address: Address,
    pub admin: Address,
    #[serde(default)]
    pub settings: Settings,
    /// Blocks challenged per round when a file does not ask for a number.
    #[serde(default = "default_prove_block_num")]
    pub default_prove_block_num: u64,
}

impl ContractConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ContractConfig = toml::from_str(content)
            .map_err(|e| ContractError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading contract configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContractError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settings.gas_price == 0 {
            return Err(ContractError::Config("settings.gas_price must be non-zero".into()));
        }
        if self.settings.max_prove_block_num == 0 {
            return Err(ContractError::Config(
                "settings.max_prove_block_num must be non-zero".into(),
            ));
        }
        if self.default_prove_block_num == 0 {
            return Err(ContractError::Config("default_prove_block_num must be non-zero".into()));
        }
        if self.contract_address == self.admin {
            return Err(ContractError::Config("admin must differ from the contract address".into()));
        }
        Ok(())
    }

    /// Payload for the `FsSettingInit` call that bootstraps governance.
    pub fn settings_init(&self) -> SettingsInit {
        SettingsInit {
            admin: self.admin,
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
contract_address = "c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0"
admin = "adadadadadadadadadadadadadadadadadadadad"
"#;

    #[test]
    fn defaults_fill_missing_sections() {
        let config = ContractConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.contract_address, Address([0xC0; 20]));
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.default_prove_block_num, DEFAULT_PROVE_BLOCK_NUM);
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let text = format!("{MINIMAL}default_prove_block_num = 8\n\n[settings]\ngas_price = 1\n");
        let config = ContractConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.settings.gas_price, 1);
        assert_eq!(config.settings.max_prove_block_num, 32);
        assert_eq!(config.default_prove_block_num, 8);
    }

    #[test]
    fn invalid_values_rejected() {
        let text = format!("{MINIMAL}\n[settings]\ngas_price = 0\n");
        assert!(matches!(
            ContractConfig::from_toml_str(&text),
            Err(ContractError::Config(_))
        ));
        assert!(matches!(
            ContractConfig::from_toml_str("admin = \"zz\""),
            Err(ContractError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = ContractConfig::load(file.path()).unwrap();
        assert_eq!(config.settings_init().admin, Address([0xAD; 20]));

        assert!(ContractConfig::load("/nonexistent/custodia.toml").is_err());
    }
}
