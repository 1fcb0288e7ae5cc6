//! Preview configuration loaded from TOML

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use amm_model::{BPS_SCALE, DEFAULT_FEE_BPS};
use borrow_model::MIN_COLLATERALIZATION_RATIO;

/// Read when `--config` is not given; silently skipped if absent
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/predict/config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Pool trading fee in basis points
    pub fee_bps: u64,
    /// Stablecoin issuance fee in basis points
    pub borrowing_fee_rate_bps: u32,
    /// Liquidation threshold used for liquidation prices (percent)
    pub min_collateral_ratio_pct: u32,
    /// JSON file mapping market address to "above" / "below"
    pub direction_store: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            borrowing_fee_rate_bps: 50,
            min_collateral_ratio_pct: MIN_COLLATERALIZATION_RATIO,
            direction_store: None,
        }
    }
}

impl PreviewConfig {
    /// Load `path`, or the default location if it exists, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = expand_path(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    debug!("no config at {}, using defaults", default_path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: PreviewConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        // Relative store paths are taken from the config file's directory
        if let Some(store) = config.direction_store.take() {
            let store = expand_path(&store.to_string_lossy());
            let store = match (store.is_relative(), path.parent()) {
                (true, Some(dir)) => dir.join(store),
                _ => store,
            };
            config.direction_store = Some(store);
        }

        debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fee_bps >= BPS_SCALE {
            anyhow::bail!("fee_bps must be below {}, got {}", BPS_SCALE, self.fee_bps);
        }
        if self.min_collateral_ratio_pct == 0 {
            anyhow::bail!("min_collateral_ratio_pct must be positive");
        }
        Ok(())
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::default();
        assert_eq!(config.fee_bps, 50);
        assert_eq!(config.min_collateral_ratio_pct, 110);
        assert!(config.direction_store.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("fee_bps = 30\n");
        let config = PreviewConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fee_bps, 30);
        assert_eq!(config.borrowing_fee_rate_bps, 50);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = PreviewConfig::load(Some(Path::new("/nonexistent/predict.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_rejects_full_fee() {
        let file = write_config("fee_bps = 10000\n");
        assert!(PreviewConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_rejects_unknown_key() {
        let file = write_config("fee = 30\n");
        assert!(PreviewConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_relative_store_path_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "direction_store = \"directions.json\"\n").unwrap();

        let config = PreviewConfig::from_file(&path).unwrap();
        assert_eq!(config.direction_store, Some(dir.path().join("directions.json")));
    }
}
