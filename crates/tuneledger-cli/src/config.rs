use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tuneledger_core::fs::write_atomic;

use crate::constants::{DEFAULT_LOG_FILTER, KEYPAIR_FILE_NAME, LEDGER_FILE_NAME};

#[derive(Debug, Serialize, Deserialize)]
pub struct TuneLedgerConfig {
    pub ledger: LedgerSection,
    pub signer: SignerSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerSection {
    pub path: String,
    /// Hex program id; the built-in id when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignerSection {
    pub keypair_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogSection {
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TuneLedgerConfig {
    pub fn new(ledger_path: &Path, keypair_path: &Path, program_id: Option<String>) -> Self {
        Self {
            ledger: LedgerSection {
                path: ledger_path.to_string_lossy().to_string(),
                program_id,
            },
            signer: SignerSection {
                keypair_path: keypair_path.to_string_lossy().to_string(),
            },
            log: LogSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_ledger_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(LEDGER_FILE_NAME))
}

pub fn default_keypair_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join(KEYPAIR_FILE_NAME))
}

pub fn read_config(path: &Path) -> anyhow::Result<TuneLedgerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &TuneLedgerConfig) -> anyhow::Result<()> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    write_atomic(path, contents.as_bytes(), false)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    app_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    app_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// `$<var>/tuneledger`, or `$HOME/<fallback>/tuneledger` when the variable is unset or blank.
fn app_dir(var: &str, fallback: &[&str]) -> anyhow::Result<PathBuf> {
    let base = match std::env::var_os(var).filter(|v| !v.to_string_lossy().trim().is_empty()) {
        Some(base) => PathBuf::from(base),
        None => {
            let home = std::env::var_os("HOME")
                .ok_or_else(|| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
            fallback.iter().fold(PathBuf::from(home), |path, part| path.join(part))
        }
    };
    Ok(base.join("tuneledger"))
}
