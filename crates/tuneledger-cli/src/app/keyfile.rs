//! Signing key files: the 32-byte Ed25519 seed as a line of hex.

use std::path::Path;

use zeroize::Zeroizing;

use tuneledger_core::fs::write_atomic;
use tuneledger_core::Keypair;

use crate::errors::CliError;

/// Write `keypair`'s seed to `path`, owner read/write only.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn write_keypair(path: &Path, keypair: &Keypair, overwrite: bool) -> anyhow::Result<()> {
    if path.exists() && !overwrite {
        return Err(CliError::invalid_input(format!(
            "Key file already exists: {}\nHint: pass --force to replace it",
            path.display()
        ))
        .into());
    }
    let mut contents = keypair.to_hex();
    contents.push('\n');
    write_atomic(path, contents.as_bytes(), true)
        .map_err(|e| anyhow::anyhow!("Failed to write key file {}: {}", path.display(), e))
}

pub fn read_keypair(path: &Path) -> anyhow::Result<Keypair> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("No key file at {}", path.display()),
            "Hint: Run `tuneledger keygen` or pass --keypair <PATH>.",
        )
        .into());
    }
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", path.display(), e))?,
    );
    Ok(Keypair::from_hex(&contents)?)
}
