use crate::error::WalletError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Two parallel append-only files: one address per line, one private key per line.
#[derive(Debug, Clone)]
pub struct WalletStore {
    addresses_path: PathBuf,
    private_keys_path: PathBuf,
}

impl WalletStore {
    pub fn new(addresses_path: impl Into<PathBuf>, private_keys_path: impl Into<PathBuf>) -> Self {
        Self {
            addresses_path: addresses_path.into(),
            private_keys_path: private_keys_path.into(),
        }
    }

    pub fn addresses_path(&self) -> &Path {
        &self.addresses_path
    }

    pub fn private_keys_path(&self) -> &Path {
        &self.private_keys_path
    }

    /// Appends one matched record to both files. Each line is synced before return.
    pub fn append(&self, address: &str, private_key: &str) -> Result<(), WalletError> {
        Self::append_line(&self.addresses_path, address)?;
        Self::append_line(&self.private_keys_path, private_key)?;
        debug!("Wallet {} persisted", address);
        Ok(())
    }

    fn append_line(path: &Path, line: &str) -> Result<(), WalletError> {
        let persist_err = |e: std::io::Error| WalletError::Persist {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(persist_err)?;
        writeln!(file, "{}", line).map_err(persist_err)?;
        file.sync_data().map_err(persist_err)
    }
}
