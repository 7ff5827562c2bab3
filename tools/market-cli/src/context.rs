//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use market_cart::CartStore;
use market_storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::debug;

use crate::config::{CliConfig, StorageBackend, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the file backend stores the cart in.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.storage.path {
            Some(path) => self.resolve_path(path),
            None => dirs_path().join("gomarketplace"),
        }
    }

    /// Open the configured storage backend.
    pub async fn storage(&self) -> Result<Arc<dyn KeyValueStore>> {
        match self.config.storage.backend {
            StorageBackend::File => {
                let dir = self.data_dir();
                self.output
                    .debug(&format!("Using file storage at {}", dir.display()));
                let store = FileStore::open(&dir)
                    .await
                    .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
                Ok(Arc::new(store))
            }
            StorageBackend::Memory => {
                self.output.debug("Using in-memory storage");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    /// Open the cart and wait for it to load.
    pub async fn open_cart(&self) -> Result<CartStore> {
        let storage = self.storage().await?;
        debug!(key = %self.config.cart.storage_key, "opening cart");
        CartStore::open(storage, self.config.cart.clone())
            .await
            .context("Failed to load cart")
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("market.toml"), "").unwrap();

        let found = find_config(&nested);
        assert_eq!(found, Some(dir.path().join("market.toml")));
    }

    #[test]
    fn test_find_config_prefers_first_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("market.json"), "{}").unwrap();
        std::fs::write(dir.path().join("market.toml"), "").unwrap();

        let found = find_config(dir.path());
        assert_eq!(found, Some(dir.path().join("market.toml")));
    }
}
