use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static MEMORY_STORE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Where the relational copy of the company lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// A SQLite database file. Parent directories are created on open.
    File(PathBuf),
    /// A named in-memory database shared by every connection of one store handle.
    Memory(String),
}

impl StoreLocation {
    /// A fresh in-memory location, unique within this process.
    pub fn unique_memory() -> Self {
        let seq = MEMORY_STORE_SEQ.fetch_add(1, Ordering::Relaxed);
        StoreLocation::Memory(format!("company_{}_{seq}", std::process::id()))
    }

    /// Connection string handed to SQLite (URI form for memory stores).
    pub fn connection_uri(&self) -> String {
        match self {
            StoreLocation::File(path) => path.to_string_lossy().into_owned(),
            StoreLocation::Memory(name) => format!("file:{name}?mode=memory&cache=shared"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Run `init_schema` when the store is opened.
    #[serde(default = "default_true")]
    pub schema_auto_init: bool,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            schema_auto_init: true,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::unique_memory(),
            schema_auto_init: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    pub store: StoreConfig,
}

impl AnalyticsConfig {
    /// Load from a JSON file such as:
    ///
    /// ```json
    /// { "company_name": "Acme", "store": { "location": { "file": "data/company.db" } } }
    /// ```
    ///
    /// In tests, use AnalyticsConfig::default_test().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: AnalyticsConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.company_name.trim().is_empty() {
            anyhow::bail!("company_name must not be empty");
        }
        match &self.store.location {
            StoreLocation::File(p) if p.as_os_str().is_empty() => {
                anyhow::bail!("store file path must not be empty")
            }
            StoreLocation::Memory(name) if name.trim().is_empty() => {
                anyhow::bail!("in-memory store name must not be empty")
            }
            _ => Ok(()),
        }
    }

    /// Config with an isolated in-memory store for use in tests.
    pub fn default_test() -> Self {
        Self {
            company_name: default_company_name(),
            store: StoreConfig::in_memory(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_company_name() -> String {
    "Demo Company".to_string()
}
