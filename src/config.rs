//! Generation settings.
//!
//! Defaults reproduce the classic fixture set (50 customers, 200 order lines,
//! seed 42). A YAML file can override any of them, and CLI flags override the
//! file:
//!
//! ```yaml
//! entities: 500
//! transactions: 5000
//! seed: 7
//! output_dir: fixtures/jde
//! as_of: 2024-06-30
//! headers: jde
//! ```

use crate::generator::address_book::{ID_MAX, ID_MIN};
use crate::generator::sales_order::{DOC_ID_MAX, DOC_ID_MIN};
use crate::generator::HeaderStyle;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENTITIES: usize = 50;
pub const DEFAULT_TRANSACTIONS: usize = 200;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Settings for one `generate` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Address book rows (F0101)
    pub entities: usize,
    /// Sales order rows (F4211)
    pub transactions: usize,
    /// RNG seed
    pub seed: u64,
    /// Destination directory for the CSV files
    pub output_dir: PathBuf,
    /// Date the trailing windows end on (None = today, local time)
    pub as_of: Option<NaiveDate>,
    /// Header row naming
    pub headers: HeaderStyle,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            entities: DEFAULT_ENTITIES,
            transactions: DEFAULT_TRANSACTIONS,
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            as_of: None,
            headers: HeaderStyle::Generic,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub entities: Option<usize>,
    pub transactions: Option<usize>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub as_of: Option<NaiveDate>,
    pub headers: Option<HeaderStyle>,
}

impl GenerateConfig {
    /// Load from a YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Resolve file (if any) and CLI values into a checked config.
    pub fn resolve(file: Option<&Path>, overrides: GenerateOverrides) -> anyhow::Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: GenerateOverrides) {
        if let Some(v) = overrides.entities {
            self.entities = v;
        }
        if let Some(v) = overrides.transactions {
            self.transactions = v;
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }
        if let Some(v) = overrides.output_dir {
            self.output_dir = v;
        }
        if overrides.as_of.is_some() {
            self.as_of = overrides.as_of;
        }
        if let Some(v) = overrides.headers {
            self.headers = v;
        }
    }

    /// Reject counts the id ranges cannot satisfy.
    pub fn validate(&self) -> anyhow::Result<()> {
        let max_entities = (ID_MAX - ID_MIN + 1) as usize;
        if self.entities > max_entities {
            anyhow::bail!(
                "entities must be at most {} (unique address numbers {}..={}), got {}",
                max_entities,
                ID_MIN,
                ID_MAX,
                self.entities
            );
        }
        let max_transactions = (DOC_ID_MAX - DOC_ID_MIN + 1) as usize;
        if self.transactions > max_transactions {
            anyhow::bail!(
                "transactions must be at most {} (unique document numbers {}..={}), got {}",
                max_transactions,
                DOC_ID_MIN,
                DOC_ID_MAX,
                self.transactions
            );
        }
        if self.entities == 0 && self.transactions > 0 {
            anyhow::bail!("transactions need at least one entity to reference");
        }
        Ok(())
    }

    /// The pinned as-of date, or today's local date.
    pub fn effective_as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
