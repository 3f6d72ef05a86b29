use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{MigrationStatusError, MigrationStatusResult};

/// Sub-case keys the resolver looks up copy for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogKey {
    MigrationNotStarted,
    MigrationStarted,
    PoolSharesLocked,
    DeadlineMetThresholdMet,
    MigrationComplete,
}

impl CatalogKey {
    pub const ALL: [CatalogKey; 5] = [
        CatalogKey::MigrationNotStarted,
        CatalogKey::MigrationStarted,
        CatalogKey::PoolSharesLocked,
        CatalogKey::DeadlineMetThresholdMet,
        CatalogKey::MigrationComplete,
    ];

    /// The key as it appears in catalog documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKey::MigrationNotStarted => "migrationNotStarted",
            CatalogKey::MigrationStarted => "migrationStarted",
            CatalogKey::PoolSharesLocked => "poolSharesLocked",
            CatalogKey::DeadlineMetThresholdMet => "deadlineMetThresholdMet",
            CatalogKey::MigrationComplete => "migrationComplete",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A localized title/text pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyEntry {
    pub title: String,
    pub text: String,
}

impl CopyEntry {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Read-only localized copy keyed by migration sub-case.
///
/// Documents are maps from key name to `{ title, text }`. Names outside the
/// five known keys are dropped on load. A missing key is not a load error:
/// it surfaces as [`MigrationStatusError::MissingCatalogEntry`] when the
/// resolver needs it, or up front through [`ContentCatalog::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, CopyEntry>", into = "BTreeMap<String, CopyEntry>")]
pub struct ContentCatalog {
    entries: BTreeMap<CatalogKey, CopyEntry>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English copy covering every key.
    pub fn english() -> Self {
        Self::new()
            .with(
                CatalogKey::MigrationNotStarted,
                CopyEntry::new(
                    "Migration has not started",
                    "The liquidity migration has not started yet. Your pool shares stay where they are until it opens.",
                ),
            )
            .with(
                CatalogKey::MigrationStarted,
                CopyEntry::new(
                    "Migration has started",
                    "The liquidity migration is open. Lock your pool shares to take part.",
                ),
            )
            .with(
                CatalogKey::PoolSharesLocked,
                CopyEntry::new("Pool shares locked", "Your pool shares are locked for migration."),
            )
            .with(
                CatalogKey::DeadlineMetThresholdMet,
                CopyEntry::new(
                    "Migration window closed",
                    "The migration deadline or participation threshold has been reached. No more shares can be locked.",
                ),
            )
            .with(
                CatalogKey::MigrationComplete,
                CopyEntry::new("Migration complete", "The liquidity migration has completed."),
            )
    }

    pub fn with(mut self, key: CatalogKey, entry: CopyEntry) -> Self {
        self.insert(key, entry);
        self
    }

    pub fn insert(&mut self, key: CatalogKey, entry: CopyEntry) {
        self.entries.insert(key, entry);
    }

    pub fn get(&self, key: CatalogKey) -> Option<&CopyEntry> {
        self.entries.get(&key)
    }

    /// Look up a required entry.
    pub fn require(&self, key: CatalogKey) -> MigrationStatusResult<&CopyEntry> {
        self.entries.get(&key).ok_or_else(|| {
            error!(key = %key, "Content catalog is missing a required entry");
            MigrationStatusError::MissingCatalogEntry(key)
        })
    }

    /// Check that all five required keys are present.
    pub fn validate(&self) -> MigrationStatusResult<()> {
        for key in CatalogKey::ALL {
            self.require(key)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_toml_str(contents: &str) -> MigrationStatusResult<Self> {
        toml::from_str(contents).map_err(|e| MigrationStatusError::CatalogParse {
            format: "toml",
            message: e.to_string(),
        })
    }

    pub fn from_json_str(contents: &str) -> MigrationStatusResult<Self> {
        serde_json::from_str(contents).map_err(|e| MigrationStatusError::CatalogParse {
            format: "json",
            message: e.to_string(),
        })
    }

    /// Load a catalog file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> MigrationStatusResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_toml_str(&contents)?
        };
        debug!(path = %path.display(), entries = catalog.len(), "Content catalog loaded");
        Ok(catalog)
    }
}

impl From<HashMap<String, CopyEntry>> for ContentCatalog {
    fn from(raw: HashMap<String, CopyEntry>) -> Self {
        let entries = raw
            .into_iter()
            .filter_map(|(name, entry)| CatalogKey::from_name(&name).map(|key| (key, entry)))
            .collect();
        Self { entries }
    }
}

impl From<ContentCatalog> for BTreeMap<String, CopyEntry> {
    fn from(catalog: ContentCatalog) -> Self {
        catalog
            .entries
            .into_iter()
            .map(|(key, entry)| (key.as_str().to_string(), entry))
            .collect()
    }
}
