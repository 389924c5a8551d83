//! Prompt catalog backed by a CSV file.
//!
//! The catalog is loaded once at startup and never mutated afterwards. Columns:
//! `id` (always kept as a string), `prompt`, and optionally `outfit` and
//! `customerTryOn`. A missing file does not stop the service; it yields an
//! unavailable catalog on which every lookup misses.
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    pub id: String,
    /// May be empty; an empty prompt is a hit, not a miss.
    pub prompt: String,
    /// Outfit-type token substituted into the try-on template.
    pub outfit_type: Option<String>,
}

/// Row shape served by `GET /prompts/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutfitSummary {
    pub id: String,
    pub outfit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptRow {
    id: String,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    outfit: Option<String>,
    #[serde(default, rename = "customerTryOn")]
    customer_try_on: Option<String>,
}

#[derive(Debug, Default)]
pub struct PromptCatalog {
    entries: HashMap<String, PromptEntry>,
    source: Option<PathBuf>,
    available: bool,
}

impl PromptCatalog {
    /// Load from a CSV file, failing with `SourceUnavailable` if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Startup variant of [`PromptCatalog::load`]: logs the failure and returns
    /// an unavailable catalog instead of erroring.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!("Prompts loaded successfully: {} entries from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                tracing::error!("Prompt catalog unavailable, every lookup will miss: {}", e);
                PromptCatalog { entries: HashMap::new(), source: Some(path.to_path_buf()), available: false }
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut rdr = csv_reader(reader);
        let mut entries = HashMap::new();
        for row in rdr.deserialize::<PromptRow>() {
            let row = row?;
            let entry = PromptEntry {
                id: row.id.clone(),
                prompt: row.prompt.unwrap_or_default(),
                outfit_type: row.customer_try_on,
            };
            if entries.insert(row.id.clone(), entry).is_some() {
                tracing::warn!("Duplicate prompt id '{}' in catalog, keeping the last row", row.id);
            }
        }
        Ok(PromptCatalog { entries, source: None, available: true })
    }

    pub fn lookup(&self, id: &str) -> Option<&PromptEntry> {
        self.entries.get(id)
    }

    /// Secondary mapping used by the try-on flow: id -> outfit-type token.
    /// A blank token counts as missing.
    pub fn outfit_type(&self, id: &str) -> Option<&str> {
        self.lookup(id)
            .and_then(|e| e.outfit_type.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Short rows are allowed; missing trailing columns read as empty.
fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// Read the `id` and `outfit` columns fresh from disk, in file order.
pub async fn list_outfits(path: impl AsRef<Path>) -> AppResult<Vec<OutfitSummary>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;
    outfits_from_reader(bytes.as_slice())
}

pub fn outfits_from_reader<R: Read>(reader: R) -> AppResult<Vec<OutfitSummary>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in ["id", "outfit"] {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::SourceUnavailable(format!("missing '{}' column", column)));
        }
    }
    rdr.deserialize::<PromptRow>()
        .map(|row| -> AppResult<OutfitSummary> {
            let row = row?;
            Ok(OutfitSummary { id: row.id, outfit: row.outfit })
        })
        .collect()
}
