//! Subset name → unicode-range lookup (fontcss https://github.com/fontcss/fontcss)

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::CssError;

/// Range emitted when a subset is missing from the catalog.
pub const DEFAULT_UNICODE_RANGE: &str = "U+0000-00FF, U+0131, U+0152-0153, U+02BB-02BC, U+02C6, U+02DA, U+02DC, U+0304, U+0308, U+0329, U+2000-206F, U+20AC, U+2122, U+2191, U+2193, U+2212, U+2215, U+FEFF, U+FFFD";

/// One subset paired with the range it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsetEntry {
    pub name: String,
    pub unicode_range: String,
}

/// Precomputed mapping loaded once at startup (the `subsets.json` file).
#[derive(Debug, Clone, Default)]
pub struct SubsetCatalog {
    ranges: HashMap<String, String>,
}

impl SubsetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> crate::error::Result<Self> {
        let ranges: HashMap<String, String> = serde_json::from_str(raw).map_err(CssError::from)?;
        Ok(Self { ranges })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading subset catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&raw)
            .with_context(|| format!("parsing subset catalog {}", path.display()))?;
        log::debug!("loaded {} subsets from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn with_range(mut self, subset: impl Into<String>, range: impl Into<String>) -> Self {
        self.ranges.insert(subset.into(), range.into());
        self
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, subset: &str) -> bool {
        self.ranges.contains_key(subset)
    }

    /// Range for `subset`, or [`DEFAULT_UNICODE_RANGE`] when the catalog lacks it.
    ///
    /// The ingestion job records an empty string for subsets it failed to
    /// fetch, so those fall back as well.
    pub fn unicode_range_of(&self, subset: &str) -> &str {
        match self.ranges.get(subset) {
            Some(range) if !range.trim().is_empty() => range,
            _ => DEFAULT_UNICODE_RANGE,
        }
    }

    /// Pair each name with its range, keeping the caller's order.
    pub fn entries_for<S: AsRef<str>>(&self, subsets: &[S]) -> Vec<SubsetEntry> {
        subsets
            .iter()
            .map(|name| SubsetEntry {
                name: name.as_ref().to_string(),
                unicode_range: self.unicode_range_of(name.as_ref()).to_string(),
            })
            .collect()
    }
}
