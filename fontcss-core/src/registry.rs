//! Family registry and per-family capability lookup (fontcss https://github.com/fontcss/fontcss)
//!
//! The registry is the upstream font list (`[{"id": "roboto", "subsets": [...]}, ...]`)
//! loaded once at startup. Special cases live here as data: an alias table for
//! renamed families and an optional default subset list for families the
//! registry does not know about.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CssError;

/// Aliases applied to every registry unless overridden.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("source-sans-pro", "source-sans-3")];

/// One family as published by the upstream font list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub id: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub subsets: Vec<String>,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// Where a capability record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilitySource {
    Registry,
    Fallback,
}

/// What the generator may emit for a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyCapabilities<'a> {
    pub id: &'a str,
    pub subsets: &'a [String],
    pub source: CapabilitySource,
}

/// Legacy id → canonical id remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyAliases {
    map: HashMap<String, String>,
}

impl Default for FamilyAliases {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

impl FamilyAliases {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { map }
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.map.insert(from.into(), to.into());
    }

    /// Canonical id for `id`; ids without an alias come back unchanged.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.map.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Parse `old=new` alias arguments as given on the command line.
pub fn parse_alias(raw: &str) -> Result<(String, String)> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("alias must look like old-id=new-id: {raw}"))?;
    let from = from.trim();
    let to = to.trim();
    if from.is_empty() || to.is_empty() {
        return Err(anyhow!("alias must look like old-id=new-id: {raw}"));
    }
    Ok((from.to_string(), to.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct FamilyRegistry {
    families: HashMap<String, FamilyRecord>,
    aliases: FamilyAliases,
    fallback_subsets: Option<Vec<String>>,
}

impl FamilyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FamilyRecord>,
    {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    pub fn from_json_str(raw: &str) -> crate::error::Result<Self> {
        let records: Vec<FamilyRecord> = serde_json::from_str(raw).map_err(CssError::from)?;
        Ok(Self::from_records(records))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading family registry {}", path.display()))?;
        let registry = Self::from_json_str(&raw)
            .with_context(|| format!("parsing family registry {}", path.display()))?;
        log::debug!(
            "loaded {} families from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Later records with the same id replace earlier ones.
    pub fn insert(&mut self, record: FamilyRecord) {
        self.families.insert(record.id.clone(), record);
    }

    pub fn with_aliases(mut self, aliases: FamilyAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Serve families missing from the registry with these subsets instead
    /// of reporting them as unknown.
    pub fn with_fallback_subsets(mut self, subsets: Option<Vec<String>>) -> Self {
        self.fallback_subsets = subsets.filter(|s| !s.is_empty());
        self
    }

    pub fn aliases(&self) -> &FamilyAliases {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FamilyRecord> {
        self.families.get(id)
    }

    /// Subsets declared for `id`, in registry order.
    pub fn subsets_of(&self, id: &str) -> Option<&[String]> {
        self.families.get(id).map(|r| r.subsets.as_slice())
    }

    /// Capability record for an already-aliased id.
    ///
    /// Registry entries without subsets count as missing, matching the
    /// upstream list where such entries cannot be served.
    pub fn capabilities<'a>(&'a self, id: &'a str) -> Option<FamilyCapabilities<'a>> {
        if let Some(record) = self.families.get(id).filter(|r| !r.subsets.is_empty()) {
            return Some(FamilyCapabilities {
                id: record.id.as_str(),
                subsets: &record.subsets,
                source: CapabilitySource::Registry,
            });
        }

        self.fallback_subsets
            .as_deref()
            .map(|subsets| FamilyCapabilities {
                id,
                subsets,
                source: CapabilitySource::Fallback,
            })
    }
}
