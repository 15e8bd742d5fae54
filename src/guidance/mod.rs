//! Directional guidance records and the lookup table they live in.
//!
//! Guidance data arrives from outside the engine — either a spreadsheet CSV
//! export ([`sheet`]) or a directory of per-category JSON files ([`local`]).
//! Both loaders normalize into the same `category → label → entry` table.

mod error;
pub mod local;
pub mod sheet;

pub use error::GuidanceError;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::compass::CompassLabel;
use crate::model::AreaType;

// ============================================================================
// Guidance Entry
// ============================================================================

/// One record of directional advice for a `(category, direction)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuidanceEntry {
    /// Quality classification of the placement (`Best`, `Good`, `Bad`,
    /// `Very Bad`, or `Neutral` when unspecified).
    pub zone: String,
    /// Associated element name from the source data.
    pub element: String,
    /// Primary remedies.
    pub remedies_primary: Vec<String>,
    /// Secondary remedies.
    pub remedies_secondary: Vec<String>,
    /// Described effects of the placement.
    pub effect: Vec<String>,
}

/// Normalize a zone string: canonical casing for the four known zones,
/// pass-through for anything else, `Neutral` when missing.
pub(crate) fn normalize_zone(zone: Option<&str>) -> String {
    let Some(zone) = zone else {
        return "Neutral".to_string();
    };
    match zone.trim().to_lowercase().as_str() {
        "very bad" => "Very Bad".to_string(),
        "bad" => "Bad".to_string(),
        "good" => "Good".to_string(),
        "best" => "Best".to_string(),
        _ => zone.to_string(),
    }
}

/// A field that external data provides either as a pipe-delimited string or
/// as a proper list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawList {
    Text(String),
    Items(Vec<String>),
}

/// Split an optional raw list field into trimmed, non-empty strings.
pub(crate) fn split_list(raw: Option<RawList>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawList::Text(text)) => text
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(RawList::Items(items)) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// A guidance record as found in external data, before normalization.
#[derive(Debug, Deserialize)]
pub(crate) struct RawGuidanceRecord {
    #[serde(default, alias = "direction")]
    pub compass_direction: Option<String>,
    #[serde(default)]
    zone: Option<String>,
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    remedies_primary: Option<RawList>,
    #[serde(default)]
    remedies_secondary: Option<RawList>,
    #[serde(default)]
    effect: Option<RawList>,
}

impl RawGuidanceRecord {
    /// Parsed direction key, if the record names one it can be normalized.
    pub fn direction(&self) -> Option<CompassLabel> {
        self.compass_direction
            .as_deref()
            .and_then(CompassLabel::from_name)
    }

    /// Normalize into a [`GuidanceEntry`].
    pub fn into_entry(self) -> GuidanceEntry {
        GuidanceEntry {
            zone: normalize_zone(self.zone.as_deref()),
            element: self.element.unwrap_or_default(),
            remedies_primary: split_list(self.remedies_primary),
            remedies_secondary: split_list(self.remedies_secondary),
            effect: split_list(self.effect),
        }
    }
}

// ============================================================================
// Guidance Table
// ============================================================================

/// The loaded guidance table: `category → compass label → entry`.
///
/// Category keys are the external data's room categories (`kitchen`,
/// `dinning_hall`, …); [`AreaType::guidance_category`] maps domain types
/// onto them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuidanceTable {
    categories: HashMap<String, HashMap<CompassLabel, GuidanceEntry>>,
}

impl GuidanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, creating the category on first use.
    pub fn insert(&mut self, category: &str, label: CompassLabel, entry: GuidanceEntry) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(label, entry);
    }

    /// Direct lookup by category key.
    pub fn get(&self, category: &str, label: CompassLabel) -> Option<&GuidanceEntry> {
        self.categories.get(category)?.get(&label)
    }

    /// Lookup for a domain area type, trying the primary category and then
    /// its fallback. `None` when the table has nothing for the pair; the
    /// area still reports its resolved direction in that case.
    pub fn lookup(&self, area_type: AreaType, label: CompassLabel) -> Option<&GuidanceEntry> {
        let (primary, fallback) = area_type.guidance_category();
        self.get(primary, label)
            .or_else(|| fallback.and_then(|c| self.get(c, label)))
    }

    /// Category names present in the table, sorted.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All entries for a category.
    pub fn directions_for(&self, category: &str) -> Option<&HashMap<CompassLabel, GuidanceEntry>> {
        self.categories.get(category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of `(category, direction)` entries.
    pub fn entry_count(&self) -> usize {
        self.categories.values().map(HashMap::len).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
