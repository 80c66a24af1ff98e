//! Typed model for Sigma rule documents, restricted to the subset the
//! converter consumes: metadata, logsource, and a detection section made of
//! named field-match groups plus a condition.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::value::{FieldValue, Scalar};

// =============================================================================
// Enumerations
// =============================================================================

/// Severity level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Level {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "informational" => Some(Level::Informational),
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            "critical" => Some(Level::Critical),
            _ => None,
        }
    }
}

// =============================================================================
// Log Source
// =============================================================================

/// Log source specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSource {
    pub category: Option<String>,
    pub product: Option<String>,
    pub service: Option<String>,
    pub definition: Option<String>,
}

// =============================================================================
// Detection Section
// =============================================================================

/// A named detection entry, decoded once into an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEntry {
    /// YAML null group. Skipped by translation.
    Empty,
    /// List- or scalar-shaped group (keyword style). Not translatable, but
    /// list entries still take part in merges.
    Keywords(Vec<Scalar>),
    /// Field → value(s) mapping, in document order.
    Group(IndexMap<String, FieldValue>),
}

/// The `condition` entry of a detection section.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A condition string.
    Expr(String),
    /// Any other YAML shape, kept only for diagnostics.
    Other(String),
}

/// The detection section of a rule: named groups in document order, plus the
/// condition and optional timeframe, which are never groups themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub groups: IndexMap<String, DetectionEntry>,
    pub condition: Option<Condition>,
    pub timeframe: Option<Scalar>,
}

impl Detections {
    /// Merge a skeleton's detection section into this one.
    ///
    /// The concrete section wins on conflicts: skeleton entries are only
    /// inserted where absent, group fields are added/overwritten per field
    /// key, keyword lists are concatenated (concrete first), and entries of
    /// mismatched shape are left untouched. The skeleton also fills in a
    /// missing condition or timeframe.
    pub fn merge_skeleton(&self, skeleton: &Detections) -> Detections {
        let mut merged = self.clone();

        for (name, entry) in &skeleton.groups {
            match merged.groups.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry.clone());
                }
                Entry::Occupied(mut slot) => match (slot.get_mut(), entry) {
                    (DetectionEntry::Group(own), DetectionEntry::Group(defaults)) => {
                        for (field, value) in defaults {
                            own.insert(field.clone(), value.clone());
                        }
                    }
                    (DetectionEntry::Keywords(own), DetectionEntry::Keywords(defaults)) => {
                        own.extend(defaults.iter().cloned());
                    }
                    _ => {}
                },
            }
        }

        if merged.condition.is_none() {
            merged.condition = skeleton.condition.clone();
        }
        if merged.timeframe.is_none() {
            merged.timeframe = skeleton.timeframe.clone();
        }
        merged
    }
}

// =============================================================================
// Rule Documents
// =============================================================================

/// A parsed Sigma rule document.
///
/// Every field is optional: concrete rules in a collection commonly carry only
/// a detection section and inherit the rest from a preceding global document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRule {
    pub title: Option<String>,
    pub id: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub references: Option<Vec<String>>,
    pub level: Option<Level>,
    pub logsource: LogSource,
    pub detection: Option<Detections>,
}

/// One document from a rule file.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    /// `action: global` — the skeleton for subsequent rules in the same file.
    Global(SourceRule),
    Rule(SourceRule),
}

// =============================================================================
// Tests
// =============================================================================
