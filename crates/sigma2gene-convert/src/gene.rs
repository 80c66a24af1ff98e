//! The Gene rule model, serialized exactly as the engine expects it.

use serde::Serialize;

use sigma2gene_parser::Level;

/// Channel for rules scoped to the Sysmon service.
pub const SYSMON_CHANNEL: &str = "Microsoft-Windows-Sysmon/Operational";
/// Channel for rules scoped to the Security service.
pub const SECURITY_CHANNEL: &str = "Security";

/// Notice attached to every converted rule.
pub const DISCLAIMER: &str = "This rule has been auto-generated by a script. \
It has not been optimized for Gene and may cause a slow down of the engine \
or unexpected results.";

/// A Gene rule.
///
/// Field names and ordering are part of the wire contract with the consuming
/// engine; do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneRule {
    pub name: String,
    pub tags: Vec<String>,
    pub meta: GeneMeta,
    /// Match expressions, each bound to one symbolic variable (`$v0`, …).
    pub matches: Vec<String>,
    /// Boolean expression over the symbolic variables.
    pub condition: String,
}

/// The `Meta` block of a Gene rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneMeta {
    #[serde(rename = "EventIDs")]
    pub event_ids: Vec<i64>,
    pub channels: Vec<String>,
    pub computers: Vec<String>,
    pub traces: Vec<String>,
    pub criticality: u8,
    pub disable: bool,
    pub author: Option<String>,
    pub comments: Option<String>,
    pub references: Option<Vec<String>>,
    pub disclaimer: String,
    pub sigma_source: Option<String>,
}

/// Map a Sigma severity level onto the Gene 0–10 criticality scale.
///
/// Absent and unrecognized levels (including `informational`) map to the
/// mid-range default of 5.
pub fn criticality(level: Option<Level>) -> u8 {
    match level {
        Some(Level::Critical) => 10,
        Some(Level::High) => 8,
        Some(Level::Medium) => 6,
        Some(Level::Low) => 3,
        _ => 5,
    }
}
