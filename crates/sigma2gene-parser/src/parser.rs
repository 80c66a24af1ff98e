//! YAML → document parsing for Sigma rule collections.
//!
//! Handles:
//! - Single- and multi-document YAML (`---` separators)
//! - `action: global` documents, tagged as skeletons for the documents that
//!   follow them in the same file
//! - Detection section decoding into tagged entries
//! - File loading and recursive rule-file discovery

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use crate::ast::{
    Condition, DetectionEntry, Detections, Level, LogSource, SourceDocument, SourceRule,
};
use crate::error::Result;
use crate::value::{FieldValue, Scalar};

// =============================================================================
// Public API
// =============================================================================

/// Documents parsed from one YAML stream, plus per-document errors.
///
/// A malformed document is reported here and skipped; it never aborts the
/// rest of the stream.
#[derive(Debug, Default)]
pub struct DocumentSet {
    pub documents: Vec<SourceDocument>,
    pub errors: Vec<String>,
}

/// Parse a YAML string containing one or more Sigma documents.
///
/// Documents marked `action: global` are tagged [`SourceDocument::Global`];
/// any other `action` value passes through as a plain rule.
pub fn parse_documents(yaml: &str) -> DocumentSet {
    let mut set = DocumentSet::default();

    for doc in serde_yaml::Deserializer::from_str(yaml) {
        let value: Value = match Value::deserialize(doc) {
            Ok(v) => v,
            Err(e) => {
                set.errors.push(format!("YAML parse error: {e}"));
                continue;
            }
        };

        let Some(mapping) = value.as_mapping() else {
            set.errors.push("document is not a YAML mapping".to_string());
            continue;
        };

        let rule = parse_rule(mapping);
        if get_str(mapping, "action") == Some("global") {
            set.documents.push(SourceDocument::Global(rule));
        } else {
            set.documents.push(SourceDocument::Rule(rule));
        }
    }

    set
}

/// Parse a single rule file.
pub fn parse_file(path: &Path) -> Result<DocumentSet> {
    let content = fs::read_to_string(path)?;
    Ok(parse_documents(&content))
}

/// Collect rule files under a path.
///
/// Directories are crawled recursively for `.yml`/`.yaml` files; a path that
/// is itself a file is returned as-is, whatever its extension. The result is
/// sorted so repeated runs process files in the same order.
pub fn find_rule_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if path.is_dir() {
        walk(path, &mut files)?;
        files.sort();
    } else if path.is_file() {
        files.push(path.to_path_buf());
    }
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml" | "yaml")
        ) {
            files.push(path);
        }
    }
    Ok(())
}

// =============================================================================
// Document decoding
// =============================================================================

/// Decode a rule leniently: every field is optional, unknown fields are
/// ignored. Structural problems surface later, per rule, at translation time.
fn parse_rule(m: &serde_yaml::Mapping) -> SourceRule {
    SourceRule {
        title: get_str(m, "title").map(str::to_string),
        id: get_str(m, "id").map(str::to_string),
        author: get_str(m, "author").map(str::to_string),
        description: get_str(m, "description").map(str::to_string),
        references: get_str_list(m, "references"),
        level: get_str(m, "level").and_then(Level::from_str),
        logsource: m
            .get(val_key("logsource"))
            .and_then(Value::as_mapping)
            .map(parse_logsource)
            .unwrap_or_default(),
        detection: m
            .get(val_key("detection"))
            .and_then(Value::as_mapping)
            .map(parse_detections),
    }
}

fn parse_logsource(m: &serde_yaml::Mapping) -> LogSource {
    LogSource {
        category: get_str(m, "category").map(str::to_string),
        product: get_str(m, "product").map(str::to_string),
        service: get_str(m, "service").map(str::to_string),
        definition: get_str(m, "definition").map(str::to_string),
    }
}

/// Decode the `detection:` section. `condition` and `timeframe` are split off
/// structurally; everything else is a named group.
fn parse_detections(m: &serde_yaml::Mapping) -> Detections {
    let mut detections = Detections::default();

    for (key, value) in m {
        let Some(name) = key.as_str() else { continue };
        match name {
            "condition" => detections.condition = Some(parse_condition(value)),
            "timeframe" => detections.timeframe = Some(Scalar::from_yaml(value)),
            _ => {
                detections
                    .groups
                    .insert(name.to_string(), parse_entry(value));
            }
        }
    }

    detections
}

fn parse_condition(v: &Value) -> Condition {
    match v {
        Value::String(s) => Condition::Expr(s.clone()),
        other => Condition::Other(format!("{other:?}")),
    }
}

fn parse_entry(v: &Value) -> DetectionEntry {
    match v {
        Value::Null => DetectionEntry::Empty,
        Value::Mapping(m) => DetectionEntry::Group(
            m.iter()
                .filter_map(|(k, v)| Some((k.as_str()?.to_string(), FieldValue::from_yaml(v))))
                .collect(),
        ),
        Value::Sequence(seq) => {
            DetectionEntry::Keywords(seq.iter().map(Scalar::from_yaml).collect())
        }
        other => DetectionEntry::Keywords(vec![Scalar::from_yaml(other)]),
    }
}

// =============================================================================
// YAML Helpers
// =============================================================================

fn val_key(s: &str) -> Value {
    Value::String(s.to_string())
}

fn get_str<'a>(m: &'a serde_yaml::Mapping, key: &str) -> Option<&'a str> {
    m.get(val_key(key)).and_then(|v| v.as_str())
}

/// A string list, or a bare string promoted to a one-element list. Absence is
/// preserved (`None`), since downstream output distinguishes it from empty.
fn get_str_list(m: &serde_yaml::Mapping, key: &str) -> Option<Vec<String>> {
    match m.get(val_key(key)) {
        Some(Value::Sequence(seq)) => Some(
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s.clone()]),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
