//! Rule translation: selection groups → match expressions, condition →
//! Gene condition string.

use std::path::Path;

use indexmap::IndexMap;

use sigma2gene_parser::{Condition, DetectionEntry, Detections, FieldValue, Scalar, SourceRule};

use crate::error::{ConvertError, Result};
use crate::gene::{DISCLAIMER, GeneMeta, GeneRule, SECURITY_CHANNEL, SYSMON_CHANNEL, criticality};
use crate::matchexpr::field_match;

// =============================================================================
// Rule translation
// =============================================================================

/// Translate one concrete rule, with its optional skeleton, into a Gene rule.
///
/// Metadata (name, author, comments, references) comes from the skeleton when
/// one is supplied; detection content is the concrete section with skeleton
/// defaults merged in. `source` provides the originating file for provenance.
pub fn translate_rule(
    rule: &SourceRule,
    skeleton: Option<&SourceRule>,
    source: Option<&Path>,
) -> Result<GeneRule> {
    let meta_src = skeleton.unwrap_or(rule);
    let title = meta_src.title.as_deref().ok_or(ConvertError::MissingTitle)?;
    let name: String = title.split_whitespace().collect();

    let mut channels = Vec::new();
    if let Some(service) = rule.logsource.service.as_deref() {
        if service.eq_ignore_ascii_case("sysmon") {
            channels.push(SYSMON_CHANNEL.to_string());
        } else if service.eq_ignore_ascii_case("security") {
            channels.push(SECURITY_CHANNEL.to_string());
        }
    }

    let detection = match (&rule.detection, skeleton.and_then(|s| s.detection.as_ref())) {
        (Some(own), Some(defaults)) => own.merge_skeleton(defaults),
        (Some(own), None) => own.clone(),
        (None, Some(defaults)) => defaults.clone(),
        (None, None) => return Err(ConvertError::MissingDetection),
    };

    let selections = translate_selections(&detection)?;
    let condition = translate_condition(detection.condition.as_ref(), &selections.fragments)?;

    let level = rule.level.or(skeleton.and_then(|s| s.level));

    Ok(GeneRule {
        name,
        tags: vec!["Sigma".to_string(), "Auto-generated".to_string()],
        meta: GeneMeta {
            event_ids: selections.event_ids,
            channels,
            computers: Vec::new(),
            traces: Vec::new(),
            criticality: criticality(level),
            disable: false,
            author: meta_src.author.clone(),
            comments: meta_src.description.clone(),
            references: meta_src.references.clone(),
            disclaimer: DISCLAIMER.to_string(),
            sigma_source: source
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned()),
        },
        matches: selections.matches,
        condition,
    })
}

// =============================================================================
// Selection translation
// =============================================================================

struct Selections {
    matches: Vec<String>,
    event_ids: Vec<i64>,
    /// Group name → that group's variables joined with ` and `.
    fragments: IndexMap<String, String>,
}

/// Walk the merged detection groups, producing match expressions, the EventID
/// filter set, and the per-group condition fragments.
///
/// Variables are assigned in document order, `$v0` upward; `EventID` fields
/// never consume a variable. Every group must be a field mapping containing
/// an `EventID` key — that is the compatibility gate with the Gene matcher
/// model, which scopes each rule to specific event identifiers.
fn translate_selections(detection: &Detections) -> Result<Selections> {
    let mut out = Selections {
        matches: Vec::new(),
        event_ids: Vec::new(),
        fragments: IndexMap::new(),
    };
    let mut next_var = 0usize;

    for (name, entry) in &detection.groups {
        let fields = match entry {
            DetectionEntry::Empty => continue,
            DetectionEntry::Group(fields) if fields.contains_key("EventID") => fields,
            _ => return Err(ConvertError::IncompatibleSelection(name.clone())),
        };

        let mut vars = Vec::new();
        for (field, value) in fields {
            if field == "EventID" {
                collect_event_ids(value, &mut out.event_ids);
                continue;
            }
            let var = format!("$v{next_var}");
            out.matches.push(field_match(&var, field, value));
            vars.push(var);
            next_var += 1;
        }
        // EventID-only groups contribute no fragment and cannot be referenced
        // from the condition.
        if !vars.is_empty() {
            out.fragments.insert(name.clone(), vars.join(" and "));
        }
    }

    Ok(out)
}

fn collect_event_ids(value: &FieldValue, event_ids: &mut Vec<i64>) {
    let scalars: &[Scalar] = match value {
        FieldValue::Single(s) => std::slice::from_ref(s),
        FieldValue::Many(list) => list,
    };
    for scalar in scalars {
        // Non-numeric entries are dropped rather than failing the rule.
        if let Some(id) = scalar.as_i64()
            && !event_ids.contains(&id)
        {
            event_ids.push(id);
        }
    }
}

// =============================================================================
// Condition translation
// =============================================================================

/// Translate the source condition into a Gene condition string.
///
/// Supported shapes, in priority order: a fragment-map key (named alias),
/// `all of them`, and `N of them`. `N of them` expands to the disjunction of
/// all size-N combinations of the fragments, enumerated in the fragment
/// map's insertion order so identical input always yields identical output.
fn translate_condition(
    condition: Option<&Condition>,
    fragments: &IndexMap<String, String>,
) -> Result<String> {
    let expr = match condition {
        None => return Err(ConvertError::ConditionNotString("missing".to_string())),
        Some(Condition::Other(repr)) => {
            return Err(ConvertError::ConditionNotString(repr.clone()));
        }
        Some(Condition::Expr(s)) => s.as_str(),
    };

    if let Some(fragment) = fragments.get(expr) {
        return Ok(fragment.clone());
    }

    if expr.ends_with("of them") {
        let values: Vec<&str> = fragments.values().map(String::as_str).collect();
        let quantifier = expr.split_whitespace().next().unwrap_or("");

        if quantifier == "all" {
            if values.is_empty() {
                return Err(ConvertError::UnsupportedCondition(expr.to_string()));
            }
            return Ok(values.join(" and "));
        }

        if let Ok(n) = quantifier.parse::<usize>()
            && n >= 1
            && n <= values.len()
        {
            let parts: Vec<String> = combinations(&values, n)
                .iter()
                .map(|combo| format!("({})", combo.join(" and ")))
                .collect();
            return Ok(parts.join(" or "));
        }
        return Err(ConvertError::UnsupportedCondition(expr.to_string()));
    }

    Err(ConvertError::UnsupportedCondition(expr.to_string()))
}

/// All size-k combinations of `items`, in lexicographic index order.
fn combinations<'a>(items: &[&'a str], k: usize) -> Vec<Vec<&'a str>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());

        // Rightmost index that can still advance.
        let mut i = k;
        while i > 0 && indices[i - 1] == i - 1 + items.len() - k {
            i -= 1;
        }
        if i == 0 {
            return result;
        }
        indices[i - 1] += 1;
        for j in i..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
