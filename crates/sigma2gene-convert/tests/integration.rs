//! End-to-end translation tests: YAML in, Gene rules out.

use std::path::Path;

use sigma2gene_convert::{ConvertError, SYSMON_CHANNEL, translate_rule};
use sigma2gene_parser::{SourceDocument, SourceRule, parse_documents};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a YAML stream and split it into (skeleton, concrete rules).
fn load(yaml: &str) -> (Option<SourceRule>, Vec<SourceRule>) {
    let set = parse_documents(yaml);
    assert!(set.errors.is_empty(), "parse errors: {:?}", set.errors);

    let mut skeleton = None;
    let mut rules = Vec::new();
    for doc in set.documents {
        match doc {
            SourceDocument::Global(rule) => skeleton = Some(rule),
            SourceDocument::Rule(rule) => rules.push(rule),
        }
    }
    (skeleton, rules)
}

fn load_one(yaml: &str) -> SourceRule {
    let (skeleton, mut rules) = load(yaml);
    assert!(skeleton.is_none());
    assert_eq!(rules.len(), 1);
    rules.remove(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn sysmon_rule_end_to_end() {
    let rule = load_one(
        r#"
title: Suspicious Command Shell
author: someone
description: Command shell spawned somewhere odd
references:
    - https://example.com/writeup
logsource:
    service: sysmon
detection:
    selection:
        EventID: 1
        Image: '*cmd.exe'
    condition: selection
level: high
"#,
    );

    let gene = translate_rule(&rule, None, Some(Path::new("/rules/shell.yml"))).unwrap();

    assert_eq!(gene.name, "SuspiciousCommandShell");
    assert_eq!(gene.tags, vec!["Sigma", "Auto-generated"]);
    assert_eq!(gene.meta.channels, vec![SYSMON_CHANNEL]);
    assert_eq!(gene.meta.event_ids, vec![1]);
    assert_eq!(gene.meta.criticality, 8);
    assert!(!gene.meta.disable);
    assert_eq!(gene.meta.author.as_deref(), Some("someone"));
    assert_eq!(
        gene.meta.comments.as_deref(),
        Some("Command shell spawned somewhere odd")
    );
    assert_eq!(
        gene.meta.references,
        Some(vec!["https://example.com/writeup".to_string()])
    );
    assert_eq!(gene.meta.sigma_source.as_deref(), Some("shell.yml"));
    assert_eq!(gene.matches, vec!["$v0: Image ~= '(?i:.*cmd\\.exe)'"]);
    assert_eq!(gene.condition, "$v0");
}

#[test]
fn security_service_maps_to_security_channel() {
    let rule = load_one(
        r#"
title: Failed Logon Burst
logsource:
    service: Security
detection:
    selection:
        EventID: 4625
        LogonType: 3
    condition: selection
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    assert_eq!(gene.meta.channels, vec!["Security"]);
    assert_eq!(gene.meta.event_ids, vec![4625]);
    assert_eq!(gene.matches, vec!["$v0: LogonType = '3'"]);
    // No level given: mid-range default.
    assert_eq!(gene.meta.criticality, 5);
    assert_eq!(gene.meta.sigma_source, None);
}

#[test]
fn unknown_service_yields_no_channel() {
    let rule = load_one(
        r#"
title: Odd Service
logsource:
    service: applocker
detection:
    selection:
        EventID: 8002
    condition: all of them
"#,
    );
    // EventID-only selection: nothing to reference, so the quantifier fails,
    // but the channel logic is still observable through the error path only.
    assert!(translate_rule(&rule, None, None).is_err());

    let rule = load_one(
        r#"
title: Odd Service
logsource:
    service: applocker
detection:
    selection:
        EventID: 8002
        PolicyName: 'EXE'
    condition: selection
"#,
    );
    let gene = translate_rule(&rule, None, None).unwrap();
    assert!(gene.meta.channels.is_empty());
}

#[test]
fn variables_are_assigned_in_document_order() {
    let rule = load_one(
        r#"
title: Ordered
logsource:
    service: sysmon
detection:
    first:
        EventID: 1
        Image: 'a'
        CommandLine: 'b'
    second:
        EventID: 1
        User: 'c'
    condition: all of them
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    assert_eq!(
        gene.matches,
        vec![
            "$v0: Image ~= '(?i:a)'",
            "$v1: CommandLine ~= '(?i:b)'",
            "$v2: User ~= '(?i:c)'",
        ]
    );
    assert_eq!(gene.condition, "$v0 and $v1 and $v2");
    // Duplicate EventIDs across groups collapse.
    assert_eq!(gene.meta.event_ids, vec![1]);
}

#[test]
fn two_of_them_expands_combinatorially() {
    let rule = load_one(
        r#"
title: Quantified
logsource:
    service: sysmon
detection:
    a:
        EventID: 1
        Image: 'x'
    b:
        EventID: 1
        User: 'y'
    c:
        EventID: 1
        CommandLine: 'z'
    condition: 2 of them
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    assert_eq!(
        gene.condition,
        "($v0 and $v1) or ($v0 and $v2) or ($v1 and $v2)"
    );
}

#[test]
fn value_list_becomes_alternation() {
    let rule = load_one(
        r#"
title: Recon Tools
logsource:
    service: sysmon
detection:
    selection:
        EventID: 1
        Image:
            - '*\whoami.exe'
            - '*\hostname.exe'
    condition: selection
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    assert_eq!(
        gene.matches,
        vec![r"$v0: Image ~= '(?i:(.*\\whoami\.exe)|(.*\\hostname\.exe))'"]
    );
}

#[test]
fn skeleton_supplies_metadata_condition_and_defaults() {
    let yaml = r#"
action: global
title: Shared Detection
author: global author
description: shared description
level: medium
detection:
    selection:
        EventID: 1
    condition: selection
---
detection:
    selection:
        Image: 'first'
---
detection:
    selection:
        Image: 'second'
level: critical
"#;
    let (skeleton, rules) = load(yaml);
    let skeleton = skeleton.expect("skeleton");
    assert_eq!(rules.len(), 2);

    let first = translate_rule(&rules[0], Some(&skeleton), None).unwrap();
    assert_eq!(first.name, "SharedDetection");
    assert_eq!(first.meta.author.as_deref(), Some("global author"));
    assert_eq!(first.meta.comments.as_deref(), Some("shared description"));
    // Skeleton supplies the EventID scope and the condition.
    assert_eq!(first.meta.event_ids, vec![1]);
    assert_eq!(first.matches, vec!["$v0: Image ~= '(?i:first)'"]);
    assert_eq!(first.condition, "$v0");
    assert_eq!(first.meta.criticality, 6);

    // The rule's own level beats the skeleton's.
    let second = translate_rule(&rules[1], Some(&skeleton), None).unwrap();
    assert_eq!(second.meta.criticality, 10);
    assert_eq!(second.matches, vec!["$v0: Image ~= '(?i:second)'"]);
}

#[test]
fn group_without_eventid_is_rejected() {
    let rule = load_one(
        r#"
title: No Scope
logsource:
    service: sysmon
detection:
    selection:
        Image: '*cmd.exe'
    condition: selection
"#,
    );

    assert_eq!(
        translate_rule(&rule, None, None),
        Err(ConvertError::IncompatibleSelection("selection".to_string()))
    );
}

#[test]
fn keyword_group_is_rejected() {
    let rule = load_one(
        r#"
title: Keywords
detection:
    keywords:
        - 'mimikatz'
    condition: keywords
"#,
    );

    assert!(matches!(
        translate_rule(&rule, None, None),
        Err(ConvertError::IncompatibleSelection(_))
    ));
}

#[test]
fn empty_group_is_skipped_not_fatal() {
    let rule = load_one(
        r#"
title: Has Empty Group
logsource:
    service: sysmon
detection:
    unused:
    selection:
        EventID: 1
        Image: 'x'
    condition: selection
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    assert_eq!(gene.condition, "$v0");
}

#[test]
fn condition_list_is_rejected() {
    let rule = load_one(
        r#"
title: Multi Condition
detection:
    selection:
        EventID: 1
        Image: 'x'
    condition:
        - selection
"#,
    );

    assert!(matches!(
        translate_rule(&rule, None, None),
        Err(ConvertError::ConditionNotString(_))
    ));
}

#[test]
fn missing_title_and_detection_are_per_rule_errors() {
    let untitled = load_one(
        r#"
detection:
    selection:
        EventID: 1
    condition: selection
"#,
    );
    assert_eq!(
        translate_rule(&untitled, None, None),
        Err(ConvertError::MissingTitle)
    );

    let no_detection = load_one("title: Empty Rule\n");
    assert_eq!(
        translate_rule(&no_detection, None, None),
        Err(ConvertError::MissingDetection)
    );
}

#[test]
fn eventid_values_accept_strings_and_lists() {
    let rule = load_one(
        r#"
title: Mixed IDs
logsource:
    service: security
detection:
    selection:
        EventID:
            - 4624
            - '4625'
            - bogus
        User: '*admin*'
    condition: selection
"#,
    );

    let gene = translate_rule(&rule, None, None).unwrap();
    // Numeric strings cast; non-numeric entries are dropped.
    assert_eq!(gene.meta.event_ids, vec![4624, 4625]);
}

#[test]
fn serialized_output_matches_wire_shape() {
    let rule = load_one(
        r#"
title: Wire Shape
logsource:
    service: sysmon
detection:
    selection:
        EventID: 1
        Image: '*cmd.exe'
    condition: selection
level: high
"#,
    );

    let gene = translate_rule(&rule, None, Some(Path::new("wire.yml"))).unwrap();
    let json = serde_json::to_string(&gene).unwrap();

    assert!(json.starts_with(r#"{"Name":"WireShape","Tags":["Sigma","Auto-generated"],"Meta":{"EventIDs":[1],"#));
    assert!(json.contains(r#""Channels":["Microsoft-Windows-Sysmon/Operational"]"#));
    assert!(json.contains(r#""Computers":[],"Traces":[],"Criticality":8,"Disable":false"#));
    assert!(json.contains(r#""Author":null"#));
    assert!(json.contains(r#""SigmaSource":"wire.yml""#));
    assert!(json.contains(r#""Matches":["$v0: Image ~= '(?i:.*cmd\\.exe)'"]"#));
    assert!(json.ends_with(r#""Condition":"$v0"}"#));
}
