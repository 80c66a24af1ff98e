//! # sigma2gene-convert
//!
//! Translates parsed Sigma rules into Gene rules: selection groups become
//! match expressions bound to symbolic variables (`$v0`, `$v1`, …), and the
//! source condition — a named alias, `all of them`, or `N of them` — becomes
//! a boolean expression over those variables. Partial quantifiers expand
//! combinatorially.
//!
//! Translation is per-rule and fallible by design: rules outside the
//! supported subset yield a [`ConvertError`] that callers report as a skip.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigma2gene_convert::translate_rule;
//! use sigma2gene_parser::{SourceDocument, parse_documents};
//!
//! let yaml = r#"
//! title: Suspicious Shell
//! logsource:
//!     service: sysmon
//! detection:
//!     selection:
//!         EventID: 1
//!         Image: '*cmd.exe'
//!     condition: selection
//! level: high
//! "#;
//!
//! let set = parse_documents(yaml);
//! let SourceDocument::Rule(rule) = &set.documents[0] else { panic!() };
//! let gene = translate_rule(rule, None, None).unwrap();
//! assert_eq!(gene.condition, "$v0");
//! ```

pub mod error;
pub mod gene;
pub mod matchexpr;
pub mod translate;

pub use error::{ConvertError, Result};
pub use gene::{DISCLAIMER, GeneMeta, GeneRule, SECURITY_CHANNEL, SYSMON_CHANNEL, criticality};
pub use matchexpr::field_match;
pub use translate::translate_rule;
