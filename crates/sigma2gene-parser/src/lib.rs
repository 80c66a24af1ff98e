//! # sigma2gene-parser
//!
//! Parsing for the subset of the Sigma rule format consumed by the
//! sigma2gene converter:
//!
//! - **Rule documents**: title, author, description, references, level,
//!   logsource, and the detection section
//! - **Detection sections**: named selection groups (field → value(s)),
//!   decoded once into tagged entries, in document order
//! - **Rule collections**: multi-document YAML, `action: global` skeleton
//!   documents, and the skeleton merge policy
//!
//! Field modifiers, correlations, filters, and nested boolean conditions are
//! outside this subset; rules using them are decoded structurally and
//! rejected per-rule by the converter.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigma2gene_parser::{SourceDocument, parse_documents};
//!
//! let yaml = r#"
//! title: Detect Whoami
//! logsource:
//!     service: sysmon
//! detection:
//!     selection:
//!         EventID: 1
//!         CommandLine: '*whoami*'
//!     condition: selection
//! level: medium
//! "#;
//!
//! let set = parse_documents(yaml);
//! assert!(set.errors.is_empty());
//! let SourceDocument::Rule(rule) = &set.documents[0] else { panic!() };
//! assert_eq!(rule.title.as_deref(), Some("Detect Whoami"));
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod value;

pub use ast::{
    Condition, DetectionEntry, Detections, Level, LogSource, SourceDocument, SourceRule,
};
pub use error::{ParserError, Result};
pub use parser::{DocumentSet, find_rule_files, parse_documents, parse_file};
pub use value::{FieldValue, Scalar};
