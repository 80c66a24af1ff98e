//! Field match expressions.
//!
//! One selection field becomes one Gene match expression bound to a symbolic
//! variable: integers match by equality, everything else by case-insensitive
//! regex with Sigma `*` wildcards rewritten to `.*`.

use sigma2gene_parser::{FieldValue, Scalar};

/// Build the Gene match expression for one selection field.
pub fn field_match(var: &str, field: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Many(values) => {
            // Alternation is assembled before escaping; its parentheses and
            // pipes must survive as regex structure.
            let alternatives: Vec<String> =
                values.iter().map(|v| format!("({v})")).collect();
            regex_match(var, field, &alternatives.join("|"))
        }
        FieldValue::Single(Scalar::Integer(n)) => format!("{var}: {field} = '{n}'"),
        FieldValue::Single(Scalar::Bool(b)) => format!("{var}: {field} = '{b}'"),
        FieldValue::Single(scalar) => regex_match(var, field, &scalar.to_string()),
    }
}

/// Case-insensitive regex match with wildcards rewritten.
///
/// Escape order is load-bearing: backslashes are doubled before dots are
/// escaped so the backslashes inserted by dot-escaping are not doubled again,
/// and `*` is rewritten last so the dot it inserts stays unescaped.
fn regex_match(var: &str, field: &str, pattern: &str) -> String {
    let escaped = pattern
        .replace('\\', "\\\\")
        .replace('.', "\\.")
        .replace('*', ".*");
    format!("{var}: {field} ~= '(?i:{escaped})'")
}
