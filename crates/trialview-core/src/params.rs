//! Hyperparameter formatting: reformatting, tree flattening and JSON text.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};

use crate::error::Result;

/// Key under which architecture-search trials keep their sampled choices.
pub const VISUAL_PARAMETERS_KEY: &str = "mutation_summary";

/// Whether the raw parameters carry architecture-search choices.
pub fn has_visual_parameters(raw: &Value) -> bool {
    raw.as_object()
        .is_some_and(|map| map.contains_key(VISUAL_PARAMETERS_KEY))
}

/// Display form of the parameters: the architecture-search summary when
/// present, otherwise the parameters unchanged.
pub fn reformat_parameters(raw: &Value) -> Value {
    match raw.get(VISUAL_PARAMETERS_KEY) {
        Some(summary) if raw.is_object() => summary.clone(),
        _ => raw.clone(),
    }
}

/// Text placed on the clipboard by "Copy as json" (4-space indent).
pub fn copy_text(raw: &Value) -> Result<String> {
    to_indented_json(&reformat_parameters(raw), b"    ")
}

/// Text shown in the original parameters viewer (2-space indent).
pub fn original_text(raw: &Value) -> Result<String> {
    to_indented_json(raw, b"  ")
}

fn to_indented_json(value: &Value, indent: &[u8]) -> Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent));
    integral_floats_as_ints(value).serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Rewrite floats with no fractional part as integers, so `1.0` prints as `1`
/// the way browsers print JSON numbers.
pub fn integral_floats_as_ints(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(integral_number(n)),
        Value::Array(items) => Value::Array(items.iter().map(integral_floats_as_ints).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), integral_floats_as_ints(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn integral_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

/// One visible row of the parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Nesting level; children of the hidden root are at depth 0.
    pub depth: usize,
    pub key: String,
    pub value: TreeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    /// Object or array; its members follow at `depth + 1`.
    Branch,
    /// Scalar rendered as display text.
    Leaf(String),
}

/// Flatten a value into fully expanded tree rows, hiding the root.
///
/// A scalar root produces a single row with an empty key.
pub fn flatten_tree(value: &Value) -> Vec<TreeNode> {
    let mut rows = Vec::new();
    match value {
        Value::Object(_) | Value::Array(_) => push_children(value, 0, &mut rows),
        scalar => rows.push(TreeNode {
            depth: 0,
            key: String::new(),
            value: TreeValue::Leaf(leaf_text(scalar)),
        }),
    }
    rows
}

fn push_children(value: &Value, depth: usize, rows: &mut Vec<TreeNode>) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => return,
    };
    for (key, child) in children {
        match child {
            Value::Object(_) | Value::Array(_) => {
                rows.push(TreeNode {
                    depth,
                    key,
                    value: TreeValue::Branch,
                });
                push_children(child, depth + 1, rows);
            }
            scalar => rows.push(TreeNode {
                depth,
                key,
                value: TreeValue::Leaf(leaf_text(scalar)),
            }),
        }
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Null => "null".to_string(),
        Value::Number(n) => integral_number(n).to_string(),
        other => other.to_string(),
    }
}
