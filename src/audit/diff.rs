//! Field diffs for audit entries
//!
//! Produces a one-line summary of top-level field changes between two entity
//! snapshots, e.g. `balance: 0 -> 500000, updated_at: ...`.

use serde_json::Value;

/// Fields left out of summaries because they change on every write
const NOISY_FIELDS: [&str; 1] = ["updated_at"];

/// Longest string value shown before truncation, in characters
const MAX_STRING_CHARS: usize = 40;

/// Summarize the top-level differences between two snapshots
///
/// Returns `None` when nothing but noisy fields changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if NOISY_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (none)", key, format_value(before_val))),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) && !NOISY_FIELDS.contains(&key.as_str()) {
                    changes.push(format!("{}: (none) -> {}", key, format_value(after_val)));
                }
            }

            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} elementos]", arr.len()),
        Value::Object(obj) => format!("{{{} campos}}", obj.len()),
    }
}
