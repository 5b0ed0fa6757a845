use std::collections::BTreeSet;

use serde_json::Value;

/// Normalizes a stored `highlights` field into a set of tags.
///
/// Accepts a JSON list, or a string holding a JSON-encoded list. Anything
/// absent, undecodable or of another shape yields the empty set, which makes
/// the hotel unmatchable rather than failing the caller.
pub fn extract_highlights(raw: Option<&Value>) -> BTreeSet<String> {
    match raw {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(Value::Array(items)) => collect_strings(items),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => collect_strings(&items),
            Ok(_) => BTreeSet::new(),
            Err(e) => {
                tracing::debug!(error = %e, "Undecodable highlights field");
                BTreeSet::new()
            }
        },
        Some(_) => BTreeSet::new(),
    }
}

fn collect_strings(items: &[Value]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
