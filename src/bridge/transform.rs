use serde_json::{Map, Value};

use crate::utils::coerce_to_string;

/// Grouping maps added next to the index keys: `(output key, element field)`.
const GROUPINGS: [(&str, &str); 3] = [("byId", "id"), ("byReason", "reason"), ("byName", "name")];

/// Recursively replaces every array with an object keyed by index.
///
/// An array `[a, b]` becomes `{"0": a', "1": b'}` where `a'` and `b'` are
/// themselves transformed. When elements carry a non-null `id`, `reason` or
/// `name`, the object also gets `byId`, `byReason` or `byName` maps indexing
/// the same transformed elements by that field. Scalars pass through.
#[must_use]
pub fn transform_deep(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Object(array_to_keyed_object(items)),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), transform_deep(value)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn array_to_keyed_object(items: &[Value]) -> Map<String, Value> {
    let transformed: Vec<Value> = items.iter().map(transform_deep).collect();

    let mut out: Map<String, Value> = transformed
        .iter()
        .enumerate()
        .map(|(index, item)| (index.to_string(), item.clone()))
        .collect();

    for (grouping, field) in GROUPINGS {
        let group: Map<String, Value> = items
            .iter()
            .zip(&transformed)
            .filter_map(|(original, item)| {
                original
                    .get(field)
                    .and_then(coerce_to_string)
                    .map(|key| (key, item.clone()))
            })
            .collect();

        if !group.is_empty() {
            out.insert(grouping.to_string(), Value::Object(group));
        }
    }

    out
}
