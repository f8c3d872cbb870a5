use serde_json::Value;

/// Remove null-valued object fields at every depth.
///
/// Array elements are never removed, even when null, since that would shift
/// the position of every element after them. Objects nested inside arrays
/// are still cleaned.
pub(crate) fn strip_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_null_fields);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_null_fields),
        _ => {}
    }
}
