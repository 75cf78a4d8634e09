use serde::Serialize;
use serde_json::Value;

fn sort_object_keys(v: &mut Value) {
    match v {
        Value::Array(items) => {
            for item in items.iter_mut() {
                sort_object_keys(item);
            }
        }
        Value::Object(map) => {
            let mut fields: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (_, field) in fields.iter_mut() {
                sort_object_keys(field);
            }
            *map = fields.into_iter().collect();
        }
        _ => {}
    }
}

/// Pretty JSON with recursively sorted object keys, so DB files and
/// `--format json` output are byte-stable across runs.
pub fn stable_to_string_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut v = serde_json::to_value(value)?;
    sort_object_keys(&mut v);
    serde_json::to_string_pretty(&v)
}
