use crate::collaborators::CardRef;
use serde_json::Value;

// Keywords the Gemini schema dialect rejects.
const UNSUPPORTED_KEYS: [&str; 6] = ["$schema", "title", "format", "minimum", "default", "definitions"];

/// Converts a schemars JSON Schema into the OpenAPI subset Gemini accepts for
/// `responseSchema`: `["T", "null"]` becomes `T` with `nullable: true`.
pub fn to_gemini_schema(schema: Value) -> Value {
    match schema {
        Value::Object(mut map) => {
            for key in UNSUPPORTED_KEYS {
                map.remove(key);
            }
            if let Some(Value::Array(types)) = map.get("type").cloned() {
                let concrete: Vec<Value> = types
                    .iter()
                    .filter(|t| t.as_str() != Some("null"))
                    .cloned()
                    .collect();
                if concrete.len() < types.len() {
                    map.insert("nullable".to_string(), Value::Bool(true));
                }
                if let Some(first) = concrete.into_iter().next() {
                    map.insert("type".to_string(), first);
                }
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, to_gemini_schema(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(to_gemini_schema).collect()),
        other => other,
    }
}

pub fn card_list(cards: &[CardRef]) -> String {
    cards
        .iter()
        .map(|c| format!("{} (ID: {})", c.card_name, c.card_id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips code fences or chatter around a JSON object.
pub fn clean_json_output(raw: &str) -> String {
    if let Some(start) = raw.find('{') {
        if let Some(end) = raw.rfind('}') {
            if end > start {
                return raw[start..=end].to_string();
            }
        }
    }
    raw.trim().to_string()
}
