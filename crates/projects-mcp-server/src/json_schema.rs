use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde_json::Value;

/// Generate the JSON schema advertised for a tool's input type
pub fn schema_from_type<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => schema,
        _ => JsonObject::default(),
    }
}
