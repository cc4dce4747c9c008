//! Tool catalog translation between the session protocol and model APIs.

pub use rmcp::model::{JsonObject, Tool};

/// Schema keys the model APIs reject in function parameter schemas.
pub const RESERVED_SCHEMA_KEYS: [&str; 2] = ["additionalProperties", "$schema"];

/// Copy of `schema` without the top-level [`RESERVED_SCHEMA_KEYS`].
///
/// Every other key is carried over untouched, nested schemas included.
pub fn strip_reserved_keys(schema: &JsonObject) -> JsonObject {
    schema
        .iter()
        .filter(|(key, _)| !RESERVED_SCHEMA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Names of all tools in a catalog, in catalog order.
pub fn tool_names(tools: &[Tool]) -> Vec<String> {
    tools.iter().map(|t| t.name.to_string()).collect()
}

/// Look a tool up by name.
pub fn find_tool<'a>(tools: &'a [Tool], name: &str) -> Option<&'a Tool> {
    tools.iter().find(|t| t.name == name)
}
