use projects_mcp_server::mutation_mode::MutationMode;
use schemars::JsonSchema;
use serde::Deserialize;

/// Overridable flags
#[derive(Debug, Deserialize, Default, JsonSchema)]
#[serde(default)]
pub struct Overrides {
    /// Set the mutation mode access level for the MCP server
    pub mutation_mode: MutationMode,
}
