use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Default, Debug, Deserialize, Serialize, PartialEq, Copy, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MutationMode {
    /// Only register the read-only tools
    None,
    /// Register every tool, including those that change boards, items and issues
    #[default]
    All,
}

impl MutationMode {
    /// Whether a tool with the given read-only hint is available in this mode
    pub fn allows(&self, read_only: bool) -> bool {
        match self {
            MutationMode::None => read_only,
            MutationMode::All => true,
        }
    }
}
