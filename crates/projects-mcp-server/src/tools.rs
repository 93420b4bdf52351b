//! The tools exposed over MCP and the registry that dispatches calls to them

use std::future::Future;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, Content, ErrorCode, JsonObject, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{McpError, ToolError};
use crate::graphql::GraphQLClient;
use crate::json_schema::schema_from_type;
use crate::mutation_mode::MutationMode;

pub mod issues;
pub mod items;
pub mod projects;

#[cfg(test)]
mod toolsnaps;

/// The number of records requested by every listing query
pub const PAGE_SIZE: usize = 100;

/// One page of a listing
///
/// Listings never follow pagination cursors, so a full page means there may be
/// more records than were returned.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub possibly_truncated: bool,
}

/// The `nodes` of a GraphQL connection
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    nodes: Vec<Option<T>>,
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(connection: Connection<T>) -> Self {
        let possibly_truncated = connection.nodes.len() >= PAGE_SIZE;
        Self {
            nodes: connection.nodes.into_iter().flatten().collect(),
            possibly_truncated,
        }
    }
}

/// Checks a tool input beyond what deserialization already enforces
pub trait Validate {
    fn validate(&self) -> Result<(), ToolError>;
}

/// Fail if a required string parameter is empty
pub(crate) fn require(name: &str, value: &str) -> Result<(), ToolError> {
    if value.is_empty() {
        Err(ToolError::missing_parameter(name))
    } else {
        Ok(())
    }
}

/// Keep an optional string only if it is non-empty
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// A single MCP tool backed by the GitHub GraphQL API
pub trait ProjectsTool {
    /// The name the tool is registered and called under
    const NAME: &'static str;

    /// A short human readable title
    const TITLE: &'static str;

    const DESCRIPTION: &'static str;

    /// Whether the tool leaves remote state untouched
    const READ_ONLY: bool;

    type Input: JsonSchema + DeserializeOwned + Validate + Send + 'static;
    type Output: Serialize + Send + 'static;

    fn call(
        client: &GraphQLClient,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, ToolError>> + Send;
}

/// Build the descriptor advertised for a tool
pub fn descriptor<T: ProjectsTool>() -> Tool {
    Tool::new(T::NAME, T::DESCRIPTION, schema_from_type::<T::Input>())
        .annotate(ToolAnnotations::with_title(T::TITLE).read_only(T::READ_ONLY))
}

type Handler = fn(GraphQLClient, JsonObject) -> BoxFuture<'static, Result<CallToolResult, McpError>>;

struct Registered {
    tool: Tool,
    handler: Handler,
}

/// The set of tools available to clients, fixed at startup
pub struct Tools {
    registered: Vec<Registered>,
}

impl Tools {
    pub fn new(mutation_mode: MutationMode) -> Self {
        let mut tools = Self {
            registered: Vec::new(),
        };

        tools.register::<projects::ListProjects>(mutation_mode);
        tools.register::<projects::GetProjectFields>(mutation_mode);
        tools.register::<projects::GetProjectItems>(mutation_mode);
        tools.register::<issues::CreateProjectIssue>(mutation_mode);
        tools.register::<items::AddIssueToProject>(mutation_mode);
        tools.register::<items::UpdateProjectItemField>(mutation_mode);
        tools.register::<items::CreateDraftIssue>(mutation_mode);
        tools.register::<items::DeleteProjectItem>(mutation_mode);
        tools.register::<projects::CreateProject>(mutation_mode);
        tools.register::<projects::UpdateProject>(mutation_mode);
        tools.register::<projects::DeleteProject>(mutation_mode);
        tools.register::<items::UpdateProjectItem>(mutation_mode);
        tools.register::<items::UpdateProjectItemPosition>(mutation_mode);
        tools.register::<items::ConvertProjectItemToIssue>(mutation_mode);

        debug!(
            count = tools.registered.len(),
            ?mutation_mode,
            "Registered tools"
        );
        tools
    }

    fn register<T: ProjectsTool + 'static>(&mut self, mutation_mode: MutationMode) {
        if mutation_mode.allows(T::READ_ONLY) {
            self.registered.push(Registered {
                tool: descriptor::<T>(),
                handler: invoke::<T>,
            });
        }
    }

    /// The descriptors of every registered tool, in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &Tool> {
        self.registered.iter().map(|registered| &registered.tool)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Dispatch a call by tool name
    ///
    /// Failures of the call itself are returned as an error tool result. Only
    /// an unknown tool name is a protocol error.
    pub async fn call(
        &self,
        client: &GraphQLClient,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, McpError> {
        let registered = self
            .registered
            .iter()
            .find(|registered| registered.tool.name == name)
            .ok_or_else(|| tool_not_found(name))?;

        debug!(tool = name, "Calling tool");
        if let Err(error) = check_required(&registered.tool.input_schema, &arguments) {
            return Ok(failure(name, error));
        }
        (registered.handler)(client.clone(), arguments).await
    }
}

/// Report the first required parameter that is absent or null
fn check_required(schema: &JsonObject, arguments: &JsonObject) -> Result<(), ToolError> {
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);

    for name in required {
        if arguments.get(name).is_none_or(Value::is_null) {
            return Err(ToolError::missing_parameter(name));
        }
    }
    Ok(())
}

fn invoke<T: ProjectsTool + 'static>(
    client: GraphQLClient,
    arguments: JsonObject,
) -> BoxFuture<'static, Result<CallToolResult, McpError>> {
    async move {
        match run::<T>(&client, arguments).await {
            Ok(output) => serde_json::to_string(&output)
                .map(|text| CallToolResult::success(vec![Content::text(text)]))
                .map_err(|e| {
                    McpError::internal_error(
                        format!("Failed to serialize the {} result: {e}", T::NAME),
                        None,
                    )
                }),
            Err(error) => Ok(failure(T::NAME, error)),
        }
    }
    .boxed()
}

async fn run<T: ProjectsTool>(
    client: &GraphQLClient,
    arguments: JsonObject,
) -> Result<T::Output, ToolError> {
    let input = serde_json::from_value::<T::Input>(Value::Object(arguments))
        .map_err(|e| ToolError::Validation(format!("invalid parameters: {e}")))?;
    input.validate()?;
    T::call(client, input).await
}

fn failure(tool: &str, error: ToolError) -> CallToolResult {
    warn!(tool, %error, "Tool call failed");
    CallToolResult::error(vec![Content::text(error.to_string())])
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::{CallToolResult, JsonObject, RawContent};
    use serde_json::Value;

    use super::{ProjectsTool, invoke};
    use crate::graphql::GraphQLClient;

    /// Run a tool's handler directly, bypassing the registry
    pub(crate) async fn call<T: ProjectsTool + 'static>(
        client: &GraphQLClient,
        arguments: Value,
    ) -> CallToolResult {
        let Value::Object(arguments) = arguments else {
            panic!("tool arguments must be an object");
        };
        invoke::<T>(client.clone(), arguments).await.unwrap()
    }

    /// The text of the first content block of a result
    pub(crate) fn text(result: &CallToolResult) -> &str {
        match result.content.first().map(|content| &content.raw) {
            Some(RawContent::Text(text)) => &text.text,
            _ => panic!("expected a text result"),
        }
    }

    /// The JSON payload of a successful result
    pub(crate) fn json(result: &CallToolResult) -> Value {
        assert_ne!(result.is_error, Some(true), "unexpected failure: {}", text(result));
        serde_json::from_str(text(result)).unwrap()
    }

    /// The message of a failed result
    pub(crate) fn error_message(result: &CallToolResult) -> &str {
        assert_eq!(result.is_error, Some(true));
        text(result)
    }

    pub(crate) fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            _ => panic!("expected an object"),
        }
    }
}
