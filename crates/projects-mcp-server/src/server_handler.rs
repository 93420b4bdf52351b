use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use tracing::debug;

use crate::errors::McpError;
use crate::graphql::GraphQLClient;
use crate::tools::Tools;

const INSTRUCTIONS: &str = "Tools for managing GitHub Projects boards, their items and fields. \
Owner logins are organizations unless owner_type is user. Use get_project_fields to find field IDs \
before updating item fields.";

#[derive(Clone)]
pub struct ProjectsServerHandler {
    tools: Arc<Tools>,
    client: GraphQLClient,
}

impl ProjectsServerHandler {
    pub fn new(tools: Arc<Tools>, client: GraphQLClient) -> Self {
        Self { tools, client }
    }

    pub(crate) async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        self.tools
            .call(&self.client, name, arguments.unwrap_or_default())
            .await
    }
}

impl ServerHandler for ProjectsServerHandler {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tokio::select! {
            result = self.call(&request.name, request.arguments.clone()) => result,
            _ = context.ct.cancelled() => {
                debug!(tool = %request.name, "Tool call cancelled");
                Err(McpError::internal_error(
                    format!("Call to {} was cancelled", request.name),
                    None,
                ))
            }
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools.descriptors().cloned().collect(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}
