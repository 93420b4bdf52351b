use reqwest::header::InvalidHeaderValue;
use tokio::task::JoinError;

use crate::graphql::GraphQLError;

/// An error raised while serving a single tool call
///
/// These never escape as protocol errors. They are rendered into an error
/// tool result so the client sees the message and the server keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required parameter is missing or empty, or a parameter has the wrong type
    #[error("{0}")]
    Validation(String),

    /// A lookup did not yield a usable node ID
    #[error("{0}")]
    Resolution(String),

    /// The GraphQL request itself failed
    #[error("{0}")]
    Remote(#[from] GraphQLError),
}

impl ToolError {
    pub(crate) fn missing_parameter(name: &str) -> Self {
        Self::Validation(format!("missing required parameter: {name}"))
    }
}

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("Missing environment variable: {0}")]
    EnvironmentVariable(String),

    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid GraphQL endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Failed to serve MCP transport: {0}")]
    Transport(String),

    #[error("Failed to start server")]
    StartupError(#[from] JoinError),
}

/// An MCP tool error
pub type McpError = rmcp::model::ErrorData;
