//! Execute GraphQL operations against the GitHub API

use std::fmt;
use std::time::Duration;

use apollo_compiler::ast::{Definition, OperationType};
use apollo_compiler::parser::Parser;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// An opaque GitHub node ID
///
/// Node IDs carry no structure the server relies on. They are passed through
/// to the API exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A GraphQL document together with the shapes it sends and receives
pub trait Operation {
    /// Whether the document holds a query or a mutation
    const KIND: OperationType;

    /// The GraphQL document. It must hold exactly one named operation.
    const DOCUMENT: &'static str;

    /// The variables sent alongside the document
    type Variables: Serialize + Sync;

    /// The subset of `data` the caller needs
    type Response: DeserializeOwned + Send;
}

/// Variables for mutations that take a single `$input` object
#[derive(Debug, Serialize)]
pub struct InputVariables<T> {
    pub input: T,
}

impl<T> From<T> for InputVariables<T> {
    fn from(input: T) -> Self {
        Self { input }
    }
}

/// The payload selected by mutations that only confirm they ran
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Typename {
    #[serde(rename = "__typename")]
    pub typename: String,
}

/// A single entry from the `errors` array of a GraphQL response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// An error executing a GraphQL operation
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    #[error("{0}")]
    Request(#[source] reqwest::Error),

    #[error("GraphQL endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("{}", join_messages(.0))]
    Response(Vec<ErrorMessage>),

    #[error("Failed to decode GraphQL response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("GraphQL response contained no data")]
    MissingData,

    #[error("Invalid GraphQL document: {0}")]
    Document(String),
}

fn join_messages(errors: &[ErrorMessage]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a, V> {
    query: &'a str,
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ErrorMessage>>,
}

impl RawResponse {
    /// Decode `data`, falling back to the reported errors when it is unusable.
    ///
    /// GitHub reports a NOT_FOUND error for every root field that fails to
    /// resolve while still returning the others, so errors that accompany
    /// data of the expected shape are logged rather than returned.
    fn into_data<T: DeserializeOwned>(self) -> Result<T, GraphQLError> {
        let errors = self.errors.unwrap_or_default();
        let decoded = self
            .data
            .filter(|data| !data.is_null())
            .map(serde_json::from_value::<T>);

        match decoded {
            Some(Ok(data)) => {
                if !errors.is_empty() {
                    warn!(
                        errors = %join_messages(&errors),
                        "GraphQL response carried errors alongside usable data"
                    );
                }
                Ok(data)
            }
            Some(Err(_)) | None if !errors.is_empty() => Err(GraphQLError::Response(errors)),
            Some(Err(error)) => Err(GraphQLError::Decode(error)),
            None => Err(GraphQLError::MissingData),
        }
    }
}

/// Extract the name of the single operation held by a document
pub fn operation_name(document: &str, kind: OperationType) -> Result<String, GraphQLError> {
    let document = Parser::new()
        .parse_ast(document, "operation.graphql")
        .map_err(|e| GraphQLError::Document(e.to_string()))?;

    let mut operations = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        });

    match (operations.next(), operations.next()) {
        (Some(operation), None) if operation.operation_type == kind => operation
            .name
            .as_ref()
            .map(|name| name.to_string())
            .ok_or_else(|| GraphQLError::Document("operation is missing its name".to_string())),
        (Some(operation), None) => Err(GraphQLError::Document(format!(
            "expected a {kind:?} operation but found a {:?}",
            operation.operation_type
        ))),
        (None, _) => Err(GraphQLError::Document("no operations defined".to_string())),
        (Some(_), Some(_)) => Err(GraphQLError::Document(
            "expected exactly one operation".to_string(),
        )),
    }
}

/// A client for a single GraphQL endpoint
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct GraphQLClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl GraphQLClient {
    /// Build a client sending `headers` with every request to `endpoint`
    pub fn new(endpoint: Url, headers: HeaderMap, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute an operation and decode its response
    pub async fn execute<O: Operation>(
        &self,
        variables: &O::Variables,
    ) -> Result<O::Response, GraphQLError> {
        let operation_name = operation_name(O::DOCUMENT, O::KIND)?;
        debug!(operation = %operation_name, endpoint = %self.endpoint, "Executing GraphQL operation");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&RequestBody {
                query: O::DOCUMENT,
                operation_name: &operation_name,
                variables,
            })
            .send()
            .await
            .map_err(GraphQLError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphQLError::Status { status, body });
        }

        response
            .json::<RawResponse>()
            .await
            .map_err(GraphQLError::Request)?
            .into_data()
    }
}
