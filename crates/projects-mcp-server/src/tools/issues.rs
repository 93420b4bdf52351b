use apollo_compiler::ast::OperationType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ProjectsTool, Validate, non_empty, require};
use crate::errors::ToolError;
use crate::graphql::{GraphQLClient, InputVariables, NodeId, Operation};
use crate::owner::resolve_repository_id;

/// A repository issue
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Issue {
    pub id: NodeId,
    pub url: String,
    pub title: String,
}

/// Input for the create_project_issue tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct CreateProjectIssueInput {
    /// Repository owner
    owner: String,

    /// Repository name
    repo: String,

    /// Issue title
    title: String,

    /// Issue body
    body: Option<String>,
}

impl Validate for CreateProjectIssueInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("owner", &self.owner)?;
        require("repo", &self.repo)?;
        require("title", &self.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIssueInput {
    repository_id: NodeId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl CreateIssueInput {
    fn new(repository_id: NodeId, input: CreateProjectIssueInput) -> Self {
        Self {
            repository_id,
            title: input.title,
            body: non_empty(input.body),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateIssuePayload {
    issue: Issue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIssueResponse {
    create_issue: CreateIssuePayload,
}

pub(crate) struct CreateIssueMutation;

impl Operation for CreateIssueMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation CreateIssue($input: CreateIssueInput!) {
  createIssue(input: $input) {
    issue {
      id
      url
      title
    }
  }
}"#;
    type Variables = InputVariables<CreateIssueInput>;
    type Response = CreateIssueResponse;
}

pub struct CreateProjectIssue;

impl ProjectsTool for CreateProjectIssue {
    const NAME: &'static str = "create_project_issue";
    const TITLE: &'static str = "Create issue";
    const DESCRIPTION: &'static str = "Create a new issue";
    const READ_ONLY: bool = false;

    type Input = CreateProjectIssueInput;
    type Output = Issue;

    async fn call(client: &GraphQLClient, input: CreateProjectIssueInput) -> Result<Issue, ToolError> {
        let repository_id = resolve_repository_id(client, &input.owner, &input.repo).await?;
        let variables = CreateIssueInput::new(repository_id, input).into();
        Ok(client
            .execute::<CreateIssueMutation>(&variables)
            .await?
            .create_issue
            .issue)
    }
}
