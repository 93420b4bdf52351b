//! Tools that list, inspect, create, update and delete project boards

use std::num::NonZeroU32;

use apollo_compiler::ast::OperationType;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::debug;

use super::{Connection, PAGE_SIZE, Page, ProjectsTool, Validate, non_empty, require};
use crate::errors::ToolError;
use crate::graphql::{GraphQLClient, InputVariables, NodeId, Operation, Typename};
use crate::owner::{Node, OwnerType, resolve_owner_id};

/// A board as returned by mutations
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub id: NodeId,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectPayload {
    #[serde(rename = "projectV2")]
    project: Project,
}

/// Selections made under both `user` and `organization`, only one of which is requested
#[derive(Debug, Deserialize)]
pub(crate) struct OwnerScoped<T> {
    user: Option<T>,
    organization: Option<T>,
}

impl<T> OwnerScoped<T> {
    fn select(self, owner_type: OwnerType, login: &str) -> Result<T, ToolError> {
        match owner_type {
            OwnerType::User => self.user,
            OwnerType::Organization => self.organization,
        }
        .ok_or_else(|| {
            ToolError::Resolution(format!("could not find {} {login}", owner_type.as_str()))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnerVariables {
    login: String,
    is_user: bool,
    first: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectVariables {
    login: String,
    is_user: bool,
    number: NonZeroU32,
    first: usize,
}

/// Input for the list_projects tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct OwnerInput {
    /// Owner login (user or organization)
    owner: String,

    /// Owner type, defaults to organization
    #[serde(default, deserialize_with = "OwnerType::deserialize_or_default")]
    owner_type: OwnerType,
}

impl Validate for OwnerInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("owner", &self.owner)
    }
}

/// Read a project number from any JSON number holding a positive integer
fn project_number<'de, D>(deserializer: D) -> Result<NonZeroU32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    (value.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(&value))
        .then(|| NonZeroU32::new(value as u32))
        .flatten()
        .ok_or_else(|| {
            de::Error::invalid_value(
                de::Unexpected::Float(value),
                &"a positive integer project number",
            )
        })
}

/// Input for tools that address a single board by owner and number
#[derive(Debug, JsonSchema, Deserialize)]
pub struct ProjectNumberInput {
    /// Owner login (user or organization)
    owner: String,

    /// Owner type, defaults to organization
    #[serde(default, deserialize_with = "OwnerType::deserialize_or_default")]
    owner_type: OwnerType,

    /// Project number
    #[serde(deserialize_with = "project_number")]
    #[schemars(with = "NonZeroU32")]
    number: NonZeroU32,
}

impl Validate for ProjectNumberInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("owner", &self.owner)
    }
}

impl ProjectNumberInput {
    fn variables(&self) -> ProjectVariables {
        ProjectVariables {
            login: self.owner.clone(),
            is_user: self.owner_type.is_user(),
            number: self.number,
            first: PAGE_SIZE,
        }
    }

    fn project_not_found(&self) -> ToolError {
        ToolError::Resolution(format!(
            "could not find project {} for {} {}",
            self.number,
            self.owner_type.as_str(),
            self.owner
        ))
    }
}

/// A board as returned by listings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectSummary {
    pub id: NodeId,
    pub title: String,
    pub number: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsOwner {
    #[serde(rename = "projectsV2")]
    projects: Connection<ProjectSummary>,
}

pub(crate) struct ListProjectsQuery;

impl Operation for ListProjectsQuery {
    const KIND: OperationType = OperationType::Query;
    const DOCUMENT: &'static str = r#"query ListProjects($login: String!, $isUser: Boolean!, $first: Int!) {
  user(login: $login) @include(if: $isUser) {
    projectsV2(first: $first) {
      nodes {
        id
        title
        number
      }
    }
  }
  organization(login: $login) @skip(if: $isUser) {
    projectsV2(first: $first) {
      nodes {
        id
        title
        number
      }
    }
  }
}"#;
    type Variables = OwnerVariables;
    type Response = OwnerScoped<ProjectsOwner>;
}

pub struct ListProjects;

impl ProjectsTool for ListProjects {
    const NAME: &'static str = "list_projects";
    const TITLE: &'static str = "List projects";
    const DESCRIPTION: &'static str = "List Projects for a user or organization";
    const READ_ONLY: bool = true;

    type Input = OwnerInput;
    type Output = Page<ProjectSummary>;

    async fn call(client: &GraphQLClient, input: OwnerInput) -> Result<Self::Output, ToolError> {
        let owner_type = input.owner_type;
        let owner = client
            .execute::<ListProjectsQuery>(&OwnerVariables {
                login: input.owner.clone(),
                is_user: owner_type.is_user(),
                first: PAGE_SIZE,
            })
            .await?
            .select(owner_type, &input.owner)?;
        Ok(owner.projects.into())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectOwner<T> {
    #[serde(rename = "projectV2")]
    project: Option<T>,
}

/// A field definition of a board
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectField {
    pub id: NodeId,
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectFields {
    fields: Connection<ProjectField>,
}

pub(crate) struct GetProjectFieldsQuery;

impl Operation for GetProjectFieldsQuery {
    const KIND: OperationType = OperationType::Query;
    const DOCUMENT: &'static str = r#"query GetProjectFields($login: String!, $isUser: Boolean!, $number: Int!, $first: Int!) {
  user(login: $login) @include(if: $isUser) {
    projectV2(number: $number) {
      fields(first: $first) {
        nodes {
          ... on ProjectV2FieldCommon {
            id
            name
            dataType
          }
        }
      }
    }
  }
  organization(login: $login) @skip(if: $isUser) {
    projectV2(number: $number) {
      fields(first: $first) {
        nodes {
          ... on ProjectV2FieldCommon {
            id
            name
            dataType
          }
        }
      }
    }
  }
}"#;
    type Variables = ProjectVariables;
    type Response = OwnerScoped<ProjectOwner<ProjectFields>>;
}

pub struct GetProjectFields;

impl ProjectsTool for GetProjectFields {
    const NAME: &'static str = "get_project_fields";
    const TITLE: &'static str = "Get project fields";
    const DESCRIPTION: &'static str = "Get fields for a project";
    const READ_ONLY: bool = true;

    type Input = ProjectNumberInput;
    type Output = Page<ProjectField>;

    async fn call(
        client: &GraphQLClient,
        input: ProjectNumberInput,
    ) -> Result<Self::Output, ToolError> {
        let project = client
            .execute::<GetProjectFieldsQuery>(&input.variables())
            .await?
            .select(input.owner_type, &input.owner)?
            .project
            .ok_or_else(|| input.project_not_found())?;
        Ok(project.fields.into())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectItems {
    items: Connection<Node>,
}

pub(crate) struct GetProjectItemsQuery;

impl Operation for GetProjectItemsQuery {
    const KIND: OperationType = OperationType::Query;
    const DOCUMENT: &'static str = r#"query GetProjectItems($login: String!, $isUser: Boolean!, $number: Int!, $first: Int!) {
  user(login: $login) @include(if: $isUser) {
    projectV2(number: $number) {
      items(first: $first) {
        nodes {
          id
        }
      }
    }
  }
  organization(login: $login) @skip(if: $isUser) {
    projectV2(number: $number) {
      items(first: $first) {
        nodes {
          id
        }
      }
    }
  }
}"#;
    type Variables = ProjectVariables;
    type Response = OwnerScoped<ProjectOwner<ProjectItems>>;
}

pub struct GetProjectItems;

impl ProjectsTool for GetProjectItems {
    const NAME: &'static str = "get_project_items";
    const TITLE: &'static str = "Get project items";
    const DESCRIPTION: &'static str = "Get items for a project";
    const READ_ONLY: bool = true;

    type Input = ProjectNumberInput;
    type Output = Page<Node>;

    async fn call(
        client: &GraphQLClient,
        input: ProjectNumberInput,
    ) -> Result<Self::Output, ToolError> {
        let project = client
            .execute::<GetProjectItemsQuery>(&input.variables())
            .await?
            .select(input.owner_type, &input.owner)?
            .project
            .ok_or_else(|| input.project_not_found())?;
        Ok(project.items.into())
    }
}

/// Input for the create_project tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct CreateProjectInput {
    /// Owner login (user or organization)
    owner: String,

    /// Owner type, defaults to organization
    #[serde(default, deserialize_with = "OwnerType::deserialize_or_default")]
    owner_type: OwnerType,

    /// Project title
    title: String,

    /// Whether the project should be public. Not applied on creation, use update_project afterwards.
    public: Option<bool>,

    /// Short project description. Not applied on creation, use update_project afterwards.
    short_description: Option<String>,
}

impl Validate for CreateProjectInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("owner", &self.owner)?;
        require("title", &self.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProjectV2Input {
    owner_id: NodeId,
    title: String,
}

impl CreateProjectV2Input {
    /// The mutation input for a board owned by `owner_id`
    ///
    /// Visibility and description cannot be set at creation time, so they are
    /// never part of the input.
    fn new(owner_id: NodeId, input: CreateProjectInput) -> Self {
        if input.public.is_some() || input.short_description.is_some() {
            debug!(
                public = ?input.public,
                short_description = ?input.short_description,
                "Ignoring parameters that cannot be set when creating a project"
            );
        }
        Self {
            owner_id,
            title: input.title,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProjectResponse {
    create_project_v2: ProjectPayload,
}

pub(crate) struct CreateProjectMutation;

impl Operation for CreateProjectMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation CreateProject($input: CreateProjectV2Input!) {
  createProjectV2(input: $input) {
    projectV2 {
      id
      url
      title
    }
  }
}"#;
    type Variables = InputVariables<CreateProjectV2Input>;
    type Response = CreateProjectResponse;
}

pub struct CreateProject;

impl ProjectsTool for CreateProject {
    const NAME: &'static str = "create_project";
    const TITLE: &'static str = "Create project";
    const DESCRIPTION: &'static str = "Create a new Project V2 board";
    const READ_ONLY: bool = false;

    type Input = CreateProjectInput;
    type Output = Project;

    async fn call(client: &GraphQLClient, input: CreateProjectInput) -> Result<Project, ToolError> {
        let owner_id =
            resolve_owner_id(client, &input.owner, input.owner_type).await?;
        let variables = CreateProjectV2Input::new(owner_id, input).into();
        Ok(client
            .execute::<CreateProjectMutation>(&variables)
            .await?
            .create_project_v2
            .project)
    }
}

/// Input for the update_project tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct UpdateProjectInput {
    /// Project ID
    project_id: String,

    /// New title
    title: Option<String>,

    /// New short description
    short_description: Option<String>,

    /// Whether the project should be public
    public: Option<bool>,
}

impl Validate for UpdateProjectInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProjectV2Input {
    project_id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public: Option<bool>,
}

impl From<UpdateProjectInput> for UpdateProjectV2Input {
    fn from(input: UpdateProjectInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            title: non_empty(input.title),
            short_description: non_empty(input.short_description),
            public: input.public,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProjectResponse {
    update_project_v2: ProjectPayload,
}

pub(crate) struct UpdateProjectMutation;

impl Operation for UpdateProjectMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation UpdateProject($input: UpdateProjectV2Input!) {
  updateProjectV2(input: $input) {
    projectV2 {
      id
      url
      title
    }
  }
}"#;
    type Variables = InputVariables<UpdateProjectV2Input>;
    type Response = UpdateProjectResponse;
}

pub struct UpdateProject;

impl ProjectsTool for UpdateProject {
    const NAME: &'static str = "update_project";
    const TITLE: &'static str = "Update project";
    const DESCRIPTION: &'static str = "Update an existing Project V2 board";
    const READ_ONLY: bool = false;

    type Input = UpdateProjectInput;
    type Output = Project;

    async fn call(client: &GraphQLClient, input: UpdateProjectInput) -> Result<Project, ToolError> {
        let variables = UpdateProjectV2Input::from(input).into();
        Ok(client
            .execute::<UpdateProjectMutation>(&variables)
            .await?
            .update_project_v2
            .project)
    }
}

/// Input for the delete_project tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct DeleteProjectInput {
    /// Project ID
    project_id: String,
}

impl Validate for DeleteProjectInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteProjectV2Input {
    project_id: NodeId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteProjectResponse {
    delete_project_v2: Typename,
}

pub(crate) struct DeleteProjectMutation;

impl Operation for DeleteProjectMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation DeleteProject($input: DeleteProjectV2Input!) {
  deleteProjectV2(input: $input) {
    __typename
  }
}"#;
    type Variables = InputVariables<DeleteProjectV2Input>;
    type Response = DeleteProjectResponse;
}

pub struct DeleteProject;

impl ProjectsTool for DeleteProject {
    const NAME: &'static str = "delete_project";
    const TITLE: &'static str = "Delete project";
    const DESCRIPTION: &'static str = "Delete a Project V2 board";
    const READ_ONLY: bool = false;

    type Input = DeleteProjectInput;
    type Output = Typename;

    async fn call(client: &GraphQLClient, input: DeleteProjectInput) -> Result<Typename, ToolError> {
        let variables = DeleteProjectV2Input {
            project_id: input.project_id.into(),
        }
        .into();
        Ok(client
            .execute::<DeleteProjectMutation>(&variables)
            .await?
            .delete_project_v2)
    }
}
