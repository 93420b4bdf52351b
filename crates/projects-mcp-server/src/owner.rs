//! Resolve human readable logins into the node IDs the API expects

use apollo_compiler::ast::OperationType;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::debug;

use crate::errors::ToolError;
use crate::graphql::{GraphQLClient, NodeId, Operation};

/// The kind of account that owns a project, either a personal account or an organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[schemars(inline)]
pub enum OwnerType {
    User,
    #[default]
    Organization,
}

impl OwnerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::User => "user",
            OwnerType::Organization => "organization",
        }
    }

    pub(crate) fn is_user(&self) -> bool {
        matches!(self, OwnerType::User)
    }

    /// Deserialize an owner type, reading null or an empty string as the default
    pub(crate) fn deserialize_or_default<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(Self::default()),
            Some("user") => Ok(Self::User),
            Some("organization") => Ok(Self::Organization),
            Some(other) => Err(de::Error::unknown_variant(other, &["user", "organization"])),
        }
    }
}

/// A GraphQL object of which only the ID is selected
#[derive(Debug, Deserialize, Serialize)]
pub struct Node {
    pub id: NodeId,
}

pub(crate) struct ResolveOwner;

#[derive(Debug, Serialize)]
pub(crate) struct LoginVariables {
    pub(crate) login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveOwnerResponse {
    #[serde(default)]
    user: Option<Node>,
    #[serde(default)]
    organization: Option<Node>,
}

impl Operation for ResolveOwner {
    const KIND: OperationType = OperationType::Query;
    const DOCUMENT: &'static str = r#"query ResolveOwner($login: String!) {
  user(login: $login) {
    id
  }
  organization(login: $login) {
    id
  }
}"#;
    type Variables = LoginVariables;
    type Response = ResolveOwnerResponse;
}

impl ResolveOwnerResponse {
    /// Pick the ID matching the requested owner type, ignoring the other one
    fn select(self, owner_type: OwnerType) -> Option<NodeId> {
        match owner_type {
            OwnerType::User => self.user,
            OwnerType::Organization => self.organization,
        }
        .map(|node| node.id)
        .filter(|id| !id.is_empty())
    }
}

/// Look up the node ID for `login`, treating it as the given kind of owner
///
/// Both the user and the organization ID are requested in a single round trip.
pub async fn resolve_owner_id(
    client: &GraphQLClient,
    login: &str,
    owner_type: OwnerType,
) -> Result<NodeId, ToolError> {
    let response = client
        .execute::<ResolveOwner>(&LoginVariables {
            login: login.to_string(),
        })
        .await?;

    let id = response.select(owner_type).ok_or_else(|| {
        ToolError::Resolution(format!(
            "failed to resolve owner ID for {} {login}",
            owner_type.as_str()
        ))
    })?;
    debug!(%login, owner_type = owner_type.as_str(), %id, "Resolved owner");
    Ok(id)
}

pub(crate) struct ResolveRepository;

#[derive(Debug, Serialize)]
pub(crate) struct RepositoryVariables {
    owner: String,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveRepositoryResponse {
    #[serde(default)]
    repository: Option<Node>,
}

impl Operation for ResolveRepository {
    const KIND: OperationType = OperationType::Query;
    const DOCUMENT: &'static str = r#"query ResolveRepository($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    id
  }
}"#;
    type Variables = RepositoryVariables;
    type Response = ResolveRepositoryResponse;
}

/// Look up the node ID of the repository `owner/name`
pub async fn resolve_repository_id(
    client: &GraphQLClient,
    owner: &str,
    name: &str,
) -> Result<NodeId, ToolError> {
    client
        .execute::<ResolveRepository>(&RepositoryVariables {
            owner: owner.to_string(),
            name: name.to_string(),
        })
        .await?
        .repository
        .map(|node| node.id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ToolError::Resolution(format!("failed to resolve repository ID for {owner}/{name}"))
        })
}
