//! Tools that manage the items on a board

use apollo_compiler::ast::OperationType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ProjectsTool, Validate, non_empty, require};
use crate::errors::ToolError;
use crate::graphql::{GraphQLClient, InputVariables, NodeId, Operation, Typename};
use crate::owner::Node;
use crate::tools::issues::Issue;

#[derive(Debug, Deserialize)]
pub(crate) struct ItemPayload {
    item: Node,
}

/// Input for tools that act on a single item of a board
#[derive(Debug, JsonSchema, Deserialize)]
pub struct ProjectItemInput {
    /// Project ID
    project_id: String,

    /// Item ID
    item_id: String,
}

impl Validate for ProjectItemInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("item_id", &self.item_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectItemV2Input {
    project_id: NodeId,
    item_id: NodeId,
}

impl From<ProjectItemInput> for ProjectItemV2Input {
    fn from(input: ProjectItemInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            item_id: input.item_id.into(),
        }
    }
}

/// Input for the add_issue_to_project tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct AddIssueToProjectInput {
    /// Project ID
    project_id: String,

    /// Issue node ID
    issue_id: String,
}

impl Validate for AddIssueToProjectInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("issue_id", &self.issue_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddProjectV2ItemByIdInput {
    project_id: NodeId,
    content_id: NodeId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemResponse {
    add_project_v2_item_by_id: ItemPayload,
}

pub(crate) struct AddItemMutation;

impl Operation for AddItemMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation AddIssueToProject($input: AddProjectV2ItemByIdInput!) {
  addProjectV2ItemById(input: $input) {
    item {
      id
    }
  }
}"#;
    type Variables = InputVariables<AddProjectV2ItemByIdInput>;
    type Response = AddItemResponse;
}

pub struct AddIssueToProject;

impl ProjectsTool for AddIssueToProject {
    const NAME: &'static str = "add_issue_to_project";
    const TITLE: &'static str = "Add issue to project";
    const DESCRIPTION: &'static str = "Add an issue to a project";
    const READ_ONLY: bool = false;

    type Input = AddIssueToProjectInput;
    type Output = Node;

    async fn call(client: &GraphQLClient, input: AddIssueToProjectInput) -> Result<Node, ToolError> {
        let variables = AddProjectV2ItemByIdInput {
            project_id: input.project_id.into(),
            content_id: input.issue_id.into(),
        }
        .into();
        Ok(client
            .execute::<AddItemMutation>(&variables)
            .await?
            .add_project_v2_item_by_id
            .item)
    }
}

/// Input for the update_project_item_field tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct UpdateProjectItemFieldInput {
    /// Project ID
    project_id: String,

    /// Item ID
    item_id: String,

    /// Field ID
    field_id: String,

    /// Text value
    text_value: Option<String>,
}

impl Validate for UpdateProjectItemFieldInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("item_id", &self.item_id)?;
        require("field_id", &self.field_id)
    }
}

/// The value to set on a field, only text is supported
#[derive(Debug, Default, Serialize)]
pub(crate) struct FieldValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProjectV2ItemFieldValueInput {
    project_id: NodeId,
    item_id: NodeId,
    field_id: NodeId,
    value: FieldValue,
}

impl From<UpdateProjectItemFieldInput> for UpdateProjectV2ItemFieldValueInput {
    fn from(input: UpdateProjectItemFieldInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            item_id: input.item_id.into(),
            field_id: input.field_id.into(),
            value: FieldValue {
                text: non_empty(input.text_value),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldValuePayload {
    project_v2_item: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateFieldResponse {
    update_project_v2_item_field_value: FieldValuePayload,
}

pub(crate) struct UpdateFieldMutation;

impl Operation for UpdateFieldMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation UpdateProjectItemField($input: UpdateProjectV2ItemFieldValueInput!) {
  updateProjectV2ItemFieldValue(input: $input) {
    projectV2Item {
      id
    }
  }
}"#;
    type Variables = InputVariables<UpdateProjectV2ItemFieldValueInput>;
    type Response = UpdateFieldResponse;
}

pub struct UpdateProjectItemField;

impl ProjectsTool for UpdateProjectItemField {
    const NAME: &'static str = "update_project_item_field";
    const TITLE: &'static str = "Update project item field";
    const DESCRIPTION: &'static str = "Update a project item field";
    const READ_ONLY: bool = false;

    type Input = UpdateProjectItemFieldInput;
    type Output = Node;

    async fn call(
        client: &GraphQLClient,
        input: UpdateProjectItemFieldInput,
    ) -> Result<Node, ToolError> {
        let variables = UpdateProjectV2ItemFieldValueInput::from(input).into();
        Ok(client
            .execute::<UpdateFieldMutation>(&variables)
            .await?
            .update_project_v2_item_field_value
            .project_v2_item)
    }
}

/// Input for the create_draft_issue tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct CreateDraftIssueInput {
    /// Project ID
    project_id: String,

    /// Draft title
    title: String,

    /// Draft body
    body: Option<String>,
}

impl Validate for CreateDraftIssueInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("title", &self.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddProjectV2DraftIssueInput {
    project_id: NodeId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl From<CreateDraftIssueInput> for AddProjectV2DraftIssueInput {
    fn from(input: CreateDraftIssueInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            title: input.title,
            body: non_empty(input.body),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftIssuePayload {
    project_item: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDraftResponse {
    add_project_v2_draft_issue: DraftIssuePayload,
}

pub(crate) struct CreateDraftMutation;

impl Operation for CreateDraftMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation CreateDraftIssue($input: AddProjectV2DraftIssueInput!) {
  addProjectV2DraftIssue(input: $input) {
    projectItem {
      id
    }
  }
}"#;
    type Variables = InputVariables<AddProjectV2DraftIssueInput>;
    type Response = CreateDraftResponse;
}

pub struct CreateDraftIssue;

impl ProjectsTool for CreateDraftIssue {
    const NAME: &'static str = "create_draft_issue";
    const TITLE: &'static str = "Create draft issue";
    const DESCRIPTION: &'static str = "Create a draft issue in a project";
    const READ_ONLY: bool = false;

    type Input = CreateDraftIssueInput;
    type Output = Node;

    async fn call(client: &GraphQLClient, input: CreateDraftIssueInput) -> Result<Node, ToolError> {
        let variables = AddProjectV2DraftIssueInput::from(input).into();
        Ok(client
            .execute::<CreateDraftMutation>(&variables)
            .await?
            .add_project_v2_draft_issue
            .project_item)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteItemResponse {
    delete_project_v2_item: Typename,
}

pub(crate) struct DeleteItemMutation;

impl Operation for DeleteItemMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation DeleteProjectItem($input: DeleteProjectV2ItemInput!) {
  deleteProjectV2Item(input: $input) {
    __typename
  }
}"#;
    type Variables = InputVariables<ProjectItemV2Input>;
    type Response = DeleteItemResponse;
}

pub struct DeleteProjectItem;

impl ProjectsTool for DeleteProjectItem {
    const NAME: &'static str = "delete_project_item";
    const TITLE: &'static str = "Delete project item";
    const DESCRIPTION: &'static str = "Delete a project item";
    const READ_ONLY: bool = false;

    type Input = ProjectItemInput;
    type Output = Typename;

    async fn call(client: &GraphQLClient, input: ProjectItemInput) -> Result<Typename, ToolError> {
        let variables = ProjectItemV2Input::from(input).into();
        Ok(client
            .execute::<DeleteItemMutation>(&variables)
            .await?
            .delete_project_v2_item)
    }
}

/// Input for the update_project_item tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct UpdateProjectItemInput {
    /// Project ID
    project_id: String,

    /// Item ID
    item_id: String,

    /// Whether the item should be archived (true) or unarchived (false)
    archived: Option<bool>,
}

impl Validate for UpdateProjectItemInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("item_id", &self.item_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProjectV2ItemInput {
    project_id: NodeId,
    item_id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    archived: Option<bool>,
}

impl From<UpdateProjectItemInput> for UpdateProjectV2ItemInput {
    fn from(input: UpdateProjectItemInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            item_id: input.item_id.into(),
            archived: input.archived,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateItemResponse {
    update_project_v2_item: ItemPayload,
}

pub(crate) struct UpdateItemMutation;

impl Operation for UpdateItemMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation UpdateProjectItem($input: UpdateProjectV2ItemInput!) {
  updateProjectV2Item(input: $input) {
    item {
      id
    }
  }
}"#;
    type Variables = InputVariables<UpdateProjectV2ItemInput>;
    type Response = UpdateItemResponse;
}

pub struct UpdateProjectItem;

impl ProjectsTool for UpdateProjectItem {
    const NAME: &'static str = "update_project_item";
    const TITLE: &'static str = "Update project item";
    const DESCRIPTION: &'static str = "Archive / unarchive a project item";
    const READ_ONLY: bool = false;

    type Input = UpdateProjectItemInput;
    type Output = Node;

    async fn call(client: &GraphQLClient, input: UpdateProjectItemInput) -> Result<Node, ToolError> {
        let variables = UpdateProjectV2ItemInput::from(input).into();
        Ok(client
            .execute::<UpdateItemMutation>(&variables)
            .await?
            .update_project_v2_item
            .item)
    }
}

/// Input for the update_project_item_position tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct UpdateProjectItemPositionInput {
    /// Project ID
    project_id: String,

    /// Item ID to move
    item_id: String,

    /// Item ID that should come directly before the moved item (optional)
    previous_item_id: Option<String>,
}

impl Validate for UpdateProjectItemPositionInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("item_id", &self.item_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProjectV2ItemPositionInput {
    project_id: NodeId,
    item_id: NodeId,
    /// Absent to move the item to the front
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_item_id: Option<NodeId>,
}

impl From<UpdateProjectItemPositionInput> for UpdateProjectV2ItemPositionInput {
    fn from(input: UpdateProjectItemPositionInput) -> Self {
        Self {
            project_id: input.project_id.into(),
            item_id: input.item_id.into(),
            previous_item_id: non_empty(input.previous_item_id).map(NodeId::from),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePositionResponse {
    update_project_v2_item_position: ItemPayload,
}

pub(crate) struct UpdatePositionMutation;

impl Operation for UpdatePositionMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation UpdateProjectItemPosition($input: UpdateProjectV2ItemPositionInput!) {
  updateProjectV2ItemPosition(input: $input) {
    item {
      id
    }
  }
}"#;
    type Variables = InputVariables<UpdateProjectV2ItemPositionInput>;
    type Response = UpdatePositionResponse;
}

pub struct UpdateProjectItemPosition;

impl ProjectsTool for UpdateProjectItemPosition {
    const NAME: &'static str = "update_project_item_position";
    const TITLE: &'static str = "Move project item";
    const DESCRIPTION: &'static str = "Move a project item to a new position";
    const READ_ONLY: bool = false;

    type Input = UpdateProjectItemPositionInput;
    type Output = Node;

    async fn call(
        client: &GraphQLClient,
        input: UpdateProjectItemPositionInput,
    ) -> Result<Node, ToolError> {
        let variables = UpdateProjectV2ItemPositionInput::from(input).into();
        Ok(client
            .execute::<UpdatePositionMutation>(&variables)
            .await?
            .update_project_v2_item_position
            .item)
    }
}

/// Input for the convert_project_item_to_issue tool
#[derive(Debug, JsonSchema, Deserialize)]
pub struct ConvertProjectItemInput {
    /// Project ID
    project_id: String,

    /// Item ID to convert
    item_id: String,
}

impl Validate for ConvertProjectItemInput {
    fn validate(&self) -> Result<(), ToolError> {
        require("project_id", &self.project_id)?;
        require("item_id", &self.item_id)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload {
    issue: Issue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConvertItemResponse {
    convert_project_v2_item_to_issue: IssuePayload,
}

pub(crate) struct ConvertItemMutation;

impl Operation for ConvertItemMutation {
    const KIND: OperationType = OperationType::Mutation;
    const DOCUMENT: &'static str = r#"mutation ConvertProjectItemToIssue($input: ConvertProjectV2ItemToIssueInput!) {
  convertProjectV2ItemToIssue(input: $input) {
    issue {
      id
      url
      title
    }
  }
}"#;
    type Variables = InputVariables<ProjectItemV2Input>;
    type Response = ConvertItemResponse;
}

pub struct ConvertProjectItemToIssue;

impl ProjectsTool for ConvertProjectItemToIssue {
    const NAME: &'static str = "convert_project_item_to_issue";
    const TITLE: &'static str = "Convert item to issue";
    const DESCRIPTION: &'static str = "Convert a draft item to a repository issue";
    const READ_ONLY: bool = false;

    type Input = ConvertProjectItemInput;
    type Output = Issue;

    async fn call(client: &GraphQLClient, input: ConvertProjectItemInput) -> Result<Issue, ToolError> {
        let variables = ProjectItemV2Input {
            project_id: input.project_id.into(),
            item_id: input.item_id.into(),
        }
        .into();
        Ok(client
            .execute::<ConvertItemMutation>(&variables)
            .await?
            .convert_project_v2_item_to_issue
            .issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::operation_name;
    use crate::testing::{client_for, mock_failure, mock_operation};
    use crate::tools::test_support::{call, error_message, json};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(AddItemMutation::DOCUMENT, "AddIssueToProject")]
    #[case(UpdateFieldMutation::DOCUMENT, "UpdateProjectItemField")]
    #[case(CreateDraftMutation::DOCUMENT, "CreateDraftIssue")]
    #[case(DeleteItemMutation::DOCUMENT, "DeleteProjectItem")]
    #[case(UpdateItemMutation::DOCUMENT, "UpdateProjectItem")]
    #[case(UpdatePositionMutation::DOCUMENT, "UpdateProjectItemPosition")]
    #[case(ConvertItemMutation::DOCUMENT, "ConvertProjectItemToIssue")]
    fn mutations_are_single_named_operations(#[case] document: &str, #[case] name: &str) {
        assert_eq!(
            operation_name(document, OperationType::Mutation).unwrap(),
            name
        );
    }

    fn mutation_input<I, M>(arguments: Value) -> Value
    where
        I: serde::de::DeserializeOwned,
        M: From<I> + Serialize,
    {
        let input: I = serde_json::from_value(arguments).unwrap();
        serde_json::to_value(M::from(input)).unwrap()
    }

    #[rstest]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2" }), json!({ "projectId": "P_1", "itemId": "I_2" }))]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2", "archived": true }), json!({ "projectId": "P_1", "itemId": "I_2", "archived": true }))]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2", "archived": false }), json!({ "projectId": "P_1", "itemId": "I_2", "archived": false }))]
    fn archived_is_forwarded_only_when_present(#[case] arguments: Value, #[case] expected: Value) {
        assert_eq!(
            mutation_input::<UpdateProjectItemInput, UpdateProjectV2ItemInput>(arguments),
            expected
        );
    }

    #[rstest]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2" }), json!({ "projectId": "P_1", "itemId": "I_2" }))]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2", "previous_item_id": "" }), json!({ "projectId": "P_1", "itemId": "I_2" }))]
    #[case(json!({ "project_id": "P_1", "item_id": "I_2", "previous_item_id": "I_1" }), json!({ "projectId": "P_1", "itemId": "I_2", "previousItemId": "I_1" }))]
    fn previous_item_is_forwarded_only_when_set(#[case] arguments: Value, #[case] expected: Value) {
        assert_eq!(
            mutation_input::<UpdateProjectItemPositionInput, UpdateProjectV2ItemPositionInput>(
                arguments
            ),
            expected
        );
    }

    #[test]
    fn field_values_without_text_are_sent_empty() {
        assert_eq!(
            mutation_input::<UpdateProjectItemFieldInput, UpdateProjectV2ItemFieldValueInput>(
                json!({ "project_id": "P_1", "item_id": "I_1", "field_id": "F_1" })
            ),
            json!({ "projectId": "P_1", "itemId": "I_1", "fieldId": "F_1", "value": {} })
        );
        assert_eq!(
            mutation_input::<UpdateProjectItemFieldInput, UpdateProjectV2ItemFieldValueInput>(
                json!({ "project_id": "P_1", "item_id": "I_1", "field_id": "F_1", "text_value": "" })
            ),
            json!({ "projectId": "P_1", "itemId": "I_1", "fieldId": "F_1", "value": {} })
        );
        assert_eq!(
            mutation_input::<UpdateProjectItemFieldInput, UpdateProjectV2ItemFieldValueInput>(
                json!({ "project_id": "P_1", "item_id": "I_1", "field_id": "F_1", "text_value": "Soon" })
            ),
            json!({ "projectId": "P_1", "itemId": "I_1", "fieldId": "F_1", "value": { "text": "Soon" } })
        );
    }

    #[test]
    fn draft_bodies_are_omitted_when_empty() {
        assert_eq!(
            mutation_input::<CreateDraftIssueInput, AddProjectV2DraftIssueInput>(
                json!({ "project_id": "P_1", "title": "Idea", "body": "" })
            ),
            json!({ "projectId": "P_1", "title": "Idea" })
        );
    }

    #[tokio::test]
    async fn delete_item_returns_a_type_marker() {
        let mut server = mockito::Server::new_async().await;
        let delete = mock_operation(
            &mut server,
            "DeleteProjectItem",
            json!({ "input": { "projectId": "P_1", "itemId": "I_1" } }),
            json!({ "deleteProjectV2Item": { "__typename": "DeleteProjectV2ItemPayload" } }),
        )
        .await;

        let result = call::<DeleteProjectItem>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_1" }),
        )
        .await;

        delete.assert_async().await;
        assert_eq!(
            json(&result),
            json!({ "__typename": "DeleteProjectV2ItemPayload" })
        );
    }

    #[tokio::test]
    async fn moving_to_the_front_omits_the_previous_item() {
        let mut server = mockito::Server::new_async().await;
        let ordered = server
            .mock("POST", "/graphql")
            .match_body(mockito::Matcher::Json(json!({
                "query": UpdatePositionMutation::DOCUMENT,
                "operationName": "UpdateProjectItemPosition",
                "variables": { "input": { "projectId": "P_1", "itemId": "I_2" } },
            })))
            .with_status(200)
            .with_body(
                json!({ "data": { "updateProjectV2ItemPosition": { "item": { "id": "I_2" } } } })
                    .to_string(),
            )
            .create_async()
            .await;

        let result = call::<UpdateProjectItemPosition>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_2" }),
        )
        .await;

        ordered.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "I_2" }));
    }

    #[tokio::test]
    async fn moving_after_an_item_sends_it_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let ordered = mock_operation(
            &mut server,
            "UpdateProjectItemPosition",
            json!({ "input": { "projectId": "P_1", "itemId": "I_2", "previousItemId": "I_1" } }),
            json!({ "updateProjectV2ItemPosition": { "item": { "id": "I_2" } } }),
        )
        .await;

        let result = call::<UpdateProjectItemPosition>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_2", "previous_item_id": "I_1" }),
        )
        .await;

        ordered.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "I_2" }));
    }

    #[tokio::test]
    async fn add_issue_links_the_content_id() {
        let mut server = mockito::Server::new_async().await;
        let add = mock_operation(
            &mut server,
            "AddIssueToProject",
            json!({ "input": { "projectId": "P_1", "contentId": "I_kwDO" } }),
            json!({ "addProjectV2ItemById": { "item": { "id": "PVTI_1" } } }),
        )
        .await;

        let result = call::<AddIssueToProject>(
            &client_for(&server),
            json!({ "project_id": "P_1", "issue_id": "I_kwDO" }),
        )
        .await;

        add.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "PVTI_1" }));
    }

    #[tokio::test]
    async fn create_draft_returns_the_new_item() {
        let mut server = mockito::Server::new_async().await;
        let draft = mock_operation(
            &mut server,
            "CreateDraftIssue",
            json!({ "input": { "projectId": "P_1", "title": "Idea", "body": "Details" } }),
            json!({ "addProjectV2DraftIssue": { "projectItem": { "id": "PVTI_2" } } }),
        )
        .await;

        let result = call::<CreateDraftIssue>(
            &client_for(&server),
            json!({ "project_id": "P_1", "title": "Idea", "body": "Details" }),
        )
        .await;

        draft.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "PVTI_2" }));
    }

    #[tokio::test]
    async fn update_field_returns_the_item() {
        let mut server = mockito::Server::new_async().await;
        let update = mock_operation(
            &mut server,
            "UpdateProjectItemField",
            json!({ "input": { "fieldId": "F_1", "value": { "text": "Soon" } } }),
            json!({ "updateProjectV2ItemFieldValue": { "projectV2Item": { "id": "I_1" } } }),
        )
        .await;

        let result = call::<UpdateProjectItemField>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_1", "field_id": "F_1", "text_value": "Soon" }),
        )
        .await;

        update.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "I_1" }));
    }

    #[tokio::test]
    async fn archive_forwards_an_explicit_false() {
        let mut server = mockito::Server::new_async().await;
        let update = mock_operation(
            &mut server,
            "UpdateProjectItem",
            json!({ "input": { "projectId": "P_1", "itemId": "I_1", "archived": false } }),
            json!({ "updateProjectV2Item": { "item": { "id": "I_1" } } }),
        )
        .await;

        let result = call::<UpdateProjectItem>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_1", "archived": false }),
        )
        .await;

        update.assert_async().await;
        assert_eq!(json(&result), json!({ "id": "I_1" }));
    }

    #[tokio::test]
    async fn convert_returns_the_new_issue() {
        let mut server = mockito::Server::new_async().await;
        let convert = mock_operation(
            &mut server,
            "ConvertProjectItemToIssue",
            json!({ "input": { "projectId": "P_1", "itemId": "I_1" } }),
            json!({
                "convertProjectV2ItemToIssue": {
                    "issue": { "id": "I_kwDO", "url": "https://github.com/acme/widgets/issues/7", "title": "Idea" }
                }
            }),
        )
        .await;

        let result = call::<ConvertProjectItemToIssue>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_1" }),
        )
        .await;

        convert.assert_async().await;
        assert_eq!(
            json(&result),
            json!({ "id": "I_kwDO", "url": "https://github.com/acme/widgets/issues/7", "title": "Idea" })
        );
    }

    #[tokio::test]
    async fn remote_errors_are_relayed_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _failure = mock_failure(&mut server, "Draft issues cannot be converted here").await;

        let result = call::<ConvertProjectItemToIssue>(
            &client_for(&server),
            json!({ "project_id": "P_1", "item_id": "I_1" }),
        )
        .await;

        assert_eq!(
            error_message(&result),
            "Draft issues cannot be converted here"
        );
    }
}
