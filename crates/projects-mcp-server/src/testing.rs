//! Fixtures shared by the unit tests

use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use url::Url;

use crate::graphql::GraphQLClient;

/// A client pointed at the `/graphql` path of a mock server
pub(crate) fn client_for(server: &ServerGuard) -> GraphQLClient {
    let endpoint = Url::parse(&format!("{}/graphql", server.url())).unwrap();
    GraphQLClient::new(endpoint, HeaderMap::new(), Duration::from_secs(5)).unwrap()
}

/// Expect exactly one request for `operation_name` with `variables`, answering with `data`
pub(crate) async fn mock_operation(
    server: &mut ServerGuard,
    operation_name: &str,
    variables: Value,
    data: Value,
) -> Mock {
    server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "operationName": operation_name,
            "variables": variables,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": data }).to_string())
        .expect(1)
        .create_async()
        .await
}

/// Answer any request with a GraphQL error and no data
pub(crate) async fn mock_failure(server: &mut ServerGuard, message: &str) -> Mock {
    server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": null, "errors": [{ "message": message }] }).to_string())
        .create_async()
        .await
}
