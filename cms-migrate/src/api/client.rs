//! GraphQL client for the headless CMS Manage API

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{ApiError, RemoteError};
use super::models::ModelsSnapshot;
use super::operations::{GraphqlOperation, build_list_models_operation};

/// Capability the migration engine needs from a remote content service
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Execute `operation` with `variables` and return the response `data` object
    async fn request(
        &self,
        operation: &GraphqlOperation,
        variables: Value,
    ) -> Result<Value, ApiError>;
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorMessage>>,
}

/// HTTP client bound to one Manage API endpoint
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: String,
}

impl CmsClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            authorization: bearer(api_key),
        })
    }
}

/// API keys are sent as `Bearer <key>`, whatever scheme prefix they came with
fn bearer(api_key: &str) -> String {
    let trimmed = api_key.trim();
    let token = match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    };
    format!("Bearer {}", token)
}

/// Turn a raw GraphQL response body into the `data` object
fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<Value, ApiError> {
    let parsed: Result<GraphqlResponse, _> = serde_json::from_str(body);

    let response = match parsed {
        Ok(response) => response,
        Err(e) if status.is_success() => {
            return Err(ApiError::malformed(format!("invalid JSON body: {}", e)));
        }
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            return Err(ApiError::transport(snippet, Some(status.as_u16())));
        }
    };

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        return Err(ApiError::Graphql {
            messages: errors.into_iter().map(|e| e.message).collect(),
        });
    }

    if !status.is_success() {
        return Err(ApiError::transport(
            status.canonical_reason().unwrap_or("request failed"),
            Some(status.as_u16()),
        ));
    }

    response
        .data
        .ok_or_else(|| ApiError::malformed("response has neither data nor errors"))
}

#[async_trait]
impl ContentApi for CmsClient {
    async fn request(
        &self,
        operation: &GraphqlOperation,
        variables: Value,
    ) -> Result<Value, ApiError> {
        debug!(
            "POST {} {} ({})",
            self.endpoint,
            operation.name(),
            operation.kind().operation_type()
        );
        trace!("Variables for {}: {}", operation.name(), variables);

        let body = json!({
            "query": operation.document(),
            "operationName": operation.name(),
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        parse_response(status, &text)
    }
}

/// `content` payload of an aliased entry operation, failing on its `error` field
pub fn content_payload(response: Value) -> Result<Value, ApiError> {
    let mut content = match response {
        Value::Object(mut map) => map
            .remove("content")
            .filter(|c| !c.is_null())
            .ok_or_else(|| ApiError::malformed("response has no content"))?,
        _ => return Err(ApiError::malformed("response data is not an object")),
    };

    if let Some(error) = content.get_mut("error").map(Value::take) {
        if !error.is_null() {
            let remote: RemoteError = serde_json::from_value(error).map_err(|e| {
                ApiError::malformed(format!("unreadable error payload: {}", e))
            })?;
            return Err(ApiError::Remote(remote));
        }
    }

    Ok(content)
}

/// `content.data` of an aliased entry operation
pub fn content_data(response: Value) -> Result<Value, ApiError> {
    let mut content = content_payload(response)?;
    Ok(content
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

/// Fetch all content model groups and models
pub async fn fetch_models(client: &dyn ContentApi) -> Result<ModelsSnapshot, ApiError> {
    let operation = build_list_models_operation();
    let response = client.request(&operation, json!({})).await?;
    serde_json::from_value(response)
        .map_err(|e| ApiError::malformed(format!("unexpected models listing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(bearer("abc"), "Bearer abc");
        assert_eq!(bearer("Bearer abc"), "Bearer abc");
        assert_eq!(bearer(" bearer xyz "), "Bearer xyz");
        assert_eq!(bearer("BEARER   xyz"), "Bearer xyz");
        assert_eq!(bearer("bearerxyz"), "Bearer bearerxyz");
    }

    #[test]
    fn test_parse_response_data() {
        let data = parse_response(StatusCode::OK, r#"{"data": {"content": {"data": []}}}"#).unwrap();
        assert_eq!(data, json!({"content": {"data": []}}));
    }

    #[test]
    fn test_parse_response_graphql_errors() {
        let err = parse_response(
            StatusCode::OK,
            r#"{"data": null, "errors": [{"message": "Unknown type \"FooInput\""}]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Graphql {
                messages: vec!["Unknown type \"FooInput\"".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_response_http_failure() {
        let err = parse_response(StatusCode::UNAUTHORIZED, "Not authorized").unwrap_err();
        assert_eq!(err, ApiError::transport("Not authorized", Some(401)));

        let err = parse_response(StatusCode::BAD_GATEWAY, r#"{"data": null}"#).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = parse_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[test]
    fn test_content_data_and_remote_error() {
        let ok = json!({"content": {"data": {"id": "n1#0001"}, "error": null}});
        assert_eq!(content_data(ok).unwrap(), json!({"id": "n1#0001"}));

        let failed = json!({"content": {"data": null, "error": {
            "code": "CREATE_ENTRY_ERROR", "message": "Boom", "data": null
        }}});
        match content_data(failed).unwrap_err() {
            ApiError::Remote(remote) => {
                assert_eq!(remote.code.as_deref(), Some("CREATE_ENTRY_ERROR"));
                assert_eq!(remote.message.as_deref(), Some("Boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_content_payload_requires_content() {
        assert!(matches!(
            content_payload(json!({"content": null})),
            Err(ApiError::MalformedResponse { .. })
        ));
        assert!(matches!(
            content_payload(json!([])),
            Err(ApiError::MalformedResponse { .. })
        ));
    }
}
