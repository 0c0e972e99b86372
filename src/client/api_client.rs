use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::gateway::{AuthGateway, IssueGateway, ProjectGateway};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::{log_debug, log_error};
use crate::models::*;

/// Invoked whenever the API answers 401. Owned by the auth side of the app.
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// REST client for the tracker API. Every request carries the bearer token
/// the client was built with.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> KanbanResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| KanbanError::ConfigError("Invalid access token format".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| KanbanError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            on_unauthorized: None,
        })
    }

    pub fn with_unauthorized_handler(mut self, handler: UnauthorizedHandler) -> Self {
        self.on_unauthorized = Some(handler);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: RequestBuilder) -> KanbanResult<Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        log_debug(&format!("{} {}", status.as_u16(), response.url()));

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_response(status, &body);

        if error.is_unauthorized() {
            if let Some(handler) = &self.on_unauthorized {
                handler();
            }
        } else {
            log_error(&format!("API error: {}", error));
        }

        Err(error)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> KanbanResult<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute_empty(&self, request: RequestBuilder) -> KanbanResult<()> {
        self.execute(request).await.map(|_| ())
    }
}

fn transport_error(e: reqwest::Error) -> KanbanError {
    if e.is_connect() || e.is_timeout() {
        KanbanError::Network(e.to_string())
    } else {
        KanbanError::RequestError(e)
    }
}

/// Maps a non-2xx response to an error, keeping the server's `detail`.
pub fn error_from_response(status: StatusCode, body: &str) -> KanbanError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message());

    if status == StatusCode::UNAUTHORIZED {
        return KanbanError::Unauthorized(detail.unwrap_or_else(|| "unauthorized".to_string()));
    }

    KanbanError::Api {
        status: status.as_u16(),
        detail,
    }
}

#[async_trait]
impl IssueGateway for ApiClient {
    async fn list_issues(&self, project_id: ProjectId) -> KanbanResult<Vec<Issue>> {
        let url = self.url(&format!("issues/project/{}", project_id));
        self.execute_json(self.client.get(url)).await
    }

    async fn get_issue(&self, issue_id: IssueId) -> KanbanResult<Issue> {
        let url = self.url(&format!("issues/{}", issue_id));
        self.execute_json(self.client.get(url)).await
    }

    async fn create_issue(&self, draft: &IssueDraft) -> KanbanResult<Issue> {
        self.execute_json(self.client.post(self.url("issues")).json(draft)).await
    }

    async fn update_issue(&self, issue_id: IssueId, draft: &IssueDraft) -> KanbanResult<Issue> {
        let url = self.url(&format!("issues/{}", issue_id));
        self.execute_json(self.client.put(url).json(draft)).await
    }

    async fn update_issue_status(&self, issue_id: IssueId, status: IssueStatus) -> KanbanResult<()> {
        let url = self.url(&format!("issues/{}/status", issue_id));
        self.execute_empty(self.client.patch(url).json(&StatusUpdate { status }))
            .await
    }

    async fn delete_issue(&self, issue_id: IssueId) -> KanbanResult<()> {
        let url = self.url(&format!("issues/{}", issue_id));
        self.execute_empty(self.client.delete(url)).await
    }
}

#[async_trait]
impl ProjectGateway for ApiClient {
    async fn list_projects(&self) -> KanbanResult<Vec<Project>> {
        self.execute_json(self.client.get(self.url("projects"))).await
    }

    async fn get_project(&self, project_id: ProjectId) -> KanbanResult<Project> {
        let url = self.url(&format!("projects/{}", project_id));
        self.execute_json(self.client.get(url)).await
    }

    async fn create_project(&self, draft: &ProjectDraft) -> KanbanResult<Project> {
        self.execute_json(self.client.post(self.url("projects")).json(draft)).await
    }

    async fn update_project(&self, project_id: ProjectId, draft: &ProjectDraft) -> KanbanResult<Project> {
        let url = self.url(&format!("projects/{}", project_id));
        self.execute_json(self.client.put(url).json(draft)).await
    }

    async fn delete_project(&self, project_id: ProjectId) -> KanbanResult<()> {
        let url = self.url(&format!("projects/{}", project_id));
        self.execute_empty(self.client.delete(url)).await
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, data: &LoginData) -> KanbanResult<AuthResponse> {
        self.execute_json(self.client.post(self.url("auth/login")).json(data)).await
    }

    async fn signup(&self, data: &SignupData) -> KanbanResult<AuthResponse> {
        self.execute_json(self.client.post(self.url("auth/signup")).json(data)).await
    }

    async fn current_user(&self) -> KanbanResult<User> {
        self.execute_json(self.client.get(self.url("auth/me"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/issues/7/status"), "http://localhost:8000/api/issues/7/status");
        assert_eq!(client.url("projects"), "http://localhost:8000/api/projects");
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let result = ApiClient::new("http://localhost", Some("abc\ndef"));
        assert!(matches!(result, Err(KanbanError::ConfigError(_))));
    }

    #[test]
    fn test_error_keeps_string_detail() {
        let error = error_from_response(StatusCode::NOT_FOUND, r#"{"detail":"Issue not found"}"#);
        match error {
            KanbanError::Api { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail.as_deref(), Some("Issue not found"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_joins_validation_details() {
        let body = r#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"value is not a valid integer"}]}"#;
        let error = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            error.user_message("fallback"),
            "field required; value is not a valid integer"
        );
    }

    #[test]
    fn test_error_without_body_uses_fallback() {
        let error = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(error.user_message("Failed to fetch issues"), "Failed to fetch issues");
    }

    #[test]
    fn test_unauthorized_is_distinct() {
        let error = error_from_response(StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid token"}"#);
        assert!(error.is_unauthorized());
        assert_eq!(error.detail(), Some("Invalid token"));
    }
}
