//! Nexus REST API client for component and task operations.
//!
//! [`ComponentRegistry`] is the seam the cleanup pipeline talks to;
//! [`NexusClient`] implements it over HTTP.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tagkeeper_core::{Component, ComponentPage, Task, TaskList};

use crate::config::{RegistryAuth, RegistryConfig};
use crate::error::RegistryError;

/// Operations the cleanup pipeline needs from a component registry.
///
/// None of these retry; a failure is returned to the caller as-is.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// Fetches every component of a repository, following pagination.
    async fn fetch_all_components(&self, repository: &str)
        -> Result<Vec<Component>, RegistryError>;

    /// Deletes a single component. Succeeds only on `204 No Content`.
    async fn delete_component(&self, component_id: &str) -> Result<(), RegistryError>;

    /// Lists repositories, passing the upstream payload through untouched.
    async fn list_repositories(&self) -> Result<Value, RegistryError>;

    /// Lists scheduled backend tasks.
    async fn list_tasks(&self) -> Result<Vec<Task>, RegistryError>;

    /// Asks the backend to run a task. Succeeds only on `204 No Content`.
    async fn trigger_task(&self, task_id: &str) -> Result<(), RegistryError>;
}

/// HTTP client for a Nexus Repository Manager instance.
#[derive(Debug)]
pub struct NexusClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl NexusClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tagkeeper_registry::{NexusClient, RegistryAuth, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("http://localhost:8081")
    ///     .with_auth(RegistryAuth::basic("admin", "admin123"));
    /// let client = NexusClient::new(config)?;
    /// # Ok::<(), tagkeeper_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ClientBuild {
                url: config.url.clone(),
                source: e,
            })?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fetches one page of the component listing.
    async fn fetch_page(
        &self,
        repository: &str,
        token: Option<&str>,
        context: &str,
    ) -> Result<ComponentPage, RegistryError> {
        let mut request = self
            .http
            .get(self.config.api_url("components"))
            .headers(self.auth_headers()?)
            .query(&[("repository", repository)]);

        if let Some(token) = token {
            request = request.query(&[("continuationToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::transport(context, e))?;

        let response = Self::ensure_success(response, context).await?;
        Self::decode(response, context).await
    }

    /// Passes successful responses through, turning anything else into an error.
    async fn ensure_success(response: Response, context: &str) -> Result<Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(RegistryError::status(
            context,
            status.as_u16(),
            response.text().await.unwrap_or_default(),
        ))
    }

    /// Accepts only `204 No Content`.
    async fn expect_no_content(response: Response, context: &str) -> Result<(), RegistryError> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Err(RegistryError::status(
            context,
            status.as_u16(),
            response.text().await.unwrap_or_default(),
        ))
    }

    /// Reads the body and deserializes it into `T`.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, RegistryError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::transport(context, e))?;

        serde_json::from_slice(&body).map_err(|source| RegistryError::InvalidPayload {
            context: context.to_string(),
            source,
        })
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(&self) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();

        match &self.config.auth {
            RegistryAuth::None => {}
            RegistryAuth::Basic { username, password } => {
                let credentials = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{username}:{password}"),
                );
                let mut value = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(
                    |_| RegistryError::InvalidCredentials {
                        message: "credentials are not a valid header value".to_string(),
                    },
                )?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }
}

#[async_trait]
impl ComponentRegistry for NexusClient {
    async fn fetch_all_components(
        &self,
        repository: &str,
    ) -> Result<Vec<Component>, RegistryError> {
        let context = format!("fetching components for {repository}");
        let mut components = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .fetch_page(repository, token.as_deref(), &context)
                .await?;
            pages += 1;

            token = page.next_token().map(str::to_string);
            components.extend(page.items);

            if token.is_none() {
                break;
            }
        }

        tracing::debug!(
            repository,
            pages,
            components = components.len(),
            "Fetched components"
        );

        Ok(components)
    }

    async fn delete_component(&self, component_id: &str) -> Result<(), RegistryError> {
        let context = format!("deleting component {component_id}");

        let response = self
            .http
            .delete(self.config.api_url(&format!("components/{component_id}")))
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| RegistryError::transport(&context, e))?;

        Self::expect_no_content(response, &context).await
    }

    async fn list_repositories(&self) -> Result<Value, RegistryError> {
        let context = "fetching repositories";

        let response = self
            .http
            .get(self.config.api_url("repositories"))
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| RegistryError::transport(context, e))?;

        let response = Self::ensure_success(response, context).await?;
        Self::decode(response, context).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RegistryError> {
        let context = "fetching tasks";

        let response = self
            .http
            .get(self.config.api_url("tasks"))
            .headers(self.auth_headers()?)
            .header(ACCEPT, "application/json")
            .header("X-Nexus-UI", "true")
            .send()
            .await
            .map_err(|e| RegistryError::transport(context, e))?;

        let response = Self::ensure_success(response, context).await?;
        let tasks: TaskList = Self::decode(response, context).await?;
        Ok(tasks.items)
    }

    async fn trigger_task(&self, task_id: &str) -> Result<(), RegistryError> {
        let context = format!("running task {task_id}");

        let response = self
            .http
            .post(self.config.api_url(&format!("tasks/{task_id}/run")))
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(|e| RegistryError::transport(&context, e))?;

        Self::expect_no_content(response, &context).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(url: &str) -> NexusClient {
        let config = RegistryConfig::new(url)
            .with_auth(RegistryAuth::basic("admin", "secret"))
            .with_timeout(Duration::from_millis(500));
        NexusClient::new(config).unwrap()
    }

    fn component_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "repository": "docker-hosted",
            "format": "docker",
            "name": name,
            "version": "v1",
            "assets": [{
                "blobCreated": "2024-01-01T00:00:00.000+00:00",
                "docker.image.manifest.digest": format!("sha256:{id}")
            }]
        })
    }

    #[test]
    fn test_client_creation() {
        let config = RegistryConfig::new("http://localhost:8081");
        assert!(NexusClient::new(config).is_ok());
    }

    #[test]
    fn test_auth_headers_none() {
        let client = NexusClient::new(RegistryConfig::new("http://localhost:8081")).unwrap();
        assert!(client.auth_headers().unwrap().is_empty());
    }

    #[test]
    fn test_auth_headers_basic() {
        let client = client("http://localhost:8081");
        let headers = client.auth_headers().unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        // base64("admin:secret")
        assert_eq!(auth, "Basic YWRtaW46c2VjcmV0");
    }

    #[tokio::test]
    async fn test_fetch_all_components_follows_continuation_token() {
        let router = Router::new().route(
            "/service/rest/v1/components",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("repository").map(String::as_str), Some("docker-hosted"));
                match params.get("continuationToken").map(String::as_str) {
                    None => Json(json!({
                        "items": [component_json("a", "team/api"), component_json("b", "team/web")],
                        "continuationToken": "page-2"
                    })),
                    Some("page-2") => Json(json!({
                        "items": [component_json("c", "team/api")],
                        "continuationToken": null
                    })),
                    Some(other) => panic!("unexpected token {other}"),
                }
            }),
        );
        let url = spawn(router).await;

        let components = client(&url).fetch_all_components("docker-hosted").await.unwrap();

        let ids: Vec<_> = components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_fetch_sends_basic_auth() {
        let router = Router::new().route(
            "/service/rest/v1/components",
            get(|headers: AxumHeaders| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth == "Basic YWRtaW46c2VjcmV0" {
                    (AxumStatus::OK, Json(json!({"items": [], "continuationToken": null})))
                } else {
                    (AxumStatus::UNAUTHORIZED, Json(json!({})))
                }
            }),
        );
        let url = spawn(router).await;

        let components = client(&url).fetch_all_components("docker-hosted").await.unwrap();
        assert!(components.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_upstream() {
        let router = Router::new().route(
            "/service/rest/v1/components",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn(router).await;

        let err = client(&url).fetch_all_components("docker-hosted").await.unwrap_err();

        assert_eq!(err.upstream_status(), Some(500));
        assert!(err.to_string().contains("docker-hosted"));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let router = Router::new().route(
            "/service/rest/v1/components",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"items": []}))
            }),
        );
        let url = spawn(router).await;

        let err = client(&url).fetch_all_components("slow-repo").await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("slow-repo"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let router = Router::new().route(
            "/service/rest/v1/components",
            get(|| async { Json(json!({"items": [{"id": "a"}]})) }),
        );
        let url = spawn(router).await;

        let err = client(&url).fetch_all_components("docker-hosted").await.unwrap_err();

        assert!(err.is_payload());
    }

    #[tokio::test]
    async fn test_delete_component() {
        let router = Router::new().route(
            "/service/rest/v1/components/:id",
            delete(|Path(id): Path<String>| async move {
                if id == "present" {
                    AxumStatus::NO_CONTENT
                } else {
                    AxumStatus::NOT_FOUND
                }
            }),
        );
        let url = spawn(router).await;
        let client = client(&url);

        assert!(client.delete_component("present").await.is_ok());

        let err = client.delete_component("missing").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(404));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_delete_requires_no_content() {
        let router = Router::new().route(
            "/service/rest/v1/components/:id",
            delete(|| async { AxumStatus::OK }),
        );
        let url = spawn(router).await;

        let err = client(&url).delete_component("abc").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(200));
    }

    #[tokio::test]
    async fn test_list_tasks_sends_ui_header() {
        let router = Router::new().route(
            "/service/rest/v1/tasks",
            get(|headers: AxumHeaders| async move {
                assert_eq!(headers.get("x-nexus-ui").unwrap(), "true");
                assert_eq!(headers.get("accept").unwrap(), "application/json");
                Json(json!({
                    "items": [
                        {"id": "t1", "name": "compact-blob-store", "type": "blobstore.compact"},
                        {"id": "t2", "name": "delete-unused-manifests-and-image-task"}
                    ]
                }))
            }),
        );
        let url = spawn(router).await;

        let tasks = client(&url).list_tasks().await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], Task::new("t1", "compact-blob-store"));
    }

    #[tokio::test]
    async fn test_trigger_task() {
        let router = Router::new().route(
            "/service/rest/v1/tasks/:id/run",
            post(|Path(id): Path<String>| async move {
                if id == "t1" {
                    AxumStatus::NO_CONTENT
                } else {
                    AxumStatus::CONFLICT
                }
            }),
        );
        let url = spawn(router).await;
        let client = client(&url);

        assert!(client.trigger_task("t1").await.is_ok());

        let err = client.trigger_task("t2").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(409));
        assert!(err.to_string().contains("409"));
    }

    #[tokio::test]
    async fn test_list_repositories_passthrough() {
        let router = Router::new().route(
            "/service/rest/v1/repositories",
            get(|| async {
                Json(json!([{"name": "docker-hosted", "format": "docker", "type": "hosted"}]))
            }),
        );
        let url = spawn(router).await;

        let repositories = client(&url).list_repositories().await.unwrap();

        assert_eq!(repositories[0]["name"], "docker-hosted");
    }
}
