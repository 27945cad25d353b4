//! Toggl Track HTTP client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::api::{AccountApi, ReportApi, TimeEntryApi, WorkspaceApi};
use super::models::{
    Account, Client, DetailedReport, Project, SummaryReport, Tag, TagAction, TimeEntry,
    TimeEntryCreate,
};
use crate::error::{ApiError, Result};
use crate::resource::{ResourceKind, resource_path, resource_path_with_id, user_resource_path};

/// Toggl Track API base URL
pub const API_BASE_URL: &str = "https://api.track.toggl.com/api/v9";

/// Toggl Reports API base URL
pub const REPORTS_BASE_URL: &str = "https://api.track.toggl.com/reports/api/v2";

/// Name sent as `created_with` and `user_agent`
pub const DEFAULT_APP_NAME: &str = "togglop";

/// Retries of a transient failure before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Toggl asks clients to stay around one request per second per token
const DEFAULT_REQUESTS_PER_SECOND: u32 = 1;

/// Upper bound for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Tunables of a [`TogglClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base_url: String,
    pub reports_base_url: String,
    pub app_name: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// First retry delay; doubled on each further attempt
    pub initial_backoff: Duration,
    pub requests_per_second: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            reports_base_url: REPORTS_BASE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(500),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
        }
    }
}

impl ClientOptions {
    /// Point both APIs at one host, e.g. a mock server.
    ///
    /// The Track API is served under `/api/v9` and reports under
    /// `/reports/api/v2`, mirroring the real layout.
    pub fn with_host(mut self, host: &str) -> Self {
        let host = host.trim_end_matches('/');
        self.api_base_url = format!("{}/api/v9", host);
        self.reports_base_url = format!("{}/reports/api/v2", host);
        self
    }
}

/// Which API a path belongs to
#[derive(Debug, Clone, Copy)]
enum Api {
    Track,
    Reports,
}

/// HTTP basic auth pair
#[derive(Debug, Clone)]
enum Credentials {
    Token(String),
    Password { username: String, password: String },
}

impl Credentials {
    fn basic_auth(&self) -> (&str, &str) {
        match self {
            Credentials::Token(token) => (token, "api_token"),
            Credentials::Password { username, password } => (username, password),
        }
    }
}

/// Toggl Track API client
pub struct TogglClient {
    http: HttpClient,
    options: ClientOptions,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    credentials: Credentials,
}

impl TogglClient {
    /// Create a client authenticating with an API token.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_options(api_token, ClientOptions::default())
    }

    /// Create a token-authenticated client with custom options.
    pub fn with_options(api_token: impl Into<String>, options: ClientOptions) -> Result<Self> {
        Self::build(Credentials::Token(api_token.into()), options)
    }

    /// Authenticate with a username and password, then continue with the
    /// account's API token.
    pub async fn login(username: &str, password: &str, options: ClientOptions) -> Result<Self> {
        let mut client = Self::build(
            Credentials::Password {
                username: username.to_string(),
                password: password.to_string(),
            },
            options,
        )?;

        let account: Account = client.request(Method::GET, Api::Track, "/me", &[], None).await?;
        if account.api_token.is_empty() {
            return Err(
                ApiError::InvalidResponse("Account response carries no API token".to_string())
                    .into(),
            );
        }

        debug!("Logged in as account {}", account.id);
        client.credentials = Credentials::Token(account.api_token);
        Ok(client)
    }

    fn build(credentials: Credentials, options: ClientOptions) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(options.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            http,
            options,
            rate_limiter,
            credentials,
        })
    }

    /// The API token in use, once known.
    pub fn api_token(&self) -> Option<&str> {
        match &self.credentials {
            Credentials::Token(token) => Some(token),
            Credentials::Password { .. } => None,
        }
    }

    /// Name reported to Toggl as the creating application.
    pub fn app_name(&self) -> &str {
        &self.options.app_name
    }

    fn url(&self, api: Api, path: &str) -> String {
        let base = match api {
            Api::Track => &self.options.api_base_url,
            Api::Reports => &self.options.reports_base_url,
        };
        format!("{}{}", base, path)
    }

    /// Delay before retry number `attempt` (0-based).
    fn backoff(&self, attempt: u32, error: &ApiError) -> Duration {
        let exponential = self
            .options
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt));
        let delay = match error {
            ApiError::RateLimit(retry_after) => exponential.max(*retry_after),
            _ => exponential,
        };
        delay.min(MAX_BACKOFF)
    }

    /// Make an authenticated request and decode the JSON response.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        api: Api,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T> {
        let text = self.execute(method, api, path, query, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
        })
    }

    /// Make a request, retrying transient failures.
    async fn execute(
        &self,
        method: Method,
        api: Api,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<String> {
        let url = self.url(api, path);
        let mut attempt = 0;

        loop {
            match self.send_once(method.clone(), &url, query, body.as_ref()).await {
                Err(error) if error.is_transient() && attempt < self.options.max_retries => {
                    let delay = self.backoff(attempt, &error);
                    warn!(
                        "{} {} failed ({}), retrying in {:?} ({}/{})",
                        method,
                        url,
                        error,
                        delay,
                        attempt + 1,
                        self.options.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result.map_err(Into::into),
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> std::result::Result<String, ApiError> {
        self.rate_limiter.until_ready().await;

        let (user, password) = self.credentials.basic_auth();
        let mut request = self
            .http
            .request(method.clone(), url)
            .basic_auth(user, Some(password));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("{} {}", method, url);
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return response
                .text()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)));
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg))
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg))
            }
            _ => Err(ApiError::InvalidResponse(format!(
                "Unexpected status code: {}",
                status
            ))),
        }
    }

    fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
        Ok(serde_json::to_value(body)?)
    }

    fn report_query(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Vec<(&str, String)> {
        vec![
            ("user_agent", self.options.app_name.clone()),
            ("workspace_id", workspace_id.to_string()),
            ("since", since.format("%Y-%m-%d").to_string()),
            ("until", until.format("%Y-%m-%d").to_string()),
            ("rounding", "on".to_string()),
        ]
    }
}

#[async_trait]
impl AccountApi for TogglClient {
    async fn get_account(&self) -> Result<Account> {
        let query = [("with_related_data", "true".to_string())];
        self.request(Method::GET, Api::Track, "/me", &query, None)
            .await
    }
}

#[async_trait]
impl TimeEntryApi for TogglClient {
    async fn start_time_entry(&self, mut request: TimeEntryCreate) -> Result<TimeEntry> {
        if request.created_with.is_empty() {
            request.created_with = self.options.app_name.clone();
        }
        debug!("Starting time entry '{}'", request.description);

        let path = resource_path(ResourceKind::TimeEntry, request.workspace_id);
        let body = Self::to_body(&request)?;
        self.request(Method::POST, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn get_current_time_entry(&self) -> Result<Option<TimeEntry>> {
        let path = format!("{}/current", user_resource_path(ResourceKind::TimeEntry));
        match self.request(Method::GET, Api::Track, &path, &[], None).await {
            Err(crate::error::Error::Api(ApiError::NotFound(_))) => Ok(None),
            result => result,
        }
    }

    async fn get_time_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let path = user_resource_path(ResourceKind::TimeEntry);
        let query = [
            ("start_date", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        let entries: Option<Vec<TimeEntry>> = self
            .request(Method::GET, Api::Track, &path, &query, None)
            .await?;
        Ok(entries.unwrap_or_default())
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        debug!("Updating time entry {}", entry.id);
        let path = resource_path_with_id(ResourceKind::TimeEntry, entry.workspace_id, entry.id);
        let body = Self::to_body(entry)?;
        self.request(Method::PUT, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn stop_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        debug!("Stopping time entry {}", entry.id);
        let path = format!(
            "{}/stop",
            resource_path_with_id(ResourceKind::TimeEntry, entry.workspace_id, entry.id)
        );
        self.request(Method::PATCH, Api::Track, &path, &[], None)
            .await
    }

    async fn delete_time_entry(&self, entry: &TimeEntry) -> Result<()> {
        debug!("Deleting time entry {}", entry.id);
        let path = resource_path_with_id(ResourceKind::TimeEntry, entry.workspace_id, entry.id);
        self.execute(Method::DELETE, Api::Track, &path, &[], None)
            .await?;
        Ok(())
    }

    async fn add_remove_tag(
        &self,
        workspace_id: i64,
        entry_id: i64,
        tag: &str,
        action: TagAction,
    ) -> Result<TimeEntry> {
        debug!("Tag {} '{}' on time entry {}", action.as_str(), tag, entry_id);
        let path = resource_path_with_id(ResourceKind::TimeEntry, workspace_id, entry_id);
        let body = json!({ "tags": [tag], "tag_action": action });
        self.request(Method::PUT, Api::Track, &path, &[], Some(body))
            .await
    }
}

#[async_trait]
impl WorkspaceApi for TogglClient {
    async fn get_projects(&self, workspace_id: i64) -> Result<Vec<Project>> {
        let path = resource_path(ResourceKind::Project, workspace_id);
        let projects: Option<Vec<Project>> = self
            .request(Method::GET, Api::Track, &path, &[], None)
            .await?;
        Ok(projects.unwrap_or_default())
    }

    async fn get_project(&self, workspace_id: i64, id: i64) -> Result<Project> {
        let path = resource_path_with_id(ResourceKind::Project, workspace_id, id);
        self.request(Method::GET, Api::Track, &path, &[], None)
            .await
    }

    async fn create_project(&self, workspace_id: i64, name: &str) -> Result<Project> {
        debug!("Creating project '{}'", name);
        let path = resource_path(ResourceKind::Project, workspace_id);
        let body = json!({ "name": name, "workspace_id": workspace_id, "active": true });
        self.request(Method::POST, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn update_project(&self, project: &Project) -> Result<Project> {
        debug!("Updating project {}", project.id);
        let path = resource_path_with_id(ResourceKind::Project, project.workspace_id, project.id);
        let body = Self::to_body(project)?;
        self.request(Method::PUT, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn delete_project(&self, project: &Project) -> Result<()> {
        debug!("Deleting project {}", project.id);
        let path = resource_path_with_id(ResourceKind::Project, project.workspace_id, project.id);
        self.execute(Method::DELETE, Api::Track, &path, &[], None)
            .await?;
        Ok(())
    }

    async fn get_tags(&self, workspace_id: i64) -> Result<Vec<Tag>> {
        let path = resource_path(ResourceKind::Tag, workspace_id);
        let tags: Option<Vec<Tag>> = self
            .request(Method::GET, Api::Track, &path, &[], None)
            .await?;
        Ok(tags.unwrap_or_default())
    }

    async fn create_tag(&self, workspace_id: i64, name: &str) -> Result<Tag> {
        debug!("Creating tag '{}'", name);
        let path = resource_path(ResourceKind::Tag, workspace_id);
        let body = json!({ "name": name, "workspace_id": workspace_id });
        self.request(Method::POST, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag> {
        debug!("Updating tag {}", tag.id);
        let path = resource_path_with_id(ResourceKind::Tag, tag.workspace_id, tag.id);
        let body = Self::to_body(tag)?;
        self.request(Method::PUT, Api::Track, &path, &[], Some(body))
            .await
    }

    async fn delete_tag(&self, tag: &Tag) -> Result<()> {
        debug!("Deleting tag {}", tag.id);
        let path = resource_path_with_id(ResourceKind::Tag, tag.workspace_id, tag.id);
        self.execute(Method::DELETE, Api::Track, &path, &[], None)
            .await?;
        Ok(())
    }

    async fn get_clients(&self, workspace_id: i64) -> Result<Vec<Client>> {
        let path = resource_path(ResourceKind::Client, workspace_id);
        let clients: Option<Vec<Client>> = self
            .request(Method::GET, Api::Track, &path, &[], None)
            .await?;
        Ok(clients.unwrap_or_default())
    }

    async fn create_client(&self, workspace_id: i64, name: &str) -> Result<Client> {
        debug!("Creating client '{}'", name);
        let path = resource_path(ResourceKind::Client, workspace_id);
        let body = json!({ "name": name, "wid": workspace_id });
        self.request(Method::POST, Api::Track, &path, &[], Some(body))
            .await
    }
}

#[async_trait]
impl ReportApi for TogglClient {
    async fn get_summary_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<SummaryReport> {
        let mut query = self.report_query(workspace_id, since, until);
        query.push(("grouping", "projects".to_string()));
        self.request(Method::GET, Api::Reports, "/summary", &query, None)
            .await
    }

    async fn get_detailed_report(
        &self,
        workspace_id: i64,
        since: NaiveDate,
        until: NaiveDate,
        page: usize,
    ) -> Result<DetailedReport> {
        let mut query = self.report_query(workspace_id, since, until);
        query.push(("page", page.to_string()));
        self.request(Method::GET, Api::Reports, "/details", &query, None)
            .await
    }
}
