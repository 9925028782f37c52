//! HTTP client for the GroupSession REST API

use std::fmt;

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, Request, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use groupsession_api::{
    ApiResponse, AuthResponse, CreateScheduleRequest, Group, LoginCredentials, Message,
    PaginatedResponse, Schedule, SearchParams, SendMessageRequest, UpdateScheduleRequest, User,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::Session;

/// Header carrying the session token (`X-Session-ID`)
pub const SESSION_HEADER: &str = "x-session-id";

/// A result envelope the pipeline can decode or synthesize on failure
pub trait Envelope: DeserializeOwned {
    /// `{success: false, error}` in this envelope's shape
    fn failure(error: String) -> Self;
}

impl<T: DeserializeOwned> Envelope for ApiResponse<T> {
    fn failure(error: String) -> Self {
        ApiResponse::failure(error)
    }
}

impl<T: DeserializeOwned> Envelope for PaginatedResponse<T> {
    fn failure(error: String) -> Self {
        PaginatedResponse::failure(error)
    }
}

/// HTTP client for communicating with a GroupSession server
///
/// Every API method returns the server's result envelope. Failures are
/// reported in the envelope (`success: false`), never as `Err`; check
/// `success` before using `data`.
pub struct GroupSessionClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl GroupSessionClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an error if the base URL or a configured header is invalid, or
    /// the underlying HTTP client cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use groupsession_client::{ClientConfig, GroupSessionClient};
    ///
    /// let client = GroupSessionClient::new(ClientConfig::new("http://localhost:8080/gsession"))?;
    /// assert!(!client.is_authenticated());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.parse_base_url()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(config.header_map()?)
            .build()?;

        tracing::debug!(base_url = %base_url, timeout = ?config.timeout(), "created client");

        Ok(Self {
            client,
            base_url,
            session: Session::default(),
        })
    }

    /// Configured server root
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL by appending path segments to the base URL
    ///
    /// Each segment is percent-encoded, so an ID can never change the path
    /// structure.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidConfig("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_request(
        &self,
        segments: &[&str],
        params: Option<&SearchParams>,
    ) -> Result<RequestBuilder> {
        let mut url = self.endpoint(segments)?;
        if let Some(params) = params {
            let pairs = params.query_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        Ok(self.client.get(url))
    }

    fn json_request(
        &self,
        method: Method,
        segments: &[&str],
        body: &impl Serialize,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.client.request(method, url).json(body))
    }

    fn empty_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.client.request(method, url))
    }

    /// Attach the session header if a token is stored
    fn apply_session(&self, request: &mut Request) -> Result<()> {
        if let Some(token) = self.session.get() {
            let value = HeaderValue::from_str(&token)
                .map_err(|e| ClientError::InvalidHeader(format!("{SESSION_HEADER}: {e}")))?;
            request.headers_mut().insert(SESSION_HEADER, value);
        }
        Ok(())
    }

    /// Drop the session when the server reports it as unauthorized
    fn observe_status(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED && self.session.clear().is_some() {
            tracing::debug!("session cleared after 401 response");
        }
    }

    /// Run one request through the pipeline, folding every failure into the
    /// envelope
    async fn send<R: Envelope>(&self, request: Result<RequestBuilder>) -> R {
        match self.execute(request).await {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::debug!(error = %err, "request failed");
                R::failure(err.failure_message())
            }
        }
    }

    async fn execute<R: Envelope>(&self, request: Result<RequestBuilder>) -> Result<R> {
        let mut request = request?.build()?;
        self.apply_session(&mut request)?;

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ClientError::from_transport)?;
        let status = response.status();
        self.observe_status(status);

        let body = response.bytes().await.map_err(ClientError::from_transport)?;
        tracing::trace!(%status, bytes = body.len(), "received response");

        decode_envelope(status, &body)
    }

    // Authentication

    /// Log in and store the returned session token
    ///
    /// Returns the login payload itself rather than the outer envelope, or
    /// `{success: false}` when the envelope carried no payload.
    ///
    /// # Example
    /// ```no_run
    /// # use groupsession_client::{ClientConfig, GroupSessionClient, LoginCredentials};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GroupSessionClient::new(ClientConfig::new("http://localhost:8080/gsession"))?;
    /// let auth = client.login(&LoginCredentials::new("admin", "admin")).await;
    /// if auth.success {
    ///     println!("session: {:?}", client.session_id());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthResponse {
        let response: ApiResponse<AuthResponse> = self
            .send(self.json_request(Method::POST, &["api", "auth", "login"], credentials))
            .await;

        if response.success
            && let Some(session_id) = response.data.as_ref().and_then(|a| a.session_id.as_ref())
        {
            self.session.set(session_id.clone());
        }

        response.data.unwrap_or_default()
    }

    /// Log out; the stored session is cleared only if the server confirms
    pub async fn logout(&self) -> ApiResponse {
        let response: ApiResponse = self
            .send(self.empty_request(Method::POST, &["api", "auth", "logout"]))
            .await;

        if response.success {
            self.session.clear();
        }

        response
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }

    // Users

    pub async fn get_current_user(&self) -> ApiResponse<User> {
        self.send(self.get_request(&["api", "users", "me"], None)).await
    }

    /// List users, forwarding only the parameters that are set
    pub async fn get_users(&self, params: Option<&SearchParams>) -> PaginatedResponse<User> {
        self.send(self.get_request(&["api", "users"], params)).await
    }

    pub async fn get_user(&self, user_id: &str) -> ApiResponse<User> {
        self.send(self.get_request(&["api", "users", user_id], None)).await
    }

    // Groups

    pub async fn get_groups(&self, params: Option<&SearchParams>) -> PaginatedResponse<Group> {
        self.send(self.get_request(&["api", "groups"], params)).await
    }

    pub async fn get_group(&self, group_id: &str) -> ApiResponse<Group> {
        self.send(self.get_request(&["api", "groups", group_id], None)).await
    }

    pub async fn get_group_members(&self, group_id: &str) -> ApiResponse<Vec<User>> {
        self.send(self.get_request(&["api", "groups", group_id, "members"], None)).await
    }

    // Schedules

    pub async fn get_schedules(
        &self,
        params: Option<&SearchParams>,
    ) -> PaginatedResponse<Schedule> {
        self.send(self.get_request(&["api", "schedules"], params)).await
    }

    pub async fn get_schedule(&self, schedule_id: &str) -> ApiResponse<Schedule> {
        self.send(self.get_request(&["api", "schedules", schedule_id], None)).await
    }

    pub async fn create_schedule(&self, schedule: &CreateScheduleRequest) -> ApiResponse<Schedule> {
        self.send(self.json_request(Method::POST, &["api", "schedules"], schedule)).await
    }

    /// Update a schedule
    ///
    /// The request's `schedule_id` selects the path; only the changed fields
    /// are sent in the body.
    pub async fn update_schedule(&self, schedule: &UpdateScheduleRequest) -> ApiResponse<Schedule> {
        self.send(self.json_request(
            Method::PUT,
            &["api", "schedules", &schedule.schedule_id],
            schedule,
        ))
        .await
    }

    pub async fn delete_schedule(&self, schedule_id: &str) -> ApiResponse {
        self.send(self.empty_request(Method::DELETE, &["api", "schedules", schedule_id])).await
    }

    // Messages

    pub async fn get_messages(&self, params: Option<&SearchParams>) -> PaginatedResponse<Message> {
        self.send(self.get_request(&["api", "messages"], params)).await
    }

    pub async fn get_message(&self, message_id: &str) -> ApiResponse<Message> {
        self.send(self.get_request(&["api", "messages", message_id], None)).await
    }

    pub async fn send_message(&self, message: &SendMessageRequest) -> ApiResponse<Message> {
        self.send(self.json_request(Method::POST, &["api", "messages"], message)).await
    }

    pub async fn mark_message_as_read(&self, message_id: &str) -> ApiResponse {
        self.send(self.empty_request(Method::PUT, &["api", "messages", message_id, "read"])).await
    }

    pub async fn delete_message(&self, message_id: &str) -> ApiResponse {
        self.send(self.empty_request(Method::DELETE, &["api", "messages", message_id])).await
    }

    // Session

    /// Currently stored session token
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session.get()
    }

    /// Restore a previously obtained session token
    pub fn set_session_id(&self, session_id: impl Into<String>) {
        self.session.set(session_id);
    }

    pub fn clear_session(&self) {
        self.session.clear();
    }
}

impl fmt::Debug for GroupSessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSessionClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Decode a response body as a result envelope
///
/// Any status with a valid envelope is returned as-is. Otherwise the body's
/// `message` field, if present, is kept for the failure text.
fn decode_envelope<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R> {
    match serde_json::from_slice::<R>(body) {
        Ok(envelope) => Ok(envelope),
        Err(source) => {
            let message = body_message(body);
            if status.is_success() {
                tracing::debug!(%status, error = %source, "response is not a result envelope");
                Err(ClientError::InvalidResponse { message, source })
            } else {
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// `message` string field of a JSON object body
fn body_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
