use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::types::{
    Analytics, BlockRequest, BlockResponse, BreakSchedule, CalendarAck, CalendarEvent,
    CreatedEvent, ErrorBody, EventUpdate, HealthStatus, NewEvent, NewSession, PlanRequest,
    SessionOutcome, StudyPlan, StudySession, SystemStatus, UnblockResponse,
};
use crate::config::ApiConfig;
use crate::core::{BlockingService, SessionStore};
use crate::error::StudyError;

/// Outcome of a single diagnostic GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// HTTP status, if a response arrived at all.
    pub status: Option<u16>,
    /// Wall-clock time until the response (or failure), in milliseconds.
    pub elapsed_ms: u64,
    /// Transport error, if any.
    pub error: Option<String>,
}

impl ProbeResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// Client for the study orchestrator REST backend.
///
/// Every request carries the timeout given at construction; exceeding it
/// surfaces as [`StudyError::Timeout`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend rooted at `base_url` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StudyError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StudyError::Config("API base URL is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudyError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Create a client from the `api` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, StudyError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, StudyError> {
        let url = self.api_url(endpoint);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        Self::parse(response).await
    }

    async fn post<B, T>(&self, endpoint: &str, body: Option<&B>) -> Result<T, StudyError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.post_raw(endpoint, body).await?;
        Self::parse(response).await
    }

    async fn post_raw<B>(&self, endpoint: &str, body: Option<&B>) -> Result<Response, StudyError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send_raw(Method::POST, endpoint, body).await
    }

    async fn send_raw<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<Response, StudyError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.api_url(endpoint);
        debug!(%url, %method, "request");
        let mut request: RequestBuilder = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::check(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, StudyError> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Turn a non-success status into an error, surfacing the backend's `{"error": ...}` text.
    async fn check(response: Response) -> Result<Response, StudyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body.trim().to_string()
                }
            });

        warn!(%url, status = status.as_u16(), %message, "backend returned an error");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StudyError::NotFound(message));
        }
        Err(StudyError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// `GET /study/sessions`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a session list.
    pub async fn list_sessions(&self) -> Result<Vec<StudySession>, StudyError> {
        let sessions: Option<Vec<StudySession>> = self.get("/study/sessions").await?;
        Ok(sessions.unwrap_or_default())
    }

    /// `GET /study/session/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] for unknown ids.
    pub async fn get_session(&self, id: &str) -> Result<StudySession, StudyError> {
        self.get(&format!("/study/session/{id}")).await
    }

    /// `POST /study/session`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the session.
    pub async fn create_session(&self, request: &NewSession) -> Result<StudySession, StudyError> {
        self.post("/study/session", Some(request)).await
    }

    /// `POST /study/session/{id}/start`
    ///
    /// The reply may be the updated session or a bare acknowledgement; neither is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the start.
    pub async fn start_session(&self, id: &str) -> Result<(), StudyError> {
        self.post_raw::<Value>(&format!("/study/session/{id}/start"), None)
            .await
            .map(drop)
    }

    /// `POST /study/session/{id}/end`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the end.
    pub async fn end_session(&self, id: &str, outcome: &SessionOutcome) -> Result<(), StudyError> {
        self.post_raw(&format!("/study/session/{id}/end"), Some(outcome))
            .await
            .map(drop)
    }

    /// `POST /study/plan`
    ///
    /// # Errors
    ///
    /// Returns an error if plan generation fails.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<StudyPlan, StudyError> {
        self.post("/study/plan", Some(request)).await
    }

    /// `GET /study/analytics`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn analytics(&self) -> Result<Analytics, StudyError> {
        self.get("/study/analytics").await
    }

    /// `POST /study/block-websites`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn block_websites(&self, request: &BlockRequest) -> Result<BlockResponse, StudyError> {
        self.post("/study/block-websites", Some(request)).await
    }

    /// `POST /study/unblock-websites`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn unblock_websites(&self) -> Result<UnblockResponse, StudyError> {
        self.post::<Value, _>("/study/unblock-websites", None).await
    }

    /// `GET /study/preferences`, as raw JSON. Shape checking happens in
    /// [`crate::features::preferences`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn preferences(&self) -> Result<Value, StudyError> {
        self.get("/study/preferences").await
    }

    /// `POST /study/preferences`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the update.
    pub async fn save_preferences<P: Serialize + Sync>(&self, preferences: &P) -> Result<(), StudyError> {
        self.post_raw("/study/preferences", Some(preferences))
            .await
            .map(drop)
    }

    /// `GET /calendar/events`, optionally for one day.
    ///
    /// The backend may ignore the date filter, so callers filter again locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an event list.
    pub async fn calendar_events(&self, date: Option<NaiveDate>) -> Result<Vec<CalendarEvent>, StudyError> {
        let endpoint = match date {
            Some(date) => format!("/calendar/events?date={}", date.format("%Y-%m-%d")),
            None => "/calendar/events".to_string(),
        };
        let events: Option<Vec<CalendarEvent>> = self.get(&endpoint).await?;
        Ok(events.unwrap_or_default())
    }

    /// `GET /calendar/event/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] for unknown ids.
    pub async fn get_event(&self, id: &str) -> Result<CalendarEvent, StudyError> {
        self.get(&format!("/calendar/event/{id}")).await
    }

    /// `POST /calendar/event`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the event.
    pub async fn create_event(&self, event: &NewEvent) -> Result<CreatedEvent, StudyError> {
        self.post("/calendar/event", Some(event)).await
    }

    /// `PUT /calendar/event/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] for unknown ids.
    pub async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<CalendarAck, StudyError> {
        let response = self
            .send_raw(Method::PUT, &format!("/calendar/event/{id}"), Some(update))
            .await?;
        Ok(response.json().await?)
    }

    /// `DELETE /calendar/event/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NotFound`] for unknown ids.
    pub async fn delete_event(&self, id: &str) -> Result<CalendarAck, StudyError> {
        let response = self
            .send_raw::<Value>(Method::DELETE, &format!("/calendar/event/{id}"), None)
            .await?;
        Ok(response.json().await?)
    }

    /// `POST /calendar/schedule-break`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn schedule_break(&self, schedule: &BreakSchedule) -> Result<CalendarAck, StudyError> {
        self.post("/calendar/schedule-break", Some(schedule)).await
    }

    /// `POST /calendar/sync`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn sync_calendar(&self) -> Result<CalendarAck, StudyError> {
        self.post::<Value, _>("/calendar/sync", None).await
    }

    /// `GET /api/status`, bounded by `timeout` instead of the client default.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or slow.
    pub async fn system_status(&self, timeout: Duration) -> Result<SystemStatus, StudyError> {
        let url = self.api_url("/status");
        let response = self.http.get(&url).timeout(timeout).send().await?;
        Self::parse(response).await
    }

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or slow.
    pub async fn health(&self, timeout: Duration) -> Result<HealthStatus, StudyError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).timeout(timeout).send().await?;
        Self::parse(response).await
    }

    /// Time a GET of `path` (relative to the base URL). Never fails; failures are
    /// reported inside the result.
    pub async fn probe(&self, path: &str, timeout: Duration) -> ProbeResult {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();
        let result = self.http.get(&url).timeout(timeout).send().await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(response) => ProbeResult {
                status: Some(response.status().as_u16()),
                elapsed_ms,
                error: None,
            },
            Err(e) => ProbeResult {
                status: e.status().map(|s| s.as_u16()),
                elapsed_ms,
                error: Some(StudyError::from(e).to_string()),
            },
        }
    }
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn start_session(&self, id: &str) -> Result<(), StudyError> {
        Self::start_session(self, id).await
    }

    async fn end_session(&self, id: &str, outcome: &SessionOutcome) -> Result<(), StudyError> {
        Self::end_session(self, id, outcome).await
    }
}

#[async_trait]
impl BlockingService for ApiClient {
    async fn block(&self, request: &BlockRequest) -> Result<BlockResponse, StudyError> {
        self.block_websites(request).await
    }

    async fn unblock(&self) -> Result<UnblockResponse, StudyError> {
        self.unblock_websites().await
    }
}
