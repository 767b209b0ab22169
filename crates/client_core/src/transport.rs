//! Remote clock-service seam and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Event, Process, ProcessId},
    protocol::{CreateProcessRequest, EventCreated, MessageDelivered, SendMessageRequest},
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

const LIST_PROCESSES: &str = "GET /process";
const CREATE_PROCESS: &str = "POST /process";
const CREATE_EVENT: &str = "POST /process/{id}/event";
const SEND_MESSAGE: &str = "POST /process/{id}/message";
const LIST_EVENTS: &str = "GET /events";

/// The operations the clock service exposes. Clock values are only ever
/// computed on the far side of this trait.
#[async_trait]
pub trait ClockService: Send + Sync {
    async fn list_processes(&self) -> Result<Vec<Process>, ServiceError>;
    async fn create_process(&self, name: &str) -> Result<Process, ServiceError>;
    async fn create_event(&self, process_id: ProcessId) -> Result<EventCreated, ServiceError>;
    async fn send_message(
        &self,
        source: ProcessId,
        destination: ProcessId,
        message: &str,
    ) -> Result<MessageDelivered, ServiceError>;
    async fn list_events(&self) -> Result<Vec<Event>, ServiceError>;
}

pub struct HttpClockService {
    http: Client,
    base_url: String,
}

impl HttpClockService {
    /// `base_url` includes the API prefix, e.g. `http://localhost:5000/api/v1`.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let parsed = Url::parse(base_url).map_err(|source| ServiceError::Url {
            endpoint: "base url",
            source,
        })?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ServiceError::Transport {
            endpoint: "client builder",
            source,
        })?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        sent: Result<Response, reqwest::Error>,
    ) -> Result<T, ServiceError> {
        let res = sent.map_err(|source| ServiceError::Transport { endpoint, source })?;
        let status = res.status();
        debug!(endpoint, %status, "clock service responded");
        if !status.is_success() {
            return Err(ServiceError::Status { endpoint, status });
        }
        res.json()
            .await
            .map_err(|source| ServiceError::Decode { endpoint, source })
    }
}

#[async_trait]
impl ClockService for HttpClockService {
    async fn list_processes(&self) -> Result<Vec<Process>, ServiceError> {
        let sent = self
            .http
            .get(format!("{}/process", self.base_url))
            .send()
            .await;
        Self::decode(LIST_PROCESSES, sent).await
    }

    async fn create_process(&self, name: &str) -> Result<Process, ServiceError> {
        let sent = self
            .http
            .post(format!("{}/process", self.base_url))
            .json(&CreateProcessRequest {
                name: name.to_string(),
            })
            .send()
            .await;
        Self::decode(CREATE_PROCESS, sent).await
    }

    async fn create_event(&self, process_id: ProcessId) -> Result<EventCreated, ServiceError> {
        let sent = self
            .http
            .post(format!("{}/process/{process_id}/event", self.base_url))
            .send()
            .await;
        Self::decode(CREATE_EVENT, sent).await
    }

    async fn send_message(
        &self,
        source: ProcessId,
        destination: ProcessId,
        message: &str,
    ) -> Result<MessageDelivered, ServiceError> {
        let sent = self
            .http
            .post(format!("{}/process/{source}/message", self.base_url))
            .json(&SendMessageRequest {
                destination_id: destination,
                message: message.to_string(),
            })
            .send()
            .await;
        Self::decode(SEND_MESSAGE, sent).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, ServiceError> {
        let sent = self
            .http
            .get(format!("{}/events", self.base_url))
            .send()
            .await;
        Self::decode(LIST_EVENTS, sent).await
    }
}
