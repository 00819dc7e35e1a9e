// HTTP oven backend implementation
use crate::application::oven_backend::{BackendError, OvenBackend};
use crate::domain::oven::{OvenStatus, StartCommand};
use crate::domain::profile::Profile;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpOvenBackend {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    #[serde(default)]
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    name: String,
    #[serde(flatten)]
    params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TempsResponse {
    current: f64,
    target: f64,
    running: bool,
}

#[derive(Debug, Serialize)]
struct StartRequest {
    idx: i32,
    temp: f64,
}

impl HttpOvenBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::Unreachable(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Malformed(format!("{} body: {}", path, e)))
    }

    async fn post(&self, request: reqwest::RequestBuilder) -> Result<(), BackendError> {
        let response = request.send().await.map_err(transport_error)?;
        check_status(response)?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> BackendError {
    BackendError::Unreachable(e.to_string())
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status(status.as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl OvenBackend for HttpOvenBackend {
    async fn fetch_profiles(&self) -> Result<Vec<Profile>, BackendError> {
        let body: ProfilesResponse = self.get_json("/profiles").await?;
        Ok(body
            .profiles
            .into_iter()
            .map(|entry| Profile::new(entry.name, entry.params))
            .collect())
    }

    async fn fetch_status(&self) -> Result<OvenStatus, BackendError> {
        let body: TempsResponse = self.get_json("/temps").await?;
        Ok(OvenStatus::new(body.current, body.target, body.running))
    }

    async fn start(&self, command: StartCommand) -> Result<(), BackendError> {
        let body = StartRequest {
            idx: command.idx,
            temp: command.temp,
        };
        self.post(self.client.post(self.url("/start")).json(&body)).await
    }

    async fn stop(&self) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.url("/stop"))
            .header(CONTENT_TYPE, "application/json")
            .body("");
        self.post(request).await
    }
}
