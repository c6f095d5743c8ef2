use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::backend::models::{
    ConnectRequest, ConnectionReply, ControlRequest, ControlState, PortSetting, RawSample,
    RecordingRequest,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Request/response contract of the rig backend.
///
/// Every device endpoint is addressed by its access point (a path prefix such
/// as `/MFC1`); the remaining calls are global.
#[async_trait]
pub trait RigBackend: Send + Sync {
    /// `GET {access_point}/fetch_data`
    async fn fetch_samples(&self, access_point: &str) -> AppResult<Vec<RawSample>>;

    /// `POST {access_point}/connect`
    async fn connect(&self, access_point: &str, port: &PortSetting)
        -> AppResult<ConnectionReply>;

    /// `GET {access_point}/connect`
    async fn connection_status(&self, access_point: &str) -> AppResult<ConnectionReply>;

    async fn current_control(&self) -> AppResult<ControlState>;

    async fn set_control(&self, request: &ControlRequest) -> AppResult<ControlState>;

    async fn start_recording(&self, directory: &str) -> AppResult<serde_json::Value>;

    async fn stop_recording(&self) -> AppResult<serde_json::Value>;
}

pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.rig_backend_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "{path}: HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Backend(format!("{path}: failed to read response: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(
                path,
                error = %e,
                body_preview = %text.chars().take(200).collect::<String>(),
                "Failed to parse rig backend response"
            );
            AppError::Backend(format!("{path}: failed to parse response: {e}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("{path}: request failed: {e}")))?;

        self.read_json(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> AppResult<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http_client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("{path}: request failed: {e}")))?;

        self.read_json(path, response).await
    }
}

#[async_trait]
impl RigBackend for BackendClient {
    async fn fetch_samples(&self, access_point: &str) -> AppResult<Vec<RawSample>> {
        self.get_json(&format!("{access_point}/fetch_data")).await
    }

    async fn connect(
        &self,
        access_point: &str,
        port: &PortSetting,
    ) -> AppResult<ConnectionReply> {
        let path = format!("{access_point}/connect");
        let response = self
            .http_client
            .post(self.url(&path))
            .json(&ConnectRequest { port })
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("{path}: request failed: {e}")))?;

        // A refused connection comes back as 400 with a regular reply body.
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let text = response.text().await.unwrap_or_default();
            return serde_json::from_str(&text)
                .map_err(|e| AppError::Backend(format!("{path}: failed to parse response: {e}")));
        }

        self.read_json(&path, response).await
    }

    async fn connection_status(&self, access_point: &str) -> AppResult<ConnectionReply> {
        self.get_json(&format!("{access_point}/connect")).await
    }

    async fn current_control(&self) -> AppResult<ControlState> {
        self.get_json("/get_current_control").await
    }

    async fn set_control(&self, request: &ControlRequest) -> AppResult<ControlState> {
        self.post_json("/set_control", Some(request)).await
    }

    async fn start_recording(&self, directory: &str) -> AppResult<serde_json::Value> {
        let body = RecordingRequest {
            directory: directory.to_string(),
        };
        self.post_json("/start_recording_data", Some(&body)).await
    }

    async fn stop_recording(&self) -> AppResult<serde_json::Value> {
        self.post_json::<(), _>("/stop_recording_data", None).await
    }
}
