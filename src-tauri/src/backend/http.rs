use super::types::{CameraHierarchy, PresenceStatus, StatusReport};
use super::{Backend, StatusFetcher, StopReceipt};
use crate::config::{AppConfig, Endpoints};
use crate::error::{Error, Result};
use crate::logger::log;
use crate::session::CameraId;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP-клиент бэкенда (один Client на всё приложение)
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoints })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Self::new(cfg.endpoints()?, cfg.request_timeout)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_cameras(&self) -> Result<CameraHierarchy> {
        let url = self.endpoints.cameras_url();
        log(&format!("GET {url}"));
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::from_transport)?;
        if !status.is_success() {
            log(&format!("Backend error getting cameras: {status} {body}"));
            return Err(Error::BackendRejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            log(&format!("Failed to parse camera config: {e}"));
            Error::from(e)
        })
    }

    async fn stop_stream(&self, id: &CameraId) -> Result<StopReceipt> {
        let url = self.endpoints.stop_url(id);
        let resp = self
            .client
            .post(url)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = resp.status().as_u16();
        // тело читаем только ради лога
        let body = resp.text().await.unwrap_or_default();
        Ok(StopReceipt { status, body })
    }
}

#[async_trait]
impl StatusFetcher for HttpBackend {
    async fn fetch_status(&self, status_url: &str) -> Result<PresenceStatus> {
        let resp = self
            .client
            .get(status_url)
            .send()
            .await
            .map_err(|e| Error::PollFailure(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::PollFailure(format!("HTTP error {}", status.as_u16())));
        }

        let report: StatusReport = resp
            .json()
            .await
            .map_err(|e| Error::PollFailure(e.to_string()))?;
        Ok(report.into())
    }
}
