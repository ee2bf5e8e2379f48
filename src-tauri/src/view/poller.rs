use crate::backend::{PresenceStatus, StatusFetcher};
use crate::error::Result;
use crate::logger::log;
use crate::session::{CameraId, StreamDescriptor};
use crate::utils::random_id;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Метка запроса: камера на момент отправки + id для корреляции
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTag {
    pub camera_id: CameraId,
    pub request_id: String,
}

#[derive(Debug)]
pub struct PollOutcome {
    pub tag: PollTag,
    pub result: Result<PresenceStatus>,
}

/// Повторяющийся опрос статуса. Остановка при drop.
#[derive(Debug)]
pub struct PollTimer {
    camera_id: CameraId,
    handle: JoinHandle<()>,
}

impl PollTimer {
    /// Первый запрос сразу, дальше каждые `interval`.
    /// Уже отправленные запросы не отменяются, их отсеивает метка.
    pub fn start(
        fetcher: Arc<dyn StatusFetcher>,
        descriptor: &StreamDescriptor,
        interval: Duration,
        results: mpsc::UnboundedSender<PollOutcome>,
    ) -> Self {
        let camera_id = descriptor.camera_id.clone();
        let status_url = descriptor.status_url.clone();
        log(&format!("Starting AI status polling for {camera_id} at {status_url}"));

        let task_camera = camera_id.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if results.is_closed() {
                    break;
                }
                let tag = PollTag {
                    camera_id: task_camera.clone(),
                    request_id: random_id(),
                };
                let fetcher = fetcher.clone();
                let url = status_url.clone();
                let results = results.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch_status(&url).await;
                    if let Err(e) = &result {
                        log(&format!(
                            "Error fetching AI status for {} ({}): {e}",
                            tag.camera_id, tag.request_id
                        ));
                    }
                    let _ = results.send(PollOutcome { tag, result });
                });
            }
        });

        Self { camera_id, handle }
    }

    pub fn camera_id(&self) -> &CameraId {
        &self.camera_id
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        log(&format!("Stopping AI status polling for {}", self.camera_id));
        self.handle.abort();
    }
}
