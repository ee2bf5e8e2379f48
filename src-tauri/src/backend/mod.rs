pub mod dispatcher;
pub mod http;
pub mod types;

use crate::error::Result;
use crate::session::CameraId;
use async_trait::async_trait;

pub use dispatcher::{run_stop_dispatcher, stop_queue, StopQueue};
pub use http::HttpBackend;
pub use types::{Building, Camera, CameraHierarchy, Campus, Floor, PresenceStatus, StatusReport};

/// Ответ на stop-запрос; тело нужно только для лога
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReceipt {
    pub status: u16,
    pub body: String,
}

/// Привилегированная сторона: конфигурация камер и остановка потоков
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn fetch_cameras(&self) -> Result<CameraHierarchy>;

    /// любой HTTP-статус считается доставкой, Err только при сбое транспорта
    async fn stop_stream(&self, id: &CameraId) -> Result<StopReceipt>;
}

/// Сторона вью: опрос /ai_status
#[async_trait]
pub trait StatusFetcher: Send + Sync + 'static {
    async fn fetch_status(&self, status_url: &str) -> Result<PresenceStatus>;
}
