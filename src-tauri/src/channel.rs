//! Канал между контроллером (привилегированная сторона) и вью.

use crate::backend::CameraHierarchy;
use crate::error::{Error, Result};
use crate::session::{CameraId, StreamDescriptor};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

/// Запросы от вью к контроллеру
#[derive(Debug)]
pub enum ControlRequest {
    /// запрос/ответ
    GetCameras {
        reply: oneshot::Sender<Result<CameraHierarchy>>,
    },
    /// fire-and-forget
    ViewCamera(CameraId),
    StopViewing,
    /// только из хоста при завершении процесса
    Shutdown { ack: oneshot::Sender<()> },
}

/// Push-события от контроллера к вью
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ControlEvent {
    SetStream(StreamDescriptor),
    ClearStream,
}

pub fn control_channel() -> (ControlHandle, mpsc::UnboundedReceiver<ControlRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ControlHandle { tx }, rx)
}

pub fn event_channel() -> (
    mpsc::UnboundedSender<ControlEvent>,
    mpsc::UnboundedReceiver<ControlEvent>,
) {
    mpsc::unbounded_channel()
}

/// Клиентская сторона канала, её держит вью и хост
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::UnboundedSender<ControlRequest>,
}

impl ControlHandle {
    pub async fn get_cameras(&self) -> Result<CameraHierarchy> {
        let (reply, rx) = oneshot::channel();
        self.send(ControlRequest::GetCameras { reply })?;
        rx.await
            .map_err(|_| Error::ChannelClosed("controller dropped camera request"))?
    }

    pub fn view_camera(&self, id: CameraId) -> Result<()> {
        self.send(ControlRequest::ViewCamera(id))
    }

    pub fn stop_viewing(&self) -> Result<()> {
        self.send(ControlRequest::StopViewing)
    }

    /// ждём, пока контроллер освободит активный поток
    pub async fn shutdown(&self) -> Result<()> {
        let (ack, rx) = oneshot::channel();
        self.send(ControlRequest::Shutdown { ack })?;
        rx.await
            .map_err(|_| Error::ChannelClosed("controller dropped shutdown ack"))
    }

    fn send(&self, req: ControlRequest) -> Result<()> {
        self.tx
            .send(req)
            .map_err(|_| Error::ChannelClosed("controller is not running"))
    }
}
