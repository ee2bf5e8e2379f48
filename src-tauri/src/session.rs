use crate::config::Endpoints;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор камеры, уникален во всей иерархии
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CameraId(String);

impl CameraId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CameraId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CameraId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Что отдаём вью после выбора камеры. Неизменяемое.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub camera_id: CameraId,
    pub stream_url: String,
    pub status_url: String,
}

impl StreamDescriptor {
    pub fn for_camera(id: &CameraId, endpoints: &Endpoints) -> Self {
        Self {
            camera_id: id.clone(),
            stream_url: endpoints.stream_url(id).to_string(),
            status_url: endpoints.status_url(id).to_string(),
        }
    }
}

/// Единственное состояние контроллера: какая камера сейчас активна
#[derive(Debug, Default)]
pub struct Session {
    active_camera_id: Option<CameraId>,
}

impl Session {
    pub fn active(&self) -> Option<&CameraId> {
        self.active_camera_id.as_ref()
    }

    pub fn is_active(&self, id: &CameraId) -> bool {
        self.active_camera_id.as_ref() == Some(id)
    }

    /// записываем новую активную камеру, возвращаем прежнюю
    pub(crate) fn replace(&mut self, id: CameraId) -> Option<CameraId> {
        self.active_camera_id.replace(id)
    }

    pub(crate) fn take(&mut self) -> Option<CameraId> {
        self.active_camera_id.take()
    }
}
