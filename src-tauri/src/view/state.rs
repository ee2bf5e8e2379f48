use super::poller::PollTimer;
use crate::backend::{CameraHierarchy, PresenceStatus};
use crate::session::{CameraId, StreamDescriptor};
use serde::Serialize;

pub const PLACEHOLDER_TEXT: &str = "Select a camera from the list to view the stream.";
pub const CONNECTING_TEXT: &str = "Connecting to stream...";

/// Состояния вью
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewPhase {
    Idle,
    Connecting,
    Streaming,
    Error,
}

/// Строка AI-статуса: текст и css-класс
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusLine {
    pub text: String,
    pub class: &'static str,
}

const NEUTRAL: &str = "status-bar";
const ERROR: &str = "status-bar error";

impl StatusLine {
    fn new(text: impl Into<String>, class: &'static str) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }

    pub fn idle() -> Self {
        Self::new("AI Status: Idle", NEUTRAL)
    }

    pub fn connecting() -> Self {
        Self::new("AI Status: Connecting...", NEUTRAL)
    }

    pub fn not_classroom() -> Self {
        Self::new("AI Status: N/A (Not a classroom)", NEUTRAL)
    }

    pub fn stream_error() -> Self {
        Self::new("AI Status: Error", ERROR)
    }

    pub fn fetch_error() -> Self {
        Self::new("AI Status: Error fetching status", ERROR)
    }

    pub fn presence(status: &PresenceStatus) -> Self {
        match status {
            PresenceStatus::PersonVisible => {
                Self::new("AI Status: Teacher Visible", "status-bar visible")
            }
            PresenceStatus::PersonNotVisible => {
                Self::new("AI Status: Teacher Not Visible", "status-bar not-visible")
            }
            PresenceStatus::Processing => Self::new("AI Status: Processing...", NEUTRAL),
            PresenceStatus::Unknown => Self::new("AI Status: Unknown", NEUTRAL),
            PresenceStatus::BackendError(msg) => {
                Self::new(format!("AI Status: Error ({msg})"), ERROR)
            }
        }
    }
}

/// Что показывает область видео
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StreamPanel {
    Placeholder { message: String },
    Connecting { message: String },
    #[serde(rename_all = "camelCase")]
    Live { camera_id: CameraId, url: String },
    #[serde(rename_all = "camelCase")]
    Failed { camera_id: CameraId, message: String },
}

impl StreamPanel {
    pub fn placeholder() -> Self {
        StreamPanel::Placeholder {
            message: PLACEHOLDER_TEXT.to_string(),
        }
    }

    pub fn connecting() -> Self {
        StreamPanel::Connecting {
            message: CONNECTING_TEXT.to_string(),
        }
    }

    pub fn failed(camera_id: &CameraId) -> Self {
        StreamPanel::Failed {
            camera_id: camera_id.clone(),
            message: format!(
                "Error connecting to stream for {camera_id}. Check backend and camera."
            ),
        }
    }
}

/// Список камер в боковой панели
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CameraListView {
    Loading,
    Loaded { hierarchy: CameraHierarchy },
    Empty { message: String },
    Failed { message: String },
}

/// Выбранная пользователем камера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub camera_id: CameraId,
    pub is_classroom: bool,
}

/// Полный снимок для отрисовки
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub phase: ViewPhase,
    pub selected_camera_id: Option<CameraId>,
    pub stream: StreamPanel,
    pub status: StatusLine,
    pub error_banner: Option<String>,
}

/// Состояние вью. Таймер опроса живёт только пока выбрана
/// камера-класс и мы в Streaming.
#[derive(Debug)]
pub struct ViewState {
    pub(crate) phase: ViewPhase,
    pub(crate) displayed: Option<Selection>,
    pub(crate) descriptor: Option<StreamDescriptor>,
    pub(crate) poll: Option<PollTimer>,
    pub(crate) stream: StreamPanel,
    pub(crate) status: StatusLine,
    pub(crate) error_banner: Option<String>,
    pub(crate) camera_list: CameraListView,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Idle,
            displayed: None,
            descriptor: None,
            poll: None,
            stream: StreamPanel::placeholder(),
            status: StatusLine::idle(),
            error_banner: None,
            camera_list: CameraListView::Loading,
        }
    }
}

impl ViewState {
    pub fn displayed_camera_id(&self) -> Option<&CameraId> {
        self.displayed.as_ref().map(|s| &s.camera_id)
    }

    pub fn is_displayed(&self, id: &CameraId) -> bool {
        self.displayed_camera_id() == Some(id)
    }

    /// останавливаем таймер, если он есть
    pub(crate) fn cancel_poll(&mut self) -> bool {
        self.poll.take().is_some()
    }

    pub(crate) fn reset_to_idle(&mut self) {
        self.cancel_poll();
        self.phase = ViewPhase::Idle;
        self.displayed = None;
        self.descriptor = None;
        self.stream = StreamPanel::placeholder();
        self.status = StatusLine::idle();
        self.error_banner = None;
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            phase: self.phase,
            selected_camera_id: self.displayed_camera_id().cloned(),
            stream: self.stream.clone(),
            status: self.status.clone(),
            error_banner: self.error_banner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_lines_are_distinct() {
        let lines = [
            StatusLine::presence(&PresenceStatus::PersonVisible),
            StatusLine::presence(&PresenceStatus::PersonNotVisible),
            StatusLine::presence(&PresenceStatus::Processing),
            StatusLine::presence(&PresenceStatus::Unknown),
            StatusLine::presence(&PresenceStatus::BackendError("x".into())),
            StatusLine::fetch_error(),
        ];
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                assert_ne!(a.text, b.text);
            }
        }
        assert_eq!(lines[0].text, "AI Status: Teacher Visible");
        assert_eq!(lines[0].class, "status-bar visible");
        assert_eq!(lines[4].text, "AI Status: Error (x)");
    }

    #[test]
    fn snapshot_serializes_for_webview() {
        let mut state = ViewState::default();
        state.phase = ViewPhase::Streaming;
        state.displayed = Some(Selection {
            camera_id: "cam1".into(),
            is_classroom: true,
        });
        state.stream = StreamPanel::Live {
            camera_id: "cam1".into(),
            url: "http://127.0.0.1:5001/stream/cam1".into(),
        };
        let v = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(v["phase"], "streaming");
        assert_eq!(v["selectedCameraId"], "cam1");
        assert_eq!(v["stream"]["kind"], "live");
        assert_eq!(v["stream"]["cameraId"], "cam1");
        assert_eq!(v["status"]["class"], "status-bar");
        assert!(v["errorBanner"].is_null());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = ViewState::default();
        state.phase = ViewPhase::Error;
        state.displayed = Some(Selection {
            camera_id: "cam1".into(),
            is_classroom: false,
        });
        state.error_banner = Some("boom".into());
        state.status = StatusLine::stream_error();
        state.reset_to_idle();
        assert_eq!(state.snapshot(), ViewState::default().snapshot());
    }
}
