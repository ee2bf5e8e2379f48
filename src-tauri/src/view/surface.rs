use super::state::{CameraListView, ViewSnapshot};
use crate::logger::{emit_camera_list, emit_view_state};
use tauri::AppHandle;

/// Куда вью отдаёт результат отрисовки
pub trait ViewSurface: Send + 'static {
    fn show_camera_list(&self, list: &CameraListView);
    fn show_view(&self, snapshot: &ViewSnapshot);
}

/// Отрисовка в webview через события Tauri
pub struct TauriSurface {
    app: AppHandle,
}

impl TauriSurface {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ViewSurface for TauriSurface {
    fn show_camera_list(&self, list: &CameraListView) {
        emit_camera_list(&self.app, list.clone());
    }

    fn show_view(&self, snapshot: &ViewSnapshot) {
        emit_view_state(&self.app, snapshot.clone());
    }
}
