use crate::error::Result;
use crate::host::AppRuntime;
use crate::logger::log;
use crate::session::CameraId;
use crate::view::ViewInput;
use tauri::{command, State};

/// webview готов: грузим список камер
#[command]
pub fn load_cameras(runtime: State<'_, AppRuntime>) -> Result<()> {
    runtime.view().send(ViewInput::LoadCameras)
}

/// клик по камере в дереве
#[command]
pub fn select_camera(
    runtime: State<'_, AppRuntime>,
    camera_id: String,
    is_classroom: bool,
) -> Result<()> {
    runtime.view().send(ViewInput::CameraClicked {
        camera_id: CameraId::from(camera_id),
        is_classroom,
    })
}

/// <img> не смог загрузить поток
#[command]
pub fn stream_failed(runtime: State<'_, AppRuntime>, camera_id: String) -> Result<()> {
    runtime.view().send(ViewInput::StreamFailed(CameraId::from(camera_id)))
}

#[command]
pub fn stop_viewing(runtime: State<'_, AppRuntime>) -> Result<()> {
    log("stop_viewing called from webview");
    runtime.view().send(ViewInput::StopViewing)
}

/// адрес бэкенда для строки состояния
#[command]
pub fn backend_info(runtime: State<'_, AppRuntime>) -> String {
    runtime.endpoints().base().to_string()
}
