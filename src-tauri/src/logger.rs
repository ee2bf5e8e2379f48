use crate::config::{dev, ENV_LOG, LOGGING_ENABLED};
use once_cell::sync::Lazy;
use serde::Serialize;
use tauri::{AppHandle, Emitter};

/// События для webview
pub const EVT_CAMERA_LIST: &str = "camera-list";
pub const EVT_VIEW_STATE: &str = "view-state";

// CAMVIEW_LOG перекрывает настройку сборки
static RUNTIME_LOGGING: Lazy<bool> = Lazy::new(|| match std::env::var(ENV_LOG) {
    Ok(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "off" | "false"),
    Err(_) => LOGGING_ENABLED && dev::ENABLE_LOGGING,
});

/// Логирование с временными метками
pub fn log(msg: &str) {
    if !*RUNTIME_LOGGING {
        return;
    }
    let now = chrono::Local::now();
    println!("RUST: [{}] {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), msg);
}

fn emit_payload<S: Serialize + Clone>(app: &AppHandle, evt: &str, payload: S) {
    match app.emit(evt, payload) {
        Ok(_) => {}
        Err(e) => log(&format!("Failed to emit event {}: {:?}", evt, e)),
    }
}

pub fn emit_camera_list<S: Serialize + Clone>(app: &AppHandle, list: S) {
    log("emit camera-list");
    emit_payload(app, EVT_CAMERA_LIST, list);
}

pub fn emit_view_state<S: Serialize + Clone>(app: &AppHandle, snapshot: S) {
    emit_payload(app, EVT_VIEW_STATE, snapshot);
}
