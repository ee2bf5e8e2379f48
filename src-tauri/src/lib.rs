pub mod backend;
pub mod channel;
mod commands;
pub mod config;
pub mod controller;
pub mod error;
mod host;
pub mod logger;
pub mod session;
pub mod utils;
pub mod view;

use crate::config::AppConfig;
use crate::host::AppRuntime;
use crate::logger::log;
use crate::view::ViewInput;
use commands::view_api;
use tauri::{Manager, RunEvent, WindowEvent};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let cfg = AppConfig::from_env();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let runtime = AppRuntime::start(app.handle().clone(), &cfg)?;
            app.manage(runtime);
            Ok(())
        })
        .on_window_event(|window, event| {
            // закрытие окна = перестаём смотреть
            if let WindowEvent::Destroyed = event {
                log(&format!("Window {} closed", window.label()));
                if let Some(runtime) = window.try_state::<AppRuntime>() {
                    let _ = runtime.view().send(ViewInput::StopViewing);
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            view_api::load_cameras,
            view_api::select_camera,
            view_api::stream_failed,
            view_api::stop_viewing,
            view_api::backend_info,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app, event| {
            // все пути выхода (quit, последнее окно, Ctrl-C) приходят сюда
            if let RunEvent::Exit = event {
                if let Some(runtime) = app.try_state::<AppRuntime>() {
                    tauri::async_runtime::block_on(runtime.shutdown());
                }
                log("Application exited");
            }
        });
}
