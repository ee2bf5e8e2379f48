use crate::backend::{run_stop_dispatcher, stop_queue, Backend, HttpBackend, StatusFetcher};
use crate::channel::{control_channel, event_channel, ControlHandle};
use crate::config::{AppConfig, Endpoints};
use crate::controller::{run_controller, SessionController};
use crate::error::Result;
use crate::logger::log;
use crate::view::{TauriSurface, ViewCoordinator, ViewHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tauri::async_runtime::JoinHandle;
use tauri::AppHandle;

/// Запущенные акторы приложения
pub struct AppRuntime {
    control: ControlHandle,
    view: ViewHandle,
    endpoints: Endpoints,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    shutdown_grace: Duration,
    shut_down: AtomicBool,
}

impl AppRuntime {
    /// поднимаем диспетчер stop-запросов, контроллер и вью
    pub fn start(app: AppHandle, cfg: &AppConfig) -> Result<Self> {
        let http = Arc::new(HttpBackend::from_config(cfg)?);
        let endpoints = http.endpoints().clone();
        let backend: Arc<dyn Backend> = http.clone();
        let fetcher: Arc<dyn StatusFetcher> = http;

        let (stops, stop_rx) = stop_queue();
        let dispatcher = tauri::async_runtime::spawn(run_stop_dispatcher(backend.clone(), stop_rx));

        let controller = SessionController::new(backend, endpoints.clone(), stops);
        let (control, requests) = control_channel();
        let (events_tx, events_rx) = event_channel();
        tauri::async_runtime::spawn(run_controller(controller, requests, events_tx));

        let (view, inputs) = ViewHandle::channel();
        let (coordinator, inbox) = ViewCoordinator::new(
            control.clone(),
            fetcher,
            TauriSurface::new(app.clone()),
            cfg.poll_interval,
        );
        tauri::async_runtime::spawn(coordinator.run(inbox, inputs, events_rx));

        // сигналы завершения идут через обычный путь выхода
        tauri::async_runtime::spawn(async move {
            let signal = termination_signal().await;
            log(&format!("{signal} received, exiting"));
            app.exit(0);
        });

        log(&format!("Backend at {}", endpoints.base()));
        Ok(Self {
            control,
            view,
            endpoints,
            dispatcher: Mutex::new(Some(dispatcher)),
            shutdown_grace: cfg.shutdown_grace,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Освобождаем сессию и ждём отправки stop-запросов. Повторные
    /// вызовы ничего не делают.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        log("Shutting down session");
        match tokio::time::timeout(self.shutdown_grace, self.control.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log(&format!("Controller shutdown: {e}")),
            Err(_) => log("Controller did not acknowledge shutdown in time"),
        }

        let dispatcher = self.dispatcher.lock().ok().and_then(|mut d| d.take());
        if let Some(handle) = dispatcher {
            if tokio::time::timeout(self.shutdown_grace, handle).await.is_err() {
                log("Stop requests still in flight at exit");
            }
        }
    }
}

/// Ждём SIGINT, SIGTERM или SIGHUP (на Windows только Ctrl-C)
#[cfg(unix)]
async fn termination_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            log(&format!("Cannot listen for SIGTERM: {e}"));
            None
        }
    };
    let mut hup = match signal(SignalKind::hangup()) {
        Ok(s) => Some(s),
        Err(e) => {
            log(&format!("Cannot listen for SIGHUP: {e}"));
            None
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        Some(_) = recv_signal(term.as_mut()) => "SIGTERM",
        Some(_) = recv_signal(hup.as_mut()) => "SIGHUP",
    }
}

#[cfg(unix)]
async fn recv_signal(sig: Option<&mut tokio::signal::unix::Signal>) -> Option<()> {
    match sig {
        Some(sig) => sig.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "Ctrl-C"
}
