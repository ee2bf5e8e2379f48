use super::poller::{PollOutcome, PollTimer};
use super::state::{
    CameraListView, Selection, StatusLine, StreamPanel, ViewPhase, ViewSnapshot, ViewState,
};
use super::surface::ViewSurface;
use crate::backend::{CameraHierarchy, StatusFetcher};
use crate::channel::{ControlEvent, ControlHandle};
use crate::error::{Error, Result};
use crate::logger::log;
use crate::session::{CameraId, StreamDescriptor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Входы от пользователя (webview)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewInput {
    LoadCameras,
    CameraClicked { camera_id: CameraId, is_classroom: bool },
    StreamFailed(CameraId),
    StopViewing,
}

/// Внутренние ответы асинхронных операций вью
pub struct ViewInbox {
    pub polls: mpsc::UnboundedReceiver<PollOutcome>,
    pub loaded: mpsc::UnboundedReceiver<Result<CameraHierarchy>>,
}

/// Клиентская сторона для команд Tauri
#[derive(Debug, Clone)]
pub struct ViewHandle {
    tx: mpsc::UnboundedSender<ViewInput>,
}

impl ViewHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewInput>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, input: ViewInput) -> Result<()> {
        self.tx
            .send(input)
            .map_err(|_| Error::ChannelClosed("view coordinator is not running"))
    }
}

/// Координатор вью. Единственный писатель ViewState; каждый
/// асинхронный ответ сверяется с текущей камерой перед изменением.
pub struct ViewCoordinator<S: ViewSurface> {
    control: ControlHandle,
    fetcher: Arc<dyn StatusFetcher>,
    surface: S,
    poll_interval: Duration,
    state: ViewState,
    polls_tx: mpsc::UnboundedSender<PollOutcome>,
    loaded_tx: mpsc::UnboundedSender<Result<CameraHierarchy>>,
}

impl<S: ViewSurface> ViewCoordinator<S> {
    pub fn new(
        control: ControlHandle,
        fetcher: Arc<dyn StatusFetcher>,
        surface: S,
        poll_interval: Duration,
    ) -> (Self, ViewInbox) {
        let (polls_tx, polls) = mpsc::unbounded_channel();
        let (loaded_tx, loaded) = mpsc::unbounded_channel();
        let coordinator = Self {
            control,
            fetcher,
            surface,
            poll_interval,
            state: ViewState::default(),
            polls_tx,
            loaded_tx,
        };
        (coordinator, ViewInbox { polls, loaded })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.phase
    }

    pub fn is_polling(&self) -> bool {
        self.state.poll.is_some()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.snapshot()
    }

    pub fn handle_input(&mut self, input: ViewInput) {
        match input {
            ViewInput::LoadCameras => self.load_cameras(),
            ViewInput::CameraClicked {
                camera_id,
                is_classroom,
            } => self.select(camera_id, is_classroom),
            ViewInput::StreamFailed(camera_id) => self.on_stream_failed(&camera_id),
            ViewInput::StopViewing => self.stop_viewing(),
        }
    }

    /// Запрашиваем иерархию у контроллера, ответ придёт в inbox.loaded
    pub fn load_cameras(&mut self) {
        log("Requesting camera config from controller...");
        self.state.camera_list = CameraListView::Loading;
        self.surface.show_camera_list(&self.state.camera_list);

        let control = self.control.clone();
        let loaded = self.loaded_tx.clone();
        tokio::spawn(async move {
            let result = control.get_cameras().await;
            let _ = loaded.send(result);
        });
    }

    pub fn on_cameras_loaded(&mut self, result: Result<CameraHierarchy>) {
        match result {
            Ok(hierarchy) if hierarchy.is_empty() => {
                self.state.camera_list = CameraListView::Empty {
                    message: "No campuses found in configuration.".to_string(),
                };
                self.state.error_banner = None;
            }
            Ok(hierarchy) => {
                log(&format!(
                    "Received camera config: {} camera(s)",
                    hierarchy.cameras().count()
                ));
                self.state.camera_list = CameraListView::Loaded { hierarchy };
                self.state.error_banner = None;
            }
            Err(e) => {
                log(&format!("Failed to load camera list: {e}"));
                self.state.camera_list = CameraListView::Failed {
                    message: format!(
                        "Error loading configuration: {e}. Ensure the backend service is running."
                    ),
                };
                self.state.error_banner = Some(format!("Failed to load camera list: {e}"));
            }
        }
        self.surface.show_camera_list(&self.state.camera_list);
        self.render();
    }

    /// Idle/Streaming/Error → Connecting
    pub fn select(&mut self, camera_id: CameraId, is_classroom: bool) {
        log(&format!("Camera clicked: {camera_id}"));
        self.state.error_banner = None;

        if self.state.is_displayed(&camera_id) {
            log("Same camera clicked, ignoring.");
            self.render();
            return;
        }

        self.state.cancel_poll();
        self.state.phase = ViewPhase::Connecting;
        self.state.displayed = Some(Selection {
            camera_id: camera_id.clone(),
            is_classroom,
        });
        self.state.descriptor = None;
        self.state.stream = StreamPanel::connecting();
        self.state.status = StatusLine::connecting();

        if let Err(e) = self.control.view_camera(camera_id.clone()) {
            log(&format!("Could not request camera {camera_id}: {e}"));
            self.state.phase = ViewPhase::Error;
            self.state.stream = StreamPanel::failed(&camera_id);
            self.state.status = StatusLine::stream_error();
            self.state.error_banner = Some(e.to_string());
        }
        self.render();
    }

    pub fn on_control_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SetStream(descriptor) => self.on_stream_descriptor(descriptor),
            ControlEvent::ClearStream => {
                // ClearStream без метки: если уже выбрана новая камера,
                // это ответ на прежний stop_viewing
                if let Some(current) = self.state.displayed_camera_id() {
                    log(&format!(
                        "Clear-stream arrived while {current} is selected. Ignoring."
                    ));
                    return;
                }
                log("Clearing stream display");
                self.state.reset_to_idle();
                self.render();
            }
        }
    }

    /// Connecting → Streaming, только для последнего выбора
    fn on_stream_descriptor(&mut self, descriptor: StreamDescriptor) {
        let Some(selection) = self.state.displayed.clone() else {
            log(&format!(
                "Received stream info for {} while idle. Ignoring.",
                descriptor.camera_id
            ));
            return;
        };
        if selection.camera_id != descriptor.camera_id {
            log(&format!(
                "Received stream info for {}, but currently viewing {}. Ignoring.",
                descriptor.camera_id, selection.camera_id
            ));
            return;
        }
        if self.state.phase != ViewPhase::Connecting {
            log(&format!(
                "Stream info for {} arrived in {:?}, ignoring duplicate",
                descriptor.camera_id, self.state.phase
            ));
            return;
        }

        log(&format!("Setting stream source to: {}", descriptor.stream_url));
        self.state.phase = ViewPhase::Streaming;
        self.state.stream = StreamPanel::Live {
            camera_id: descriptor.camera_id.clone(),
            url: descriptor.stream_url.clone(),
        };

        if selection.is_classroom {
            self.start_poll(&descriptor);
        } else {
            self.state.cancel_poll();
            self.state.status = StatusLine::not_classroom();
        }
        self.state.descriptor = Some(descriptor);
        self.render();
    }

    fn start_poll(&mut self, descriptor: &StreamDescriptor) {
        // старый таймер останавливаем до запуска нового
        self.state.cancel_poll();
        self.state.poll = Some(PollTimer::start(
            self.fetcher.clone(),
            descriptor,
            self.poll_interval,
            self.polls_tx.clone(),
        ));
    }

    /// Streaming → Error, если камера всё ещё показана
    pub fn on_stream_failed(&mut self, camera_id: &CameraId) {
        if !self.state.is_displayed(camera_id) {
            log(&format!("Stream error for {camera_id} is stale, ignoring"));
            return;
        }
        if self.state.phase != ViewPhase::Streaming {
            log(&format!(
                "Stream error for {camera_id} arrived in {:?}, ignoring",
                self.state.phase
            ));
            return;
        }
        log(&format!("Error loading stream image for {camera_id}"));

        let url = self
            .state
            .descriptor
            .as_ref()
            .map(|d| d.stream_url.clone())
            .unwrap_or_default();
        self.state.cancel_poll();
        self.state.phase = ViewPhase::Error;
        self.state.stream = StreamPanel::failed(camera_id);
        self.state.status = StatusLine::stream_error();
        self.state.error_banner = Some(format!(
            "Failed to load video stream from {url}. Ensure the backend is running and the camera RTSP URL is correct."
        ));
        self.render();
    }

    /// Любое состояние → Idle; контроллер освобождает поток
    pub fn stop_viewing(&mut self) {
        self.state.reset_to_idle();
        if let Err(e) = self.control.stop_viewing() {
            log(&format!("Could not send stop-viewing: {e}"));
        }
        self.render();
    }

    /// Ответ опроса применяем, только если метка совпадает с показанной камерой
    pub fn on_poll(&mut self, outcome: PollOutcome) {
        let PollOutcome { tag, result } = outcome;
        if !self.state.is_displayed(&tag.camera_id) {
            log(&format!(
                "Received AI status for {} ({}), but currently viewing {:?}. Ignoring.",
                tag.camera_id,
                tag.request_id,
                self.state.displayed_camera_id()
            ));
            return;
        }
        if self.state.phase != ViewPhase::Streaming {
            log(&format!(
                "AI status for {} arrived in {:?}, ignoring",
                tag.camera_id, self.state.phase
            ));
            return;
        }

        // ошибка опроса не останавливает таймер
        self.state.status = match &result {
            Ok(status) => StatusLine::presence(status),
            Err(_) => StatusLine::fetch_error(),
        };
        self.render();
    }

    fn render(&self) {
        self.surface.show_view(&self.state.snapshot());
    }

    /// Цикл актора вью
    pub async fn run(
        mut self,
        mut inbox: ViewInbox,
        mut inputs: mpsc::UnboundedReceiver<ViewInput>,
        mut events: mpsc::UnboundedReceiver<ControlEvent>,
    ) {
        log("View coordinator started");
        self.render();
        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
                Some(event) = events.recv() => self.on_control_event(event),
                Some(outcome) = inbox.polls.recv() => self.on_poll(outcome),
                Some(result) = inbox.loaded.recv() => self.on_cameras_loaded(result),
            }
        }
        self.state.cancel_poll();
        log("View coordinator stopped");
    }
}
