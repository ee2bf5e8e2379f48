use crate::backend::{Backend, CameraHierarchy, StopQueue};
use crate::channel::{ControlEvent, ControlRequest};
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::logger::log;
use crate::session::{CameraId, Session, StreamDescriptor};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Контроллер сессии: единственный, кто решает, какой поток активен
pub struct SessionController {
    backend: Arc<dyn Backend>,
    endpoints: Endpoints,
    session: Session,
    stops: StopQueue,
    shut_down: bool,
}

impl SessionController {
    pub fn new(backend: Arc<dyn Backend>, endpoints: Endpoints, stops: StopQueue) -> Self {
        Self {
            backend,
            endpoints,
            session: Session::default(),
            stops,
            shut_down: false,
        }
    }

    pub fn active(&self) -> Option<&CameraId> {
        self.session.active()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Чтение иерархии камер; состояние сессии не трогает
    pub async fn list_cameras(&self) -> Result<CameraHierarchy> {
        self.cameras_request().await
    }

    /// то же, но future не держит &self — можно отдать в spawn
    pub fn cameras_request(&self) -> impl Future<Output = Result<CameraHierarchy>> + Send + 'static {
        let backend = self.backend.clone();
        async move { backend.fetch_cameras().await }
    }

    /// Выбор камеры. Stop для прежней ставится в очередь до того,
    /// как мы вернём дескриптор новой.
    pub fn select_camera(&mut self, id: CameraId) -> Result<StreamDescriptor> {
        if self.shut_down {
            log(&format!("select_camera({id}) after shutdown, refusing"));
            return Err(Error::SessionClosed);
        }

        if self.session.is_active(&id) {
            log(&format!("Camera {id} is already active, returning existing descriptor"));
            return Ok(self.descriptor(&id));
        }

        if let Some(prev) = self.session.replace(id.clone()) {
            self.issue_stop(prev);
        }
        Ok(self.descriptor(&id))
    }

    /// Возвращает true, если был активный поток
    pub fn clear_selection(&mut self) -> bool {
        match self.session.take() {
            Some(prev) => {
                self.issue_stop(prev);
                true
            }
            None => false,
        }
    }

    /// Освобождаем активный поток ровно один раз за жизнь контроллера
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if self.clear_selection() {
            log("Shutdown: stop request issued for active stream");
        } else {
            log("Shutdown: no active stream");
        }
    }

    fn descriptor(&self, id: &CameraId) -> StreamDescriptor {
        StreamDescriptor::for_camera(id, &self.endpoints)
    }

    fn issue_stop(&self, id: CameraId) {
        log(&format!("Issuing stop for stream {id}"));
        if self.stops.send(id).is_err() {
            // диспетчер уже закрыт, повторять не будем
            log("Stop dispatcher is gone, stop request dropped");
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Цикл актора контроллера. Завершается по Shutdown или когда
/// закрыты все ControlHandle.
pub async fn run_controller(
    mut controller: SessionController,
    mut requests: mpsc::UnboundedReceiver<ControlRequest>,
    events: mpsc::UnboundedSender<ControlEvent>,
) {
    log("Session controller started");
    while let Some(req) = requests.recv().await {
        match req {
            ControlRequest::GetCameras { reply } => {
                let request = controller.cameras_request();
                tokio::spawn(async move {
                    let result = request.await;
                    if let Err(e) = &result {
                        log(&format!("Error fetching cameras from backend: {e}"));
                    }
                    let _ = reply.send(result);
                });
            }
            ControlRequest::ViewCamera(id) => {
                log(&format!("Controller received view-camera request for: {id}"));
                match controller.select_camera(id) {
                    Ok(descriptor) => push(&events, ControlEvent::SetStream(descriptor)),
                    Err(e) => log(&format!("view-camera refused: {e}")),
                }
            }
            ControlRequest::StopViewing => {
                log("Controller received stop-viewing request");
                controller.clear_selection();
                push(&events, ControlEvent::ClearStream);
            }
            ControlRequest::Shutdown { ack } => {
                controller.shutdown();
                let _ = ack.send(());
                break;
            }
        }
    }
    log("Session controller stopped");
}

fn push(events: &mpsc::UnboundedSender<ControlEvent>, event: ControlEvent) {
    if events.send(event).is_err() {
        log("View is not listening, event dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{stop_queue, StopReceipt};
    use async_trait::async_trait;

    struct NoBackend;

    #[async_trait]
    impl Backend for NoBackend {
        async fn fetch_cameras(&self) -> Result<CameraHierarchy> {
            Err(Error::BackendUnreachable("test".into()))
        }

        async fn stop_stream(&self, _id: &CameraId) -> Result<StopReceipt> {
            unreachable!("stops are only queued in unit tests")
        }
    }

    fn controller() -> (SessionController, mpsc::UnboundedReceiver<CameraId>) {
        let (stops, rx) = stop_queue();
        let ep = Endpoints::new("127.0.0.1", 5001).unwrap();
        (SessionController::new(Arc::new(NoBackend), ep, stops), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<CameraId>) -> Vec<CameraId> {
        let mut out = Vec::new();
        while let Ok(id) = rx.try_recv() {
            out.push(id);
        }
        out
    }

    #[test]
    fn first_selection_issues_no_stop() {
        let (mut c, mut rx) = controller();
        let d = c.select_camera("cam1".into()).unwrap();
        assert_eq!(d.camera_id, CameraId::from("cam1"));
        assert_eq!(d.stream_url, "http://127.0.0.1:5001/stream/cam1");
        assert_eq!(d.status_url, "http://127.0.0.1:5001/ai_status/cam1");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn switching_stops_previous_exactly_once_before_returning() {
        let (mut c, mut rx) = controller();
        c.select_camera("a".into()).unwrap();
        let d = c.select_camera("b".into()).unwrap();
        // stop уже в очереди к моменту возврата
        assert_eq!(drain(&mut rx), vec![CameraId::from("a")]);
        assert_eq!(d.camera_id, CameraId::from("b"));
        assert_eq!(c.active(), Some(&CameraId::from("b")));
    }

    #[test]
    fn reselecting_active_camera_is_a_no_op() {
        let (mut c, mut rx) = controller();
        let first = c.select_camera("a".into()).unwrap();
        let second = c.select_camera("a".into()).unwrap();
        assert_eq!(first, second);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn clear_selection_is_idempotent() {
        let (mut c, mut rx) = controller();
        assert!(!c.clear_selection());
        c.select_camera("a".into()).unwrap();
        assert!(c.clear_selection());
        assert!(!c.clear_selection());
        assert_eq!(drain(&mut rx), vec![CameraId::from("a")]);
        assert!(c.active().is_none());
    }

    #[test]
    fn shutdown_stops_once_even_when_dropped_afterwards() {
        let (mut c, mut rx) = controller();
        c.select_camera("a".into()).unwrap();
        c.shutdown();
        c.shutdown();
        drop(c);
        assert_eq!(drain(&mut rx), vec![CameraId::from("a")]);
    }

    #[test]
    fn drop_retires_active_stream() {
        let (mut c, mut rx) = controller();
        c.select_camera("a".into()).unwrap();
        drop(c);
        assert_eq!(drain(&mut rx), vec![CameraId::from("a")]);
    }

    #[test]
    fn selection_after_shutdown_is_refused() {
        let (mut c, mut rx) = controller();
        c.shutdown();
        assert_eq!(c.select_camera("a".into()), Err(Error::SessionClosed));
        drop(c);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn stop_with_closed_dispatcher_does_not_panic() {
        let (mut c, rx) = controller();
        drop(rx);
        c.select_camera("a".into()).unwrap();
        c.select_camera("b".into()).unwrap();
        c.shutdown();
    }
}
