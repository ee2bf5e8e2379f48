use super::Backend;
use crate::logger::log;
use crate::session::CameraId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Очередь stop-запросов. Постановка в очередь = "запрос отправлен".
pub type StopQueue = mpsc::UnboundedSender<CameraId>;

pub fn stop_queue() -> (StopQueue, mpsc::UnboundedReceiver<CameraId>) {
    mpsc::unbounded_channel()
}

/// Разбирает очередь по одному запросу за раз. Повторов нет:
/// недоступный бэкенд просто логируется.
pub async fn run_stop_dispatcher(
    backend: Arc<dyn Backend>,
    mut queue: mpsc::UnboundedReceiver<CameraId>,
) {
    while let Some(id) = queue.recv().await {
        match backend.stop_stream(&id).await {
            Ok(receipt) => {
                log(&format!("Stop stream response status: {}", receipt.status));
                if !receipt.body.is_empty() {
                    log(&format!("Stop stream response body: {}", receipt.body));
                }
            }
            Err(e) => log(&format!("Error stopping stream {id}: {e}")),
        }
    }
    log("Stop dispatcher finished, queue closed");
}
