use serde::{Serialize, Serializer};
use thiserror::Error;

/// Ошибки общения с бэкендом и между акторами
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// соединение отклонено или истёк таймаут
    #[error("Could not connect to backend service: {0}")]
    BackendUnreachable(String),

    /// не JSON или не та схема
    #[error("Malformed response from backend: {0}")]
    BackendMalformedResponse(String),

    /// бэкенд ответил не-2xx
    #[error("Backend error: {status}")]
    BackendRejected { status: u16, body: String },

    /// картинка потока не загрузилась
    #[error("Failed to load video stream for {0}")]
    StreamRenderFailure(String),

    /// разовая ошибка опроса статуса
    #[error("Status poll failed: {0}")]
    PollFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),

    /// сессия уже завершена, новые потоки не запускаем
    #[error("Session is shut down")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// ошибки reqwest раскладываем по таксономии
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::BackendMalformedResponse(err.to_string())
        } else {
            Error::BackendUnreachable(err.to_string())
        }
    }

    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Error::BackendUnreachable(_)
                | Error::BackendMalformedResponse(_)
                | Error::BackendRejected { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::BackendMalformedResponse(err.to_string())
    }
}

// через границу IPC уходит только текст
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
