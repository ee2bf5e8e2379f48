// Конфигурация приложения
// Логирование можно отключить только в режиме разработки
// или переменной окружения CAMVIEW_LOG

use crate::error::{Error, Result};
use crate::session::CameraId;
use std::time::Duration;
use url::Url;

#[cfg(debug_assertions)]
pub const LOGGING_ENABLED: bool = true; // В режиме отладки логирование включено

#[cfg(not(debug_assertions))]
pub const LOGGING_ENABLED: bool = false; // В продакшене логирование отключено

// Дополнительные настройки для режима разработки
#[cfg(debug_assertions)]
pub mod dev {
    // Для полного отключения логирования в режиме разработки
    // измените эту константу на false
    pub const ENABLE_LOGGING: bool = true;
}

#[cfg(not(debug_assertions))]
pub mod dev {
    pub const ENABLE_LOGGING: bool = false;
}

/// Адрес бэкенда по умолчанию
pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub const DEFAULT_BACKEND_PORT: u16 = 5001;

/// Интервал опроса AI-статуса
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Сколько ждём отправки stop-запросов при выходе
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(2000);

pub const ENV_BACKEND_HOST: &str = "CAMVIEW_BACKEND_HOST";
pub const ENV_BACKEND_PORT: &str = "CAMVIEW_BACKEND_PORT";
pub const ENV_POLL_INTERVAL_MS: &str = "CAMVIEW_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CAMVIEW_REQUEST_TIMEOUT_MS";
pub const ENV_SHUTDOWN_GRACE_MS: &str = "CAMVIEW_SHUTDOWN_GRACE_MS";
pub const ENV_LOG: &str = "CAMVIEW_LOG";

/// Настройки времени выполнения
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_host: String,
    pub backend_port: u16,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_host: DEFAULT_BACKEND_HOST.to_string(),
            backend_port: DEFAULT_BACKEND_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl AppConfig {
    /// читаем переменные окружения процесса
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// то же самое, но с произвольным источником значений (для тестов)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup(ENV_BACKEND_HOST) {
            let host = host.trim();
            if host.is_empty() {
                crate::logger::log(&format!("{ENV_BACKEND_HOST} is empty, using default"));
            } else {
                cfg.backend_host = host.to_string();
            }
        }
        if let Some(port) = parse_var::<u16>(&lookup, ENV_BACKEND_PORT) {
            cfg.backend_port = port;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_POLL_INTERVAL_MS).filter(|ms| *ms > 0) {
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_REQUEST_TIMEOUT_MS).filter(|ms| *ms > 0) {
            cfg.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_SHUTDOWN_GRACE_MS) {
            cfg.shutdown_grace = Duration::from_millis(ms);
        }
        cfg
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(&self.backend_host, self.backend_port)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            crate::logger::log(&format!("Ignoring invalid {key}={raw:?}, using default"));
            None
        }
    }
}

/// Фиксированное расположение бэкенда и построение URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let base = Url::parse(&format!("http://{host}:{port}/"))
            .map_err(|e| Error::Config(format!("invalid backend address {host}:{port}: {e}")))?;
        Ok(Self { base })
    }

    /// для тестов с wiremock, который отдаёт готовый uri
    pub fn from_base(base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::Config(format!("invalid backend url {base}: {e}")))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn cameras_url(&self) -> Url {
        self.join(&["cameras"])
    }

    pub fn stream_url(&self, id: &CameraId) -> Url {
        self.join(&["stream", id.as_str()])
    }

    pub fn status_url(&self, id: &CameraId) -> Url {
        self.join(&["ai_status", id.as_str()])
    }

    pub fn stop_url(&self, id: &CameraId) -> Url {
        self.join(&["stop_stream", id.as_str()])
    }

    // id кодируется как один сегмент пути
    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.backend_port, 5001);
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn env_overrides_and_bad_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (ENV_BACKEND_HOST, "10.0.0.7"),
            (ENV_BACKEND_PORT, "not-a-port"),
            (ENV_POLL_INTERVAL_MS, "500"),
            (ENV_REQUEST_TIMEOUT_MS, "0"),
        ]));
        assert_eq!(cfg.backend_host, "10.0.0.7");
        assert_eq!(cfg.backend_port, DEFAULT_BACKEND_PORT);
        assert_eq!(cfg.poll_interval, Duration::from_millis(500));
        assert_eq!(cfg.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn urls_are_built_from_id() {
        let ep = AppConfig::default().endpoints().unwrap();
        let id = CameraId::from("cam1");
        assert_eq!(ep.stream_url(&id).as_str(), "http://127.0.0.1:5001/stream/cam1");
        assert_eq!(ep.status_url(&id).as_str(), "http://127.0.0.1:5001/ai_status/cam1");
        assert_eq!(ep.stop_url(&id).as_str(), "http://127.0.0.1:5001/stop_stream/cam1");
        assert_eq!(ep.cameras_url().as_str(), "http://127.0.0.1:5001/cameras");
    }

    #[test]
    fn id_stays_a_single_segment() {
        let ep = Endpoints::from_base("http://localhost:9000").unwrap();
        let id = CameraId::from("hall/east 2");
        assert_eq!(
            ep.stream_url(&id).as_str(),
            "http://localhost:9000/stream/hall%2Feast%202"
        );
    }
}
