#![allow(dead_code)]

use async_trait::async_trait;
use camview_lib::backend::{
    Backend, Building, Camera, CameraHierarchy, Campus, Floor, PresenceStatus, StatusFetcher,
    StopReceipt,
};
use camview_lib::config::Endpoints;
use camview_lib::error::{Error, Result};
use camview_lib::session::CameraId;
use camview_lib::view::{CameraListView, ViewSnapshot, ViewSurface};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn endpoints() -> Endpoints {
    Endpoints::new("127.0.0.1", 5001).unwrap()
}

pub fn status_url(id: &str) -> String {
    endpoints().status_url(&CameraId::from(id)).to_string()
}

/// cam1, cam2 — классы; cam3 — коридор
pub fn sample_hierarchy() -> CameraHierarchy {
    let cam = |id: &str, name: &str, is_classroom: bool| Camera {
        id: CameraId::from(id),
        name: name.to_string(),
        is_classroom,
    };
    CameraHierarchy {
        campuses: vec![Campus {
            name: "North".into(),
            buildings: vec![Building {
                name: "Main".into(),
                floors: vec![Floor {
                    name: "1".into(),
                    cameras: vec![
                        cam("cam1", "Room 101", true),
                        cam("cam2", "Room 102", true),
                        cam("cam3", "Hallway", false),
                    ],
                }],
            }],
        }],
    }
}

/// Бэкенд, который запоминает stop-запросы
pub struct FakeBackend {
    cameras: Mutex<Result<CameraHierarchy>>,
    stops: Mutex<Vec<CameraId>>,
    fail_stops: bool,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Self::with_cameras(Ok(sample_hierarchy()))
    }

    pub fn with_cameras(cameras: Result<CameraHierarchy>) -> Arc<Self> {
        Arc::new(Self {
            cameras: Mutex::new(cameras),
            stops: Mutex::new(Vec::new()),
            fail_stops: false,
        })
    }

    pub fn unreachable_for_stops() -> Arc<Self> {
        Arc::new(Self {
            cameras: Mutex::new(Ok(sample_hierarchy())),
            stops: Mutex::new(Vec::new()),
            fail_stops: true,
        })
    }

    pub fn stops(&self) -> Vec<CameraId> {
        self.stops.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_cameras(&self) -> Result<CameraHierarchy> {
        self.cameras.lock().unwrap().clone()
    }

    async fn stop_stream(&self, id: &CameraId) -> Result<StopReceipt> {
        self.stops.lock().unwrap().push(id.clone());
        if self.fail_stops {
            return Err(Error::BackendUnreachable("connection refused".into()));
        }
        Ok(StopReceipt {
            status: 200,
            body: format!("{{\"message\": \"Stream stopped for {id}\"}}"),
        })
    }
}

/// Опрос статуса с заранее заданными ответами по URL
#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<HashMap<String, Result<PresenceStatus>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, result: Result<PresenceStatus>) {
        self.responses.lock().unwrap().insert(url.to_string(), result);
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl StatusFetcher for FakeFetcher {
    async fn fetch_status(&self, status_url: &str) -> Result<PresenceStatus> {
        self.calls.lock().unwrap().push(status_url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(status_url)
            .cloned()
            .unwrap_or(Ok(PresenceStatus::Processing))
    }
}

/// Запоминает всё, что было бы отрисовано
#[derive(Clone, Default)]
pub struct RecordingSurface {
    views: Arc<Mutex<Vec<ViewSnapshot>>>,
    lists: Arc<Mutex<Vec<CameraListView>>>,
}

impl RecordingSurface {
    pub fn views(&self) -> Vec<ViewSnapshot> {
        self.views.lock().unwrap().clone()
    }

    pub fn last_view(&self) -> Option<ViewSnapshot> {
        self.views.lock().unwrap().last().cloned()
    }

    pub fn last_list(&self) -> Option<CameraListView> {
        self.lists.lock().unwrap().last().cloned()
    }
}

impl ViewSurface for RecordingSurface {
    fn show_camera_list(&self, list: &CameraListView) {
        self.lists.lock().unwrap().push(list.clone());
    }

    fn show_view(&self, snapshot: &ViewSnapshot) {
        self.views.lock().unwrap().push(snapshot.clone());
    }
}
