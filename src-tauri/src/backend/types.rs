use crate::session::CameraId;
use serde::{Deserialize, Serialize};

/// Иерархия камер: кампус → здание → этаж → камера
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CameraHierarchy {
    pub campuses: Vec<Campus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Campus {
    pub name: String,
    #[serde(default)]
    pub buildings: Vec<Building>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub name: String,
    #[serde(default)]
    pub floors: Vec<Floor>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub name: String,
    #[serde(default)]
    pub cameras: Vec<Camera>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    #[serde(default)]
    pub is_classroom: bool,
}

impl CameraHierarchy {
    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.campuses
            .iter()
            .flat_map(|c| c.buildings.iter())
            .flat_map(|b| b.floors.iter())
            .flat_map(|f| f.cameras.iter())
    }

    pub fn find(&self, id: &CameraId) -> Option<&Camera> {
        self.cameras().find(|c| &c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.campuses.is_empty()
    }
}

/// Тело ответа /ai_status/{id} как есть
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    #[serde(default)]
    pub person_visible: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub const PROCESSING_STATUS: &str = "Processing or N/A";

/// Классифицированный AI-статус присутствия
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum PresenceStatus {
    PersonVisible,
    PersonNotVisible,
    Processing,
    Unknown,
    BackendError(String),
}

impl From<StatusReport> for PresenceStatus {
    fn from(report: StatusReport) -> Self {
        // error приоритетнее: бэкенд шлёт {person_visible: null, error: ...}
        if let Some(err) = report.error {
            return PresenceStatus::BackendError(err);
        }
        match report.person_visible {
            Some(true) => PresenceStatus::PersonVisible,
            Some(false) => PresenceStatus::PersonNotVisible,
            None if report.status.as_deref() == Some(PROCESSING_STATUS) => {
                PresenceStatus::Processing
            }
            None => PresenceStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "campuses": [{
            "name": "North",
            "buildings": [{
                "name": "Main",
                "floors": [{
                    "name": "1",
                    "cameras": [
                        {"id": "cam1", "name": "Room 101", "is_classroom": true},
                        {"id": "cam3", "name": "Hallway", "is_classroom": false}
                    ]
                }]
            }]
        }]
    }"#;

    #[test]
    fn parses_hierarchy_and_finds_cameras() {
        let h: CameraHierarchy = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(h.cameras().count(), 2);
        assert!(h.find(&"cam1".into()).unwrap().is_classroom);
        assert!(!h.find(&"cam3".into()).unwrap().is_classroom);
        assert!(h.find(&"nope".into()).is_none());
    }

    #[test]
    fn missing_campuses_is_a_schema_error() {
        assert!(serde_json::from_str::<CameraHierarchy>(r#"{"error":"x"}"#).is_err());
    }

    #[test]
    fn missing_nested_lists_default_to_empty() {
        let h: CameraHierarchy =
            serde_json::from_str(r#"{"campuses":[{"name":"A"}]}"#).unwrap();
        assert_eq!(h.cameras().count(), 0);
        assert!(!h.is_empty());
    }

    fn classify(body: &str) -> PresenceStatus {
        serde_json::from_str::<StatusReport>(body).unwrap().into()
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify(r#"{"person_visible": true}"#), PresenceStatus::PersonVisible);
        assert_eq!(classify(r#"{"person_visible": false}"#), PresenceStatus::PersonNotVisible);
        assert_eq!(
            classify(r#"{"person_visible": null, "status": "Processing or N/A"}"#),
            PresenceStatus::Processing
        );
        assert_eq!(classify(r#"{}"#), PresenceStatus::Unknown);
        assert_eq!(
            classify(r#"{"person_visible": null, "error": "AI model not loaded"}"#),
            PresenceStatus::BackendError("AI model not loaded".into())
        );
    }
}
