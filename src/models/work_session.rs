use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One shift from clock-in to (optional) clock-out. A row with no `end_time`
/// is the open shift for its code; once closed the row is terminal.
#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: Uuid,
    pub code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_ms: Option<i64>,
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Deserialize, Debug)]
pub struct SessionCodeRequest {
    // Option so a missing field maps to the 400 "code required" error instead
    // of a generic deserialization failure.
    pub code: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SessionEnvelope {
    pub session: WorkSession,
}

#[derive(Serialize, Debug)]
pub struct ActiveSessionEnvelope {
    pub active: Option<WorkSession>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> WorkSession {
        WorkSession {
            id: Uuid::nil(),
            code: "EMP001".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            end_time: None,
            total_ms: None,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("id"));
        assert!(object.contains_key("code"));
        assert!(object.contains_key("startTime"));
        assert!(object.contains_key("endTime"));
        assert!(object.contains_key("totalMs"));
        assert!(object["endTime"].is_null());
        assert!(object["totalMs"].is_null());
    }

    #[test]
    fn start_time_serializes_as_iso_timestamp() {
        let value = serde_json::to_value(sample()).unwrap();
        let start_time = value["startTime"].as_str().unwrap();
        assert!(start_time.starts_with("2025-06-01T08:00:00"));
    }

    #[test]
    fn open_envelope_wraps_session_under_active_key() {
        let value = serde_json::to_value(ActiveSessionEnvelope { active: None }).unwrap();
        assert!(value["active"].is_null());

        let value = serde_json::to_value(ActiveSessionEnvelope {
            active: Some(sample()),
        })
        .unwrap();
        assert_eq!(value["active"]["code"], "EMP001");
    }

    #[test]
    fn is_open_tracks_end_time() {
        let mut session = sample();
        assert!(session.is_open());

        session.end_time = Some(session.start_time + chrono::Duration::hours(8));
        assert!(!session.is_open());
    }

    #[test]
    fn request_accepts_missing_code_field() {
        let request: SessionCodeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.code.is_none());

        let request: SessionCodeRequest = serde_json::from_str(r#"{"code":"EMP001"}"#).unwrap();
        assert_eq!(request.code.as_deref(), Some("EMP001"));
    }
}
