use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "reelscrape.v1";

#[derive(Debug, Clone, Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub schema_version: &'static str,
    pub time: DateTime<Utc>,
    pub request_id: Uuid,
    pub op: &'static str,
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Envelope {
    pub fn result<T: Serialize>(op: &'static str, result: &T, meta: Option<Meta>) -> Result<Self, serde_json::Error> {
        let res_val = serde_json::to_value(result)?;
        Ok(Envelope {
            schema_version: SCHEMA_VERSION,
            time: Utc::now(),
            request_id: Uuid::new_v4(),
            op,
            result: Some(res_val),
            meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_result_envelope() {
        let result = json!([{"title": "X"}]);
        let env = Envelope::result("search", &result, None).expect("to serialize result");
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"schema_version\":\"reelscrape.v1\""));
        assert!(s.contains("\"op\":\"search\""));
        assert!(s.contains("\"result\":[{\"title\":\"X\"}]"));
        assert!(!s.contains("\"meta\""));
    }

    #[test]
    fn absent_result_serializes_as_null() {
        let env = Envelope::result("stream", &Option::<u8>::None, Some(Meta { site: Some("willow".into()), duration_ms: None })).unwrap();
        let s = serde_json::to_string(&env).unwrap();
        assert!(s.contains("\"result\":null"));
        assert!(s.contains("\"site\":\"willow\""));
    }
}
