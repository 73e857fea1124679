use crate::error::error_field;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/predict_home_price`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub total_sqft: f64,
    pub bhk: i32,
    pub bath: i32,
    pub location: String,
}

/// What a successful `get_location_names` response body means
#[derive(Debug, Clone, PartialEq)]
pub enum LocationsReply {
    Error(String),
    Locations(Vec<String>),
    /// `locations` missing, not a list, or holding non-string entries
    Malformed(String),
}

impl LocationsReply {
    pub fn classify(body: &Value) -> Self {
        if let Some(message) = error_field(body) {
            return LocationsReply::Error(message.to_string());
        }

        let Some(entries) = body.get("locations").and_then(Value::as_array) else {
            return LocationsReply::Malformed("`locations` is missing or not a list".to_string());
        };

        let mut locations = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.as_str() {
                Some(name) => locations.push(name.to_string()),
                None => {
                    return LocationsReply::Malformed(format!("non-string location entry: {entry}"))
                }
            }
        }
        LocationsReply::Locations(locations)
    }
}

/// What a successful `predict_home_price` response body means
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionReply {
    Error(String),
    Estimate(f64),
    Malformed(String),
}

impl PredictionReply {
    pub fn classify(body: &Value) -> Self {
        if let Some(message) = error_field(body) {
            return PredictionReply::Error(message.to_string());
        }

        match body.get("estimated_price").and_then(Value::as_f64) {
            Some(price) if price.is_finite() => PredictionReply::Estimate(price),
            _ => PredictionReply::Malformed("`estimated_price` is missing or not a number".to_string()),
        }
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub artifacts_loaded: bool,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.artifacts_loaded
    }

    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() || self.timestamp < 0.0 {
            return None;
        }
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_service_field_names() {
        let request = PredictionRequest {
            total_sqft: 1000.0,
            bhk: 2,
            bath: 2,
            location: "Whitefield".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "total_sqft": 1000.0, "bhk": 2, "bath": 2, "location": "Whitefield" })
        );
    }

    #[test]
    fn locations_error_field_wins() {
        let reply = LocationsReply::classify(&json!({ "error": "x", "locations": ["A"] }));
        assert_eq!(reply, LocationsReply::Error("x".to_string()));
    }

    #[test]
    fn locations_list_is_kept_in_server_order() {
        let reply = LocationsReply::classify(&json!({ "locations": ["B", "A"], "status": "success" }));
        assert_eq!(reply, LocationsReply::Locations(vec!["B".into(), "A".into()]));
    }

    #[test]
    fn malformed_locations_are_distinct_from_errors() {
        for body in [
            json!({}),
            json!({ "locations": "A,B" }),
            json!({ "locations": ["A", 3] }),
            json!({ "error": "" }),
        ] {
            assert!(
                matches!(LocationsReply::classify(&body), LocationsReply::Malformed(_)),
                "{body} should be malformed"
            );
        }
    }

    #[test]
    fn prediction_reply_kinds() {
        assert_eq!(
            PredictionReply::classify(&json!({ "estimated_price": 83.2 })),
            PredictionReply::Estimate(83.2)
        );
        assert_eq!(
            PredictionReply::classify(&json!({ "error": "bad location" })),
            PredictionReply::Error("bad location".to_string())
        );
        assert!(matches!(
            PredictionReply::classify(&json!({ "estimated_price": "83.2" })),
            PredictionReply::Malformed(_)
        ));
    }

    #[test]
    fn health_timestamp_converts_to_utc() {
        let report: HealthReport = serde_json::from_value(json!({
            "status": "healthy",
            "artifacts_loaded": true,
            "timestamp": 1_700_000_000.5
        }))
        .unwrap();

        assert!(report.is_healthy());
        let checked_at = report.checked_at().unwrap();
        assert_eq!(checked_at.timestamp(), 1_700_000_000);
        assert_eq!(checked_at.timestamp_subsec_millis(), 500);
    }
}
