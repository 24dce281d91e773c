//! Metric snapshot types served by the JSON snapshot endpoint.
//!
//! The wire shape is:
//!
//! ```json
//! {
//!   "updatedAt": "2026-01-01T00:00:00.000Z",
//!   "metrics": [
//!     { "name": "garden_soil_moisture_percent", "type": "gauge", "help": "...", "value": 41.2 }
//!   ]
//! }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of a registered metric instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Holds the last value set; overwritten on every update.
    Gauge,
    /// Monotonically non-decreasing accumulated value.
    Counter,
}

impl MetricKind {
    /// The lowercase name used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        }
    }
}

/// The current value of one allow-listed instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Unique metric name.
    pub name: String,
    /// Instrument kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// Help text registered with the instrument.
    pub help: String,
    /// Current value, or `None` if a gauge has never been set.
    pub value: Option<f64>,
}

/// A point-in-time view of the allow-listed instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Wall-clock time the snapshot was taken.
    #[serde(
        rename = "updatedAt",
        serialize_with = "serialize_iso_millis",
        deserialize_with = "deserialize_iso"
    )]
    pub updated_at: DateTime<Utc>,
    /// One entry per allow-listed instrument, in registration order.
    pub metrics: Vec<MetricSample>,
}

impl MetricsSnapshot {
    /// Look up a sample by metric name.
    pub fn get(&self, name: &str) -> Option<&MetricSample> {
        self.metrics.iter().find(|sample| sample.name == name)
    }

    /// The current value of a metric, if present and set.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|sample| sample.value)
    }
}

/// Serialize as ISO-8601 UTC with millisecond precision and a `Z` suffix.
fn serialize_iso_millis<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn deserialize_iso<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap(),
            metrics: vec![
                MetricSample {
                    name: String::from("garden_soil_moisture_percent"),
                    kind: MetricKind::Gauge,
                    help: String::from("Simulated soil moisture percentage"),
                    value: Some(41.5),
                },
                MetricSample {
                    name: String::from("garden_alerts_total"),
                    kind: MetricKind::Counter,
                    help: String::from("Total alert events"),
                    value: None,
                },
            ],
        }
    }

    #[test]
    fn snapshot_wire_shape() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        assert_eq!(json["updatedAt"], "2026-03-01T12:30:05.000Z");
        assert_eq!(json["metrics"][0]["type"], "gauge");
        assert_eq!(json["metrics"][0]["value"], 41.5);
        assert_eq!(json["metrics"][1]["type"], "counter");
        assert!(json["metrics"][1]["value"].is_null());
    }

    #[test]
    fn snapshot_parses_its_own_output() {
        let original = sample_snapshot();
        let text = serde_json::to_string(&original).unwrap();
        let parsed: MetricsSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn lookup_by_name() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.value_of("garden_soil_moisture_percent"), Some(41.5));
        assert_eq!(snapshot.value_of("garden_alerts_total"), None);
        assert!(snapshot.get("garden_missing").is_none());
    }

    #[test]
    fn kind_names() {
        assert_eq!(MetricKind::Gauge.as_str(), "gauge");
        assert_eq!(MetricKind::Counter.as_str(), "counter");
    }
}
