use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Wire format of every timestamp the service accepts or returns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter for `yyyy-MM-dd HH:mm:ss` timestamps.
///
/// Usable from JSON bodies and from query strings alike.
pub mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|e| {
            serde::de::Error::custom(format!(
                "invalid timestamp '{}', expected yyyy-MM-dd HH:mm:ss ({})",
                raw, e
            ))
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// One recorded access to a URI. Hits are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Hit {
    /// Sequence number assigned when the hit was stored
    pub id: i64,
    /// Application that reported the hit
    #[schema(example = "ewm-main-service")]
    pub app: String,
    #[schema(example = "/events/1")]
    pub uri: String,
    /// Client address, only used for unique counts
    #[schema(example = "192.163.0.1")]
    pub ip: String,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2024-01-01 10:00:00")]
    pub timestamp: NaiveDateTime,
}

/// DTO for recording a hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewHit {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "ewm-main-service")]
    pub app: String,
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "/events/1")]
    pub uri: String,
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "192.163.0.1")]
    pub ip: String,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, example = "2024-01-01 10:00:00")]
    pub timestamp: NaiveDateTime,
}

impl NewHit {
    pub fn new(
        app: impl Into<String>,
        uri: impl Into<String>,
        ip: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            app: app.into(),
            uri: uri.into(),
            ip: ip.into(),
            timestamp,
        }
    }
}

/// Aggregation request: which hits to count and how.
///
/// Both bounds are inclusive. An empty `uris` list means every URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Range start, `yyyy-MM-dd HH:mm:ss`
    #[serde(with = "timestamp")]
    #[param(value_type = String, example = "2024-01-01 00:00:00")]
    pub start: NaiveDateTime,
    /// Range end, `yyyy-MM-dd HH:mm:ss`
    #[serde(with = "timestamp")]
    #[param(value_type = String, example = "2024-01-02 00:00:00")]
    pub end: NaiveDateTime,
    /// URIs to restrict to; repeat the parameter for several
    #[serde(default)]
    pub uris: Vec<String>,
    /// Count distinct IPs instead of hits
    #[serde(default)]
    pub unique: bool,
}

impl StatsQuery {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            uris: Vec::new(),
            unique: false,
        }
    }

    pub fn with_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uris = uris.into_iter().map(Into::into).collect();
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Whether `hit` falls inside the range and the URI filter
    pub fn matches(&self, hit: &Hit) -> bool {
        hit.timestamp >= self.start
            && hit.timestamp <= self.end
            && (self.uris.is_empty() || self.uris.iter().any(|u| *u == hit.uri))
    }
}

/// Hit count of one `(app, uri)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViewStats {
    #[schema(example = "ewm-main-service")]
    pub app: String,
    #[schema(example = "/events/1")]
    pub uri: String,
    /// Total hits, or distinct IPs for unique queries
    #[schema(example = 6)]
    pub hits: u64,
}

impl ViewStats {
    pub fn new(app: impl Into<String>, uri: impl Into<String>, hits: u64) -> Self {
        Self {
            app: app.into(),
            uri: uri.into(),
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_new_hit_parses_wire_timestamp() {
        let hit: NewHit = serde_json::from_value(json!({
            "app": "ewm-main-service",
            "uri": "/events/1",
            "ip": "192.163.0.1",
            "timestamp": "2024-01-01 10:30:00"
        }))
        .unwrap();

        assert_eq!(hit.timestamp, at(10, 30));
        assert!(hit.validate().is_ok());
    }

    #[test]
    fn test_new_hit_rejects_iso_timestamp() {
        let result = serde_json::from_value::<NewHit>(json!({
            "app": "a",
            "uri": "/",
            "ip": "1.1.1.1",
            "timestamp": "2024-01-01T10:30:00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_hit_blank_fields_fail_validation() {
        let hit = NewHit::new("app", "   ", "", at(10, 0));
        let errors = hit.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("uri"));
        assert!(fields.contains_key("ip"));
        assert!(!fields.contains_key("app"));
    }

    #[test]
    fn test_hit_serializes_wire_timestamp() {
        let hit = Hit {
            id: 1,
            app: "a".into(),
            uri: "/events/1".into(),
            ip: "1.1.1.1".into(),
            timestamp: at(9, 5),
        };
        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["timestamp"], "2024-01-01 09:05:00");
    }

    #[test]
    fn test_query_matches_inclusive_bounds() {
        let query = StatsQuery::new(at(9, 0), at(11, 0));
        let mut hit = Hit {
            id: 1,
            app: "a".into(),
            uri: "/events/1".into(),
            ip: "1.1.1.1".into(),
            timestamp: at(9, 0),
        };
        assert!(query.matches(&hit));

        hit.timestamp = at(11, 0);
        assert!(query.matches(&hit));

        hit.timestamp = at(11, 1);
        assert!(!query.matches(&hit));
    }

    #[test]
    fn test_query_matches_uri_filter() {
        let query = StatsQuery::new(at(9, 0), at(11, 0)).with_uris(["/events/2"]);
        let hit = Hit {
            id: 1,
            app: "a".into(),
            uri: "/events/1".into(),
            ip: "1.1.1.1".into(),
            timestamp: at(10, 0),
        };
        assert!(!query.matches(&hit));
    }
}
