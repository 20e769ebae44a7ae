use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::DdosintError;

/// A JSON value kept exactly as the service sent it
///
/// The monitor is not consistent about column types: the same field can
/// arrive as `1`, `1.0` or `"1"`, and occasionally as a list, so values keep
/// their wire form. Numbers keep their `serde_json::Number` so `1.0` stays `1.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects, passed through untouched
    Other(Value),
}

impl Scalar {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Number(n) => n.as_u64(),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Items of a list value rendered as text; empty for null or scalars
    pub fn items(&self) -> Vec<String> {
        match self {
            Scalar::Other(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Scalar::Null => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

/// Deserialize a field that was present on the wire, `null` included.
///
/// Paired with `#[serde(default)]`, an absent key stays `None` and an
/// explicit `null` becomes `Some(..)`, so serializing gives back the same keys.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One detected target record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Target {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub host: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub ip: Option<Scalar>,
    #[serde(rename = "type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_type: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub method: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub port: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub use_ssl: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub path: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<Scalar>,
    /// Columns this tool does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Target {
    /// Column order used for tabular output
    pub const COLUMNS: [&'static str; 11] = [
        "target_id",
        "request_id",
        "host",
        "ip",
        "type",
        "method",
        "port",
        "use_ssl",
        "path",
        "detected_at",
        "imported_at",
    ];

    /// Field values in `COLUMNS` order; `None` where the key was absent
    pub fn values(&self) -> [Option<&Scalar>; 11] {
        [
            self.target_id.as_ref(),
            self.request_id.as_ref(),
            self.host.as_ref(),
            self.ip.as_ref(),
            self.target_type.as_ref(),
            self.method.as_ref(),
            self.port.as_ref(),
            self.use_ssl.as_ref(),
            self.path.as_ref(),
            self.detected_at.as_ref(),
            self.imported_at.as_ref(),
        ]
    }
}

/// Aggregate counters that accompany a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Stats {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_targets: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_requests: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unique_hosts: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unique_ips: Option<Scalar>,
    /// Usually a list of strings; `null` when the aggregate is empty
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub types: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub methods: Option<Scalar>,
    /// Endpoint-specific counters such as `active_days` or `first_seen`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stats {
    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key).filter(|v| !v.is_null())
    }

    pub fn type_names(&self) -> Vec<String> {
        self.types.as_ref().map(Scalar::items).unwrap_or_default()
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.as_ref().map(Scalar::items).unwrap_or_default()
    }
}

/// Envelope returned by the target endpoints
///
/// Every key keeps its presence: absent stays absent and `null` stays `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryResult {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stats: Option<Option<Stats>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub targets: Option<Option<Vec<Target>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub count: Option<Scalar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

static NO_STATS: Lazy<Stats> = Lazy::new(Stats::default);

impl QueryResult {
    /// Wrap a bare list of targets, as returned by the recent-targets endpoint
    pub fn from_targets(targets: Vec<Target>) -> Self {
        Self {
            count: Some(Scalar::Number((targets.len() as u64).into())),
            targets: Some(Some(targets)),
            ..Default::default()
        }
    }

    /// Targets received; empty when the key was absent or `null`
    pub fn targets(&self) -> &[Target] {
        self.targets.as_ref().and_then(Option::as_ref).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stats received; all fields absent when the key was absent or `null`
    pub fn stats(&self) -> &Stats {
        self.stats.as_ref().and_then(Option::as_ref).unwrap_or(&*NO_STATS)
    }

    /// The envelope date as text, when the service sent one
    pub fn date_text(&self) -> Option<String> {
        self.date.as_ref().filter(|d| !d.is_null()).map(Scalar::to_string)
    }

    /// Reported count, falling back to the number of targets received
    pub fn count(&self) -> u64 {
        self.count
            .as_ref()
            .and_then(Scalar::as_u64)
            .unwrap_or(self.targets().len() as u64)
    }
}

/// Overview numbers from the statistics endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OverviewStats {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_targets: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_requests: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_hosts: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_ips: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_imports: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_detected: Option<Scalar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the statistics endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatsReport {
    Table(Vec<Map<String, Value>>),
    Overview(OverviewStats),
}

/// One row of the available-dates listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DateEntry {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub target_count: Option<Scalar>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub request_count: Option<Scalar>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Statistics views offered by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Overview,
    ByYear,
    ByMonth,
    ByDay,
    TimeseriesMonthly,
    TimeseriesDaily,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Overview,
        StatKind::ByYear,
        StatKind::ByMonth,
        StatKind::ByDay,
        StatKind::TimeseriesMonthly,
        StatKind::TimeseriesDaily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Overview => "overview",
            StatKind::ByYear => "by_year",
            StatKind::ByMonth => "by_month",
            StatKind::ByDay => "by_day",
            StatKind::TimeseriesMonthly => "timeseries_monthly",
            StatKind::TimeseriesDaily => "timeseries_daily",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = DdosintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = StatKind::ALL.iter().map(StatKind::as_str).collect();
                DdosintError::InvalidInput(format!(
                    "Unknown statistics type '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_envelope() -> Value {
        json!({
            "date": "2024-01-15",
            "stats": {
                "total_targets": 1,
                "total_requests": "3",
                "unique_hosts": 1,
                "unique_ips": 1,
                "types": ["http"],
                "methods": ["GET"],
                "active_days": 4
            },
            "targets": [{
                "target_id": 42,
                "request_id": "abc-1",
                "host": "example.com",
                "ip": "192.0.2.10",
                "type": "http",
                "method": "GET",
                "port": 443,
                "use_ssl": 1,
                "path": null,
                "detected_at": "2024-01-15 10:00:00",
                "imported_at": "2024-01-15 10:05:00"
            }],
            "count": 1,
            "timeline": [{"date": "2024-01-15", "count": 1}]
        })
    }

    #[test]
    fn test_envelope_round_trip_preserves_unknown_keys() {
        let input = sample_envelope();
        let parsed: QueryResult = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(parsed.count(), 1);
        assert_eq!(parsed.targets()[0].target_type, Some(Scalar::from("http")));
        assert_eq!(parsed.stats().extra_field("active_days"), Some(&json!(4)));
        assert_eq!(parsed.targets()[0].path, Some(Scalar::Null));

        assert_eq!(serde_json::to_value(&parsed).unwrap(), input);
    }

    #[test]
    fn test_partial_records_round_trip_unchanged() {
        let input = json!({
            "stats": {"types": null, "methods": null},
            "targets": [
                {"host": "a.example", "country": "IT"},
                {"host": "b.example", "path": ["/a", "/b"], "port": 1.0, "ip": null}
            ],
            "count": null
        });
        let parsed: QueryResult = serde_json::from_value(input.clone()).unwrap();

        let first = &parsed.targets()[0];
        assert_eq!(first.ip, None);
        assert_eq!(first.extra.get("country"), Some(&json!("IT")));
        assert_eq!(parsed.targets()[1].ip, Some(Scalar::Null));
        assert!(parsed.stats().type_names().is_empty());
        assert_eq!(parsed.count(), 2);
        assert_eq!(parsed.date_text(), None);

        assert_eq!(serde_json::to_value(&parsed).unwrap(), input);
    }

    #[test]
    fn test_null_and_absent_sections_round_trip() {
        for input in [
            json!({"stats": null, "targets": null}),
            json!({"date": null}),
            json!({}),
        ] {
            let parsed: QueryResult = serde_json::from_value(input.clone()).unwrap();
            assert!(parsed.targets().is_empty());
            assert_eq!(parsed.count(), 0);
            assert_eq!(serde_json::to_value(&parsed).unwrap(), input);
        }
    }

    #[test]
    fn test_scalar_display_passes_values_through() {
        assert_eq!(Scalar::from(443).to_string(), "443");
        assert_eq!(Scalar::from("1").to_string(), "1");
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::from("12").as_u64(), Some(12));

        let float: Scalar = serde_json::from_value(json!(1.0)).unwrap();
        assert_eq!(float.to_string(), "1.0");
        let list: Scalar = serde_json::from_value(json!(["/a", "/b"])).unwrap();
        assert_eq!(list.to_string(), r#"["/a","/b"]"#);
        assert_eq!(list.items(), vec!["/a", "/b"]);
    }

    #[test]
    fn test_stats_report_variants() {
        let overview: StatsReport = serde_json::from_value(json!({
            "total_targets": 10, "total_hosts": 4, "last_detected": "2024-01-15"
        })).unwrap();
        assert!(matches!(overview, StatsReport::Overview(_)));

        let table: StatsReport = serde_json::from_value(json!([
            {"year": 2024, "targets": 10}
        ])).unwrap();
        assert!(matches!(table, StatsReport::Table(ref rows) if rows.len() == 1));
    }

    #[test]
    fn test_stat_kind_parsing() {
        for kind in StatKind::ALL {
            assert_eq!(kind.as_str().parse::<StatKind>().unwrap(), kind);
        }
        assert!(matches!(
            "weekly".parse::<StatKind>(),
            Err(DdosintError::InvalidInput(_))
        ));
    }
}
