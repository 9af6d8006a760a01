use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_BUFFER_SIZE: usize = 100;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://gggg-8.pagedrop.io";

pub const HEALTH_PATH: &str = "/";
pub const ACTION_PATH: &str = "/api/action";
pub const UPDATES_PATH: &str = "/api/updates";
pub const REGISTER_PATH: &str = "/api/register";

pub const HEALTH_MESSAGE: &str = "✅ Colonization server is live and listening";
pub const NO_RECENT_ACTIONS: &str = "No recent actions";
pub const STATUS_OK: &str = "OK";
pub const STATUS_REGISTERED: &str = "Registered";

/// Rendered in place of a field the payload does not carry.
pub const MISSING_FIELD: &str = "undefined";

/// Key under which the server stores the enrichment timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Free-form JSON object sent by clients. No schema is imposed.
pub type ActionPayload = Map<String, Value>;

/// A client payload enriched with the server-assigned timestamp.
///
/// Serializes as one flat JSON object: every payload key plus `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(flatten)]
    pub payload: ActionPayload,
    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    /// Builds a record, discarding any `timestamp` the caller put in the payload.
    pub fn new(mut payload: ActionPayload, timestamp: DateTime<Utc>) -> Self {
        payload.remove(TIMESTAMP_KEY);
        Self { payload, timestamp }
    }

    pub fn action(&self) -> Option<&Value> {
        self.payload.get("action")
    }

    pub fn username(&self) -> Option<&Value> {
        self.payload.get("username")
    }

    /// Formats the record as `"<action> by <username>"` for pollers.
    pub fn summary(&self) -> String {
        format!(
            "{} by {}",
            field_text(self.action()),
            field_text(self.username())
        )
    }

    /// ISO-8601 form of the timestamp as it appears on the wire.
    pub fn timestamp_iso(&self) -> String {
        iso8601_millis::format(&self.timestamp)
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None => MISSING_FIELD.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK.to_string(),
        }
    }

    pub fn registered() -> Self {
        Self {
            status: STATUS_REGISTERED.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
}

impl UpdateResponse {
    /// Message for the most recent record, or the "no recent actions" sentinel.
    pub fn from_latest(latest: Option<&ActionRecord>) -> Self {
        let message = match latest {
            Some(record) => record.summary(),
            None => NO_RECENT_ACTIONS.to_string(),
        };
        Self { message }
    }

    pub fn is_empty(&self) -> bool {
        self.message == NO_RECENT_ACTIONS
    }
}

/// Millisecond-precision UTC timestamps, e.g. `2026-10-19T08:30:00.125Z`.
pub mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
