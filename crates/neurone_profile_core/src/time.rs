//! crates/neurone_profile_core/src/time.rs
//!
//! Client and server timestamps attached to every submitted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An instant as reported by the browser: either epoch milliseconds or an
/// RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientInstant {
    Millis(i64),
    /// `performance.now()`-style values carry sub-millisecond fractions.
    FractionalMillis(f64),
    Date(DateTime<Utc>),
}

impl ClientInstant {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            ClientInstant::Date(date) => Some(date),
            other => DateTime::from_timestamp_millis(other.to_millis()),
        }
    }

    /// Whole milliseconds; fractions are truncated.
    pub fn to_millis(self) -> i64 {
        match self {
            ClientInstant::Millis(ms) => ms,
            ClientInstant::FractionalMillis(ms) => ms.trunc() as i64,
            ClientInstant::Date(date) => date.timestamp_millis(),
        }
    }
}

/// Client-reported and server-stamped times for one record.
///
/// The server half is always produced from the server clock; nothing the
/// client sends can set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_client: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_client: Option<DateTime<Utc>>,
    pub timestamp_server: i64,
    pub date_server: DateTime<Utc>,
}

impl Timing {
    /// Stamps a record received now.
    pub fn received(client: Option<ClientInstant>) -> Self {
        Self::received_at(client, Utc::now())
    }

    pub fn received_at(client: Option<ClientInstant>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp_client: client.map(ClientInstant::to_millis),
            date_client: client.and_then(ClientInstant::to_datetime),
            timestamp_server: now.timestamp_millis(),
            date_server: now,
        }
    }
}
