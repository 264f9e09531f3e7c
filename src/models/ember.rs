//! Wire types for the Ember cloud API.
//!
//! Scope: types only — no API client code.
//!
//! Notes
//! - JSON keys on this API are lowercase-and-glued-together (`zoneid`,
//!   `currenttemperature`); Rust field names map to them via `rename`.
//! - Every response wraps its payload under a `data` key; see [`DataEnvelope`].

use serde::{Deserialize, Serialize};

// =====================
// Scalar ID newtype wrappers
// =====================

/// Identifier of a physical heating hub ("home") as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayId(pub String);

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub i64);

// =====================
// Response envelope
// =====================

/// The service wraps every JSON response payload under a `data` key.
/// Sibling keys (`status`, `message`) are ignored.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Login payload. The refresh token is returned by the service but no refresh
/// grant is known; it is retained and never sent back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub refresh_token: String,
    pub token: String,
}

// =====================
// Resources
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    #[serde(rename = "gatewayid")]
    pub gateway_id: GatewayId,
    #[serde(default)]
    pub name: String,
    // Observed on the wire both as a JSON string and as a number.
    #[serde(rename = "zoneCount", deserialize_with = "string_or_number", default)]
    pub zone_count: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    pub name: String,
    #[serde(rename = "zoneid")]
    pub zone_id: ZoneId,
    #[serde(rename = "currenttemperature")]
    pub current_temperature: f64,
    #[serde(rename = "targettemperature")]
    pub target_temperature: f64,
    #[serde(rename = "ishotwater")]
    pub is_hot_water: bool,
    #[serde(rename = "isboostactive")]
    pub is_boost_active: bool,
    #[serde(rename = "isadvanceactive")]
    pub is_advance_active: bool,
    // 1 observed when the zone is off, 2 when on; not documented anywhere.
    pub status: i64,
    /// Free-text operational-state hint, e.g. "The heating is off until 06:30".
    /// No documented grammar; see [`Zone::is_on`].
    pub prefix: String,
}

impl Zone {
    /// Best-effort inference of whether the zone is currently heating.
    ///
    /// The API has no explicit activity flag, so this matches known phrases in
    /// the undocumented `prefix` text and falls back to the boost/advance
    /// flags. The substrings and their precedence follow the behaviour of
    /// existing Ember clients and must not be reordered; values of `prefix`
    /// never seen in practice may well be misclassified.
    pub fn is_on(&self) -> bool {
        if self.prefix.contains(" off ") {
            return false;
        }
        if self.prefix.contains("active ") {
            return true;
        }
        if self.prefix.contains("ON mode") {
            return true;
        }
        self.is_boost_active || self.is_advance_active
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct V;
    impl<'de> serde::de::Visitor<'de> for V {
        type Value = String;

        fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
            write!(f, "a string or an integer for zoneCount")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(V)
}
