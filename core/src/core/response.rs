//! Response shape of the SiteCheck v3 API.
//!
//! Every field is optional on the wire. Objects whose key order matters for
//! display (`ratings`, `software`, the recommendation groups) are kept as
//! ordered `serde_json::Map`s and decoded lazily.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteCheckResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub site: SiteInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub ratings: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub software: Map<String, Value>,
    #[serde(deserialize_with = "optional_skip_null_items")]
    pub blacklists: Option<Vec<BlacklistEntry>>,
    pub recommendations: Option<Recommendations>,
    pub warnings: Option<Warnings>,
    #[serde(deserialize_with = "null_as_default")]
    pub scan: ScanStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub input: Option<String>,
    #[serde(deserialize_with = "optional_skip_null_items")]
    pub redirects_to: Option<Vec<String>>,
    #[serde(deserialize_with = "skip_null_items")]
    pub running_on: Vec<String>,
    #[serde(deserialize_with = "skip_null_items")]
    pub ip: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    pub passed: Value,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlacklistEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub vendor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub info_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub tls_major: Option<Map<String, Value>>,
    pub security_major: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Warnings {
    #[serde(deserialize_with = "optional_skip_null_items")]
    pub outdated: Option<Vec<OutdatedSoftware>>,
    #[serde(deserialize_with = "optional_skip_null_items")]
    pub site_issues: Option<Vec<SiteIssue>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutdatedSoftware {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub safe_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteIssue {
    #[serde(deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanStatus {
    pub error: Option<String>,
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a list, dropping `null` entries. A `null` list is empty.
fn skip_null_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(optional_skip_null_items(deserializer)?.unwrap_or_default())
}

/// Like `skip_null_items`, but keeps a `null` list distinct from an empty one.
fn optional_skip_null_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items.map(|items| items.into_iter().flatten().collect()))
}

impl SiteCheckResponse {
    /// Overall letter grade, if the API reported one.
    pub fn total_rating(&self) -> Option<&str> {
        self.ratings
            .get("total")
            .and_then(|t| t.get("rating"))
            .and_then(Value::as_str)
    }

    /// Per-category ratings in API order, excluding `total`.
    /// Entries that do not decode as a rating object are skipped.
    pub fn category_ratings(&self) -> Vec<(&str, Rating)> {
        self.ratings
            .iter()
            .filter(|(key, _)| key.as_str() != "total")
            .filter_map(|(key, value)| {
                serde_json::from_value::<Rating>(value.clone())
                    .ok()
                    .map(|r| (key.as_str(), r))
            })
            .collect()
    }

    /// Software entries for one category. Malformed entries are dropped.
    pub fn software_in(&self, category: &str) -> Vec<SoftwareEntry> {
        self.software
            .get(category)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Scan-level error message reported by the API, ignoring empty strings.
    pub fn scan_error(&self) -> Option<&str> {
        self.scan.error.as_deref().filter(|e| !e.is_empty())
    }
}
