//! Public doctor directory entry, served unauthenticated by `GET /users/doctors`.

use serde::{Deserialize, Serialize};

/// A doctor as listed in the public directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Unique identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Medical specialization
    #[serde(default)]
    pub specialization: String,
    /// City of practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Fee per consultation
    #[serde(default)]
    pub consultation_fee: f64,
    /// Mean patient rating
    #[serde(default)]
    pub average_rating: f64,
}

/// Search filters for the doctor directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    /// Match on specialization
    pub specialization: Option<String>,
    /// Match on city
    pub city: Option<String>,
    /// Match on name
    pub name: Option<String>,
}

impl DoctorFilter {
    /// Non-empty query pairs.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("specialization", &self.specialization),
            ("city", &self.city),
            ("name", &self.name),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}
