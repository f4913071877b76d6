//! Doctor profile and the profile update request.
//!
//! The profile update response is the only source that refreshes the dashboard's
//! average rating.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Doctor profile as returned by `PUT /doctors/profile`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name
    pub name: String,
    /// Medical specialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Free-text biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Fee per consultation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    /// Mean patient rating, present when the server recomputed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

/// Body of `PUT /doctors/profile`. Only set fields are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New specialization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// New biography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New consultation fee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    /// New password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Confirmation of the new password, checked locally and never sent
    #[serde(skip)]
    pub confirm_password: Option<String>,
}

impl ProfileUpdate {
    /// Client-side preconditions checked before the request is issued.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the name is blank, the fee is negative or
    /// not finite, or the password confirmation does not match.
    pub fn validate(&self) -> Result<()> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(Error::validation("Name cannot be empty"));
        }

        if let Some(fee) = self.consultation_fee {
            if !fee.is_finite() || fee < 0.0 {
                return Err(Error::validation(format!(
                    "Consultation fee must be a non-negative amount, got {fee}"
                )));
            }
        }

        match (&self.password, &self.confirm_password) {
            (None, None) => Ok(()),
            (Some(password), Some(confirm)) if password == confirm => {
                if password.is_empty() {
                    Err(Error::validation("Password cannot be empty"))
                } else {
                    Ok(())
                }
            }
            _ => Err(Error::validation("Passwords do not match")),
        }
    }
}
