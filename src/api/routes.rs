// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdminError, Result};
use crate::metrics;

/// Toast severity, mirrors what the console renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Notification attached to every mutation response and every failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    /// "Success" toast with the given description
    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description)
    }

    /// Generic destructive "Error" toast
    pub fn error(description: impl Into<String>) -> Self {
        Self::destructive("Error", description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data and no notification
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            toast: None,
        }
    }

    /// Create a success response carrying a notification
    pub fn with_toast(data: T, toast: Toast) -> Self {
        Self {
            success: true,
            data: Some(data),
            toast: Some(toast),
        }
    }

    /// Create an error response
    pub fn failure(toast: Toast) -> Self {
        Self {
            success: false,
            data: None,
            toast: Some(toast),
        }
    }
}

/// Query string accepted by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub quiz_id: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

impl ListQuery {
    pub fn term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Parse a select-box style filter where `all` or empty means no filter
pub fn parent_filter(raw: Option<&str>) -> Option<Uuid> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(value) => Uuid::parse_str(value).ok(),
    }
}

/// Query string of every delete endpoint
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl DeleteQuery {
    /// Refuse before touching the database unless the operator confirmed
    pub fn require(&self, prompt: &str) -> Result<()> {
        if self.confirm {
            Ok(())
        } else {
            Err(AdminError::ConfirmationRequired(prompt.to_string()))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

/// Count a create/update/delete outcome
pub(crate) fn mutation<T>(entity: &str, op: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => metrics::record_mutation(entity, op),
        Err(_) => metrics::record_failure(entity),
    }
    result
}

/// Count a failed read
pub(crate) fn fetched<T>(entity: &str, result: Result<T>) -> Result<T> {
    if result.is_err() {
        metrics::record_failure(entity);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_filter_treats_all_as_unfiltered() {
        assert_eq!(parent_filter(None), None);
        assert_eq!(parent_filter(Some("all")), None);
        assert_eq!(parent_filter(Some("  ")), None);

        let id = Uuid::new_v4();
        assert_eq!(parent_filter(Some(&id.to_string())), Some(id));
    }

    #[test]
    fn unconfirmed_delete_is_refused() {
        let prompt = "Are you sure you want to delete this quiz?";

        match (DeleteQuery { confirm: false }).require(prompt) {
            Err(AdminError::ConfirmationRequired(text)) => assert_eq!(text, prompt),
            other => panic!("unexpected: {:?}", other),
        }
        assert!((DeleteQuery { confirm: true }).require(prompt).is_ok());
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let body = serde_json::to_value(ApiResponse::<()>::failure(Toast::error("Failed to fetch users")))
            .unwrap();

        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
        assert_eq!(body["toast"]["title"], "Error");
        assert_eq!(body["toast"]["variant"], "destructive");
    }
}
