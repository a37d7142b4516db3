// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod profile;
pub mod couple;
pub mod question;
pub mod quiz;
pub mod service;

pub use profile::*;
pub use couple::*;
pub use question::*;
pub use quiz::*;

use uuid::Uuid;

use crate::error::{AdminError, Result};

/// Form fields left blank are stored as NULL
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required text field; blank is a validation failure
pub(crate) fn required(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminError::validation(
            "Missing field",
            format!("{} is required", field),
        ));
    }
    Ok(trimmed.to_string())
}

/// Optional reference picked from a select box; blank means none
pub(crate) fn optional_id(value: Option<String>, field: &str) -> Result<Option<Uuid>> {
    match blank_to_none(value) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(&raw).map(Some).map_err(|_| {
            AdminError::validation("Invalid reference", format!("{} is not a valid id", field))
        }),
    }
}
