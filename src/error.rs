// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::routes::{ApiResponse, Toast, ToastVariant};
use crate::db::DbPoolError;

/// Error type for admin operations.
///
/// Every variant knows the toast an operator sees for it; the underlying
/// cause is logged, never shown.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Query failure against the backing store
    #[error("Database error: {source}")]
    Database {
        #[source]
        source: diesel::result::Error,
        /// Static operator-facing message, e.g. "Failed to fetch couples"
        message: String,
    },

    /// Could not check out a pooled connection
    #[error("Connection pool error: {0}")]
    Pool(#[from] DbPoolError),

    /// Row addressed by id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parent still referenced by dependent rows
    #[error("{title}: {message}")]
    HasDependents {
        title: String,
        message: String,
        variant: ToastVariant,
    },

    /// Destructive action attempted without explicit confirmation
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    /// Input rejected before reaching the backend
    #[error("{title}: {message}")]
    Validation { title: String, message: String },

    /// Image host rejected or failed the upload
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Missing, invalid or revoked session
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    /// Wrap a query error with the message the operator should see
    pub fn database(message: impl Into<String>) -> impl FnOnce(diesel::result::Error) -> Self {
        let message = message.into();
        move |source| AdminError::Database { source, message }
    }

    pub fn validation(title: impl Into<String>, message: impl Into<String>) -> Self {
        AdminError::Validation {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn has_dependents(title: impl Into<String>, message: impl Into<String>) -> Self {
        AdminError::HasDependents {
            title: title.into(),
            message: message.into(),
            variant: ToastVariant::Destructive,
        }
    }

    /// Show a dependents refusal as a plain notice instead of a destructive toast
    pub fn as_notice(self) -> Self {
        match self {
            AdminError::HasDependents { title, message, .. } => AdminError::HasDependents {
                title,
                message,
                variant: ToastVariant::Default,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::Database { .. } | AdminError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::HasDependents { .. } | AdminError::ConfirmationRequired(_) => {
                StatusCode::CONFLICT
            }
            AdminError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AdminError::Upload(_) => StatusCode::BAD_GATEWAY,
            AdminError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Toast shown for this error
    pub fn toast(&self) -> Toast {
        match self {
            AdminError::Database { message, .. } => Toast::error(message.clone()),
            AdminError::Pool(_) => Toast::error("Database unavailable. Please try again."),
            AdminError::NotFound(what) => Toast::error(format!("{} not found", what)),
            AdminError::HasDependents {
                title,
                message,
                variant,
            } => Toast {
                title: title.clone(),
                description: message.clone(),
                variant: *variant,
            },
            AdminError::Validation { title, message } => {
                Toast::destructive(title.clone(), message.clone())
            }
            AdminError::ConfirmationRequired(prompt) => {
                Toast::destructive("Confirmation required", prompt.clone())
            }
            AdminError::Upload(_) => Toast::destructive(
                "Upload failed",
                "There was an error uploading your image. Please try again.",
            ),
            AdminError::Unauthorized(_) => {
                Toast::destructive("Unauthorized", "Please sign in again")
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            tracing::debug!("Request refused: {}", self);
        }

        (status, Json(ApiResponse::<()>::failure(self.toast()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependents_refusal_is_destructive_unless_marked_as_notice() {
        let refusal = AdminError::has_dependents("Cannot Delete Quiz", "This quiz has questions");
        assert_eq!(refusal.toast().variant, ToastVariant::Destructive);
        assert_eq!(refusal.status(), StatusCode::CONFLICT);

        let notice = refusal.as_notice();
        let toast = notice.toast();
        assert_eq!(toast.variant, ToastVariant::Default);
        assert_eq!(toast.title, "Cannot Delete Quiz");
        assert_eq!(toast.description, "This quiz has questions");
        assert_eq!(notice.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn as_notice_leaves_other_errors_alone() {
        let err = AdminError::NotFound("Couple".to_string()).as_notice();
        assert!(matches!(err, AdminError::NotFound(_)));
        assert_eq!(err.toast().variant, ToastVariant::Destructive);
    }
}
