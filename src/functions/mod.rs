// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Server-side functions called by the mobile app and the console.

pub mod users_with_emails;

use axum::{routing::get, Router};
use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::api::AppState;

/// Route of the profile/e-mail join function
pub const USERS_WITH_EMAILS_PATH: &str = "/functions/v1/get-users-with-emails";

/// Headers the function accepts from browsers
pub fn function_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Function routes, mounted outside the admin auth layer
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            USERS_WITH_EMAILS_PATH,
            get(users_with_emails::handle)
                .post(users_with_emails::handle)
                .options(users_with_emails::preflight),
        )
        .layer(function_cors())
}
