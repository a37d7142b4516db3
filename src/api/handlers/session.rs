// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, Extension, Json};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::api::routes::{fetched, ApiResponse, Toast};
use crate::api::AppState;
use crate::auth::Session;
use crate::error::{AdminError, Result};
use crate::models::AuthUser;
use crate::schema::users;

/// Current operator session
pub async fn get_session(Extension(session): Extension<Session>) -> Json<ApiResponse<Session>> {
    Json(ApiResponse::success(session))
}

#[derive(Debug, Serialize)]
pub struct SignedOut {
    pub user_id: Uuid,
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<SignedOut>> {
    state.sessions.revoke(&session).await;

    Json(ApiResponse::with_toast(
        SignedOut {
            user_id: session.user_id,
        },
        Toast::new("Logged out", "You have been successfully logged out"),
    ))
}

async fn fetch_accounts(state: &AppState) -> Result<Vec<AuthUser>> {
    let mut conn = state.db.get_connection().await?;
    users::table
        .select(AuthUser::as_select())
        .order(users::email.asc())
        .load::<AuthUser>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch accounts"))
}

/// Registered accounts, e-mail to id
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AuthUser>>>> {
    let accounts = fetched("accounts", fetch_accounts(&state).await)?;

    debug!("Listing {} accounts", accounts.len());
    Ok(Json(ApiResponse::success(accounts)))
}
