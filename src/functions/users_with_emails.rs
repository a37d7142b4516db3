// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Join of profiles, account e-mails and couple membership.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::models::{AuthUser, Couple, Profile, UserWithEmail};
use crate::schema::{couples, profiles, users};

/// Placeholder shown for profiles without an account e-mail
pub const MISSING_EMAIL: &str = "N/A";

/// Attach e-mail and couple linkage to each profile, keeping profile order.
///
/// A profile in several couples is linked to the first one listed.
pub fn merge_users(
    profiles: Vec<Profile>,
    couples: &[Couple],
    accounts: &[AuthUser],
) -> Vec<UserWithEmail> {
    let emails: HashMap<Uuid, &str> = accounts
        .iter()
        .filter_map(|account| account.email.as_deref().map(|email| (account.id, email)))
        .collect();

    profiles
        .into_iter()
        .map(|profile| {
            let couple = couples.iter().find(|couple| couple.has_member(profile.id));
            UserWithEmail {
                email: emails
                    .get(&profile.id)
                    .copied()
                    .unwrap_or(MISSING_EMAIL)
                    .to_string(),
                couple_id: couple.map(|c| c.id),
                partner_id: couple.and_then(|c| c.partner_of(profile.id)),
                profile,
            }
        })
        .collect()
}

/// Read the three sources and merge them
pub async fn fetch_users_with_emails(conn: &mut AsyncPgConnection) -> Result<Vec<UserWithEmail>> {
    let profile_rows = profiles::table
        .select(Profile::as_select())
        .order(profiles::created_at.desc())
        .load::<Profile>(conn)
        .await
        .map_err(AdminError::database("Failed to fetch users"))?;

    let couple_rows = couples::table
        .select(Couple::as_select())
        .load::<Couple>(conn)
        .await
        .map_err(AdminError::database("Failed to fetch couples"))?;

    let accounts = users::table
        .select(AuthUser::as_select())
        .load::<AuthUser>(conn)
        .await
        .map_err(AdminError::database("Failed to fetch user emails"))?;

    debug!(
        "Merging {} profiles with {} accounts and {} couples",
        profile_rows.len(),
        accounts.len(),
        couple_rows.len()
    );
    Ok(merge_users(profile_rows, &couple_rows, &accounts))
}

async fn load(state: &AppState) -> Result<Vec<UserWithEmail>> {
    let mut conn = state.db.get_connection().await?;
    fetch_users_with_emails(&mut conn).await
}

/// `GET`/`POST` handler; failures come back as `{ error }` with status 400
pub async fn handle(State(state): State<AppState>) -> Response {
    match load(&state).await {
        Ok(users) => (StatusCode::OK, Json(json!({ "users": users }))).into_response(),
        Err(e) => {
            error!("get-users-with-emails failed: {}", e);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// CORS preflight
pub async fn preflight() -> &'static str {
    "ok"
}
