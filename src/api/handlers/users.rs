// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::routes::{fetched, mutation, ApiResponse, DeleteQuery, ListQuery, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::functions::users_with_emails::fetch_users_with_emails;
use crate::integrity::{
    delete_profile_with_cleanup, ensure_no_dependents, map_delete_error, CascadeReport,
    DependentCheck,
};
use crate::models::{Profile, ProfileDraft, UserWithEmail};
use crate::schema::{couples, profiles};
use crate::search::filter_rows;

const ENTITY: &str = "users";
const DELETE_PROMPT: &str = "Are you sure you want to delete this user? This action cannot be undone.";
const CANNOT_DELETE: &str = "Cannot Delete User";

/// Profiles with account e-mail and couple linkage, newest first
pub async fn fetch_users(state: &AppState, query: &ListQuery) -> Result<Vec<UserWithEmail>> {
    let mut conn = state.db.get_connection().await?;
    let users = fetch_users_with_emails(&mut conn).await?;
    Ok(filter_rows(users, query.term()))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<UserWithEmail>>>> {
    debug!("Listing users, search: {:?}", query.search);
    let users = fetched(ENTITY, fetch_users(&state, &query).await)?;
    Ok(Json(ApiResponse::success(users)))
}

/// Profiles are created at sign-up; the console only edits them
pub async fn save_user(state: &AppState, id: Uuid, draft: ProfileDraft) -> Result<Profile> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    diesel::update(profiles::table.find(id))
        .set(&changes)
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AdminError::database("Failed to save user"))?
        .ok_or_else(|| AdminError::NotFound("User".to_string()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<ApiResponse<Profile>>> {
    let profile = mutation(ENTITY, "update", save_user(&state, id, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        profile,
        Toast::success("User updated successfully"),
    )))
}

async fn remove_user(state: &AppState, id: Uuid) -> Result<CascadeReport> {
    let mut conn = state.db.get_connection().await?;

    let couple_count = couples::table
        .filter(couples::user1_id.eq(id).or(couples::user2_id.eq(id)))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check user relationships"))?;

    ensure_no_dependents(&[DependentCheck {
        table: "couples",
        count: couple_count,
        title: CANNOT_DELETE,
        message: "This user has couple relationships. Please delete the couple relationship first in the Couples Management section, then delete the user.",
    }])
    .map_err(AdminError::as_notice)?;

    let report = delete_profile_with_cleanup(&mut conn, id)
        .await
        .map_err(|e| {
            map_delete_error(
                e,
                CANNOT_DELETE,
                "This user cannot be deleted because they have related data that couldn't be removed. Please contact support.",
                "Failed to delete user. Please try again.",
            )
            .as_notice()
        })?;

    // The profile row is the last one the cleanup removes
    if report.removed.last().map_or(true, |last| last.rows == 0) {
        return Err(AdminError::NotFound("User".to_string()));
    }
    info!("Deleted user {} and {} related row(s)", id, report.total() - 1);
    Ok(report)
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<CascadeReport>>> {
    confirm.require(DELETE_PROMPT)?;
    let report = mutation(ENTITY, "delete", remove_user(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        report,
        Toast::success("User deleted successfully"),
    )))
}
