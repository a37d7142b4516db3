// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error};
use uuid::Uuid;

use crate::api::routes::{fetched, mutation, ApiResponse, DeleteQuery, ListQuery, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::{delete_couple_cascade, CascadeReport};
use crate::models::{Couple, CoupleWithNames};
use crate::schema::{couples, profiles};
use crate::search::filter_rows;

const ENTITY: &str = "couples";
const DELETE_PROMPT: &str = "Are you sure you want to delete this couple? This will remove the relationship and ALL related data (messages, quizzes, events, etc.).";

/// Display name of every profile
pub(crate) async fn load_profile_names(
    conn: &mut AsyncPgConnection,
) -> Result<HashMap<Uuid, String>> {
    let rows = profiles::table
        .select((profiles::id, profiles::name))
        .load::<(Uuid, String)>(conn)
        .await
        .map_err(AdminError::database("Failed to fetch users"))?;
    Ok(rows.into_iter().collect())
}

/// Couples with member names, newest first
pub(crate) async fn load_couples_with_names(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<CoupleWithNames>> {
    let rows = couples::table
        .select(Couple::as_select())
        .order(couples::created_at.desc())
        .load::<Couple>(conn)
        .await
        .map_err(AdminError::database("Failed to fetch couples"))?;
    let names = load_profile_names(conn).await?;

    Ok(rows
        .into_iter()
        .map(|couple| CoupleWithNames::resolve(couple, &names))
        .collect())
}

pub async fn fetch_couples(state: &AppState, query: &ListQuery) -> Result<Vec<CoupleWithNames>> {
    let mut conn = state.db.get_connection().await?;
    let couples = load_couples_with_names(&mut conn).await?;
    Ok(filter_rows(couples, query.term()))
}

pub async fn list_couples(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<CoupleWithNames>>>> {
    debug!("Listing couples, search: {:?}", query.search);
    let couples = fetched(ENTITY, fetch_couples(&state, &query).await)?;
    Ok(Json(ApiResponse::success(couples)))
}

#[derive(Debug, Serialize)]
pub struct CoupleOption {
    pub id: Uuid,
    pub label: String,
}

/// Couples labelled "A & B", for the daily question form
pub async fn couple_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CoupleOption>>>> {
    let mut conn = state.db.get_connection().await?;
    let options = load_couples_with_names(&mut conn)
        .await?
        .into_iter()
        .map(|couple| CoupleOption {
            id: couple.couple.id,
            label: couple.label(),
        })
        .collect();
    Ok(Json(ApiResponse::success(options)))
}

async fn remove_couple(state: &AppState, id: Uuid) -> Result<CascadeReport> {
    let mut conn = state.db.get_connection().await?;

    delete_couple_cascade(&mut conn, id)
        .await
        .map_err(|e| {
            error!("Couple cascade for {} rolled back: {}", id, e);
            AdminError::database("Failed to delete couple. Please try again.")(e)
        })?
        .ok_or_else(|| AdminError::NotFound("Couple".to_string()))
}

pub async fn delete_couple(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<CascadeReport>>> {
    confirm.require(DELETE_PROMPT)?;
    let report = mutation(ENTITY, "delete", remove_couple(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        report,
        Toast::success("Couple and all related data deleted successfully"),
    )))
}
