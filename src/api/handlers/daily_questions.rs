// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::api::handlers::couples::load_couples_with_names;
use crate::api::routes::{fetched, mutation, ApiResponse, DeleteQuery, Deleted, ListQuery, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::map_delete_error;
use crate::models::{DailyQuestion, DailyQuestionDetails, DailyQuestionDraft, Question};
use crate::schema::{daily_questions, questions};
use crate::search::filter_rows;

const ENTITY: &str = "daily_questions";
const DELETE_PROMPT: &str = "Are you sure you want to delete this daily question?";

/// Scheduled questions, latest date first, with question text and couple
pub async fn fetch_daily_questions(
    state: &AppState,
    query: &ListQuery,
) -> Result<Vec<DailyQuestionDetails>> {
    let mut conn = state.db.get_connection().await?;

    let rows = daily_questions::table
        .select(DailyQuestion::as_select())
        .order(daily_questions::scheduled_for.desc())
        .load::<DailyQuestion>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch daily questions"))?;

    let question_map: HashMap<Uuid, Question> = questions::table
        .select(Question::as_select())
        .load::<Question>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch daily questions"))?
        .into_iter()
        .map(|question| (question.id, question))
        .collect();

    let couple_map: HashMap<Uuid, _> = load_couples_with_names(&mut conn)
        .await?
        .into_iter()
        .map(|couple| (couple.couple.id, couple))
        .collect();

    let details = rows
        .into_iter()
        .map(|daily_question| DailyQuestionDetails {
            question: daily_question
                .question_id
                .and_then(|id| question_map.get(&id).cloned()),
            couple: daily_question
                .couple_id
                .and_then(|id| couple_map.get(&id).cloned()),
            daily_question,
        })
        .collect();
    Ok(filter_rows(details, query.term()))
}

pub async fn list_daily_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<DailyQuestionDetails>>>> {
    debug!("Listing daily questions, search: {:?}", query.search);
    let rows = fetched(ENTITY, fetch_daily_questions(&state, &query).await)?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn save_daily_question(
    state: &AppState,
    editing: Option<Uuid>,
    draft: DailyQuestionDraft,
) -> Result<DailyQuestion> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(daily_questions::table.find(id))
            .set(&changes)
            .returning(DailyQuestion::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save daily question"))?
            .ok_or_else(|| AdminError::NotFound("Daily question".to_string())),
        None => diesel::insert_into(daily_questions::table)
            .values(&changes)
            .returning(DailyQuestion::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save daily question")),
    }
}

pub async fn create_daily_question(
    State(state): State<AppState>,
    Json(draft): Json<DailyQuestionDraft>,
) -> Result<Json<ApiResponse<DailyQuestion>>> {
    let row = mutation(ENTITY, "create", save_daily_question(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        row,
        Toast::success("Daily question scheduled successfully"),
    )))
}

pub async fn update_daily_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<DailyQuestionDraft>,
) -> Result<Json<ApiResponse<DailyQuestion>>> {
    let row = mutation(
        ENTITY,
        "update",
        save_daily_question(&state, Some(id), draft).await,
    )?;
    Ok(Json(ApiResponse::with_toast(
        row,
        Toast::success("Daily question updated successfully"),
    )))
}

async fn remove_daily_question(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let deleted = diesel::delete(daily_questions::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(|e| {
            map_delete_error(
                e,
                "Cannot Delete",
                "This daily question cannot be deleted because it has related answers or notifications. Please remove related data first.",
                "Failed to delete daily question",
            )
            .as_notice()
        })?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Daily question".to_string()));
    }
    Ok(())
}

pub async fn delete_daily_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_daily_question(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Daily question deleted successfully"),
    )))
}
