// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::api::routes::{fetched, mutation, ApiResponse, DeleteQuery, Deleted, ListQuery, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::map_delete_error;
use crate::models::service::DirectoryOption;
use crate::models::{Question, QuestionDraft};
use crate::schema::questions;
use crate::search::filter_rows;

const ENTITY: &str = "questions";
const DELETE_PROMPT: &str = "Are you sure you want to delete this question?";

pub async fn fetch_questions(state: &AppState, query: &ListQuery) -> Result<Vec<Question>> {
    let mut conn = state.db.get_connection().await?;

    let rows = questions::table
        .select(Question::as_select())
        .order(questions::created_at.desc())
        .load::<Question>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch questions"))?;

    Ok(filter_rows(rows, query.term()))
}

pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Question>>>> {
    debug!("Listing questions, search: {:?}", query.search);
    let rows = fetched(ENTITY, fetch_questions(&state, &query).await)?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Question texts for the daily question form
pub async fn question_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectoryOption>>>> {
    let mut conn = state.db.get_connection().await?;

    let options = questions::table
        .select((questions::id, questions::content))
        .order(questions::content.asc())
        .load::<(Uuid, String)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch questions"))?
        .into_iter()
        .map(|(id, name)| DirectoryOption {
            id,
            name,
            icon: None,
            category: None,
        })
        .collect();

    Ok(Json(ApiResponse::success(options)))
}

pub async fn save_question(
    state: &AppState,
    editing: Option<Uuid>,
    draft: QuestionDraft,
) -> Result<Question> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(questions::table.find(id))
            .set(&changes)
            .returning(Question::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save question"))?
            .ok_or_else(|| AdminError::NotFound("Question".to_string())),
        None => diesel::insert_into(questions::table)
            .values(&changes)
            .returning(Question::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save question")),
    }
}

pub async fn create_question(
    State(state): State<AppState>,
    Json(draft): Json<QuestionDraft>,
) -> Result<Json<ApiResponse<Question>>> {
    let question = mutation(ENTITY, "create", save_question(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        question,
        Toast::success("Question created successfully"),
    )))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<QuestionDraft>,
) -> Result<Json<ApiResponse<Question>>> {
    let question = mutation(ENTITY, "update", save_question(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        question,
        Toast::success("Question updated successfully"),
    )))
}

async fn remove_question(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let deleted = diesel::delete(questions::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(|e| {
            map_delete_error(
                e,
                "Cannot Delete",
                "This question is scheduled as a daily question and cannot be deleted. Please remove those daily questions first.",
                "Failed to delete question",
            )
        })?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Question".to_string()));
    }
    Ok(())
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_question(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Question deleted successfully"),
    )))
}
