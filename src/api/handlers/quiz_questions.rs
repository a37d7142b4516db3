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

use crate::api::routes::{
    fetched, mutation, parent_filter, ApiResponse, DeleteQuery, Deleted, ListQuery, Toast,
};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::map_delete_error;
use crate::models::{
    validate_ord, Quiz, QuizQuestion, QuizQuestionDetails, QuizQuestionDraft, QuizTheme,
    ReorderRequest,
};
use crate::schema::{quiz_questions, quiz_themes, quizzes};
use crate::search::filter_rows;

const ENTITY: &str = "quiz_questions";
const DELETE_PROMPT: &str = "Are you sure you want to delete this quiz question?";

/// Questions in quiz order, optionally narrowed to one quiz
pub async fn fetch_quiz_questions(
    state: &AppState,
    query: &ListQuery,
) -> Result<Vec<QuizQuestionDetails>> {
    let mut conn = state.db.get_connection().await?;

    let rows = quiz_questions::table
        .inner_join(quizzes::table.inner_join(quiz_themes::table))
        .select((
            QuizQuestion::as_select(),
            Quiz::as_select(),
            QuizTheme::as_select(),
        ))
        .order(quiz_questions::ord.asc())
        .load::<(QuizQuestion, Quiz, QuizTheme)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch quiz questions"))?;

    let quiz_filter = parent_filter(query.quiz_id.as_deref());
    let questions = rows
        .into_iter()
        .filter(|(question, _, _)| quiz_filter.map_or(true, |id| question.quiz_id == id))
        .map(|(question, quiz, theme)| QuizQuestionDetails {
            question,
            quiz,
            theme,
        })
        .collect();
    Ok(filter_rows(questions, query.term()))
}

pub async fn list_quiz_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<QuizQuestionDetails>>>> {
    debug!(
        "Listing quiz questions, search: {:?}, quiz: {:?}",
        query.search, query.quiz_id
    );
    let questions = fetched(ENTITY, fetch_quiz_questions(&state, &query).await)?;
    Ok(Json(ApiResponse::success(questions)))
}

pub async fn save_quiz_question(
    state: &AppState,
    editing: Option<Uuid>,
    draft: QuizQuestionDraft,
) -> Result<QuizQuestion> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(quiz_questions::table.find(id))
            .set(&changes)
            .returning(QuizQuestion::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save quiz question"))?
            .ok_or_else(|| AdminError::NotFound("Quiz question".to_string())),
        None => diesel::insert_into(quiz_questions::table)
            .values(&changes)
            .returning(QuizQuestion::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save quiz question")),
    }
}

pub async fn create_quiz_question(
    State(state): State<AppState>,
    Json(draft): Json<QuizQuestionDraft>,
) -> Result<Json<ApiResponse<QuizQuestion>>> {
    let question = mutation(ENTITY, "create", save_quiz_question(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        question,
        Toast::success("Quiz question created successfully"),
    )))
}

pub async fn update_quiz_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<QuizQuestionDraft>,
) -> Result<Json<ApiResponse<QuizQuestion>>> {
    let question = mutation(
        ENTITY,
        "update",
        save_quiz_question(&state, Some(id), draft).await,
    )?;
    Ok(Json(ApiResponse::with_toast(
        question,
        Toast::success("Quiz question updated successfully"),
    )))
}

/// Move one question to a new slot; siblings keep their positions
pub async fn set_question_order(state: &AppState, id: Uuid, ord: i32) -> Result<QuizQuestion> {
    let ord = validate_ord(ord)?;
    let mut conn = state.db.get_connection().await?;

    diesel::update(quiz_questions::table.find(id))
        .set(quiz_questions::ord.eq(ord))
        .returning(QuizQuestion::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AdminError::database("Failed to reorder question"))?
        .ok_or_else(|| AdminError::NotFound("Quiz question".to_string()))
}

pub async fn reorder_quiz_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ApiResponse<QuizQuestion>>> {
    debug!("Moving quiz question {} to position {}", id, request.ord);
    let question = mutation(
        ENTITY,
        "reorder",
        set_question_order(&state, id, request.ord).await,
    )?;
    Ok(Json(ApiResponse::success(question)))
}

async fn remove_quiz_question(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let deleted = diesel::delete(quiz_questions::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(|e| {
            map_delete_error(
                e,
                "Cannot Delete",
                "This quiz question has user answers and cannot be deleted. Please remove related answers first.",
                "Failed to delete quiz question",
            )
        })?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Quiz question".to_string()));
    }
    Ok(())
}

pub async fn delete_quiz_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_quiz_question(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Quiz question deleted successfully"),
    )))
}
