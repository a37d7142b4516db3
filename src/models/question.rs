// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdminError, Result};
use crate::schema::{daily_questions, questions};
use super::{blank_to_none, optional_id, required, CoupleWithNames};

/// Time of day a question is pushed when the form leaves it empty
pub const DEFAULT_SCHEDULED_TIME: &str = "08:00:00";

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Question {
    pub id: Uuid,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub scheduled_time: NaiveTime,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = questions)]
pub struct QuestionChanges {
    pub content: String,
    pub scheduled_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct QuestionDraft {
    pub content: String,
    #[serde(default)]
    pub scheduled_time: Option<String>,
}

impl QuestionDraft {
    pub fn into_changes(self) -> Result<QuestionChanges> {
        let raw = blank_to_none(self.scheduled_time);
        Ok(QuestionChanges {
            content: required(self.content, "Content")?,
            scheduled_time: parse_scheduled_time(raw.as_deref().unwrap_or(DEFAULT_SCHEDULED_TIME))?,
        })
    }
}

/// Accepts `HH:MM:SS` as stored or `HH:MM` as typed in a time input
pub fn parse_scheduled_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| {
            AdminError::validation(
                "Invalid time",
                format!("Scheduled time {:?} must look like HH:MM", raw),
            )
        })
}

/// A question scheduled for one couple, or for every couple when
/// `couple_id` is empty
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = daily_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailyQuestion {
    pub id: Uuid,
    pub couple_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub scheduled_for: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = daily_questions)]
#[diesel(treat_none_as_null = true)]
pub struct DailyQuestionChanges {
    pub question_id: Option<Uuid>,
    pub couple_id: Option<Uuid>,
    pub scheduled_for: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DailyQuestionDraft {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub couple_id: Option<String>,
    pub scheduled_for: NaiveDate,
}

impl DailyQuestionDraft {
    pub fn into_changes(self) -> Result<DailyQuestionChanges> {
        Ok(DailyQuestionChanges {
            question_id: optional_id(self.question_id, "Question")?,
            couple_id: optional_id(self.couple_id, "Couple")?,
            scheduled_for: self.scheduled_for,
        })
    }
}

/// Daily question with its question text and couple resolved
#[derive(Debug, Clone, Serialize)]
pub struct DailyQuestionDetails {
    #[serde(flatten)]
    pub daily_question: DailyQuestion,
    pub question: Option<Question>,
    pub couple: Option<CoupleWithNames>,
}
