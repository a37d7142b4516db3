// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdminError, Result};
use crate::schema::{quiz_questions, quiz_themes, quizzes};
use super::{blank_to_none, required};

/// Theme grouping several quizzes
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = quiz_themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuizTheme {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = quiz_themes)]
#[diesel(treat_none_as_null = true)]
pub struct QuizThemeChanges {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizThemeDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl QuizThemeDraft {
    pub fn into_changes(self) -> Result<QuizThemeChanges> {
        Ok(QuizThemeChanges {
            name: required(self.name, "Name")?,
            description: blank_to_none(self.description),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = quizzes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Quiz {
    pub id: Uuid,
    pub theme_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = quizzes)]
#[diesel(treat_none_as_null = true)]
pub struct QuizChanges {
    pub theme_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizDraft {
    pub theme_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl QuizDraft {
    pub fn into_changes(self) -> Result<QuizChanges> {
        Ok(QuizChanges {
            theme_id: self.theme_id,
            title: required(self.title, "Title")?,
            description: blank_to_none(self.description),
            image: blank_to_none(self.image),
        })
    }
}

/// Quiz with its theme, as listed on the quizzes screen
#[derive(Debug, Clone, Serialize)]
pub struct QuizWithTheme {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub theme: QuizTheme,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = quiz_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuizQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub content: String,
    pub ord: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = quiz_questions)]
pub struct QuizQuestionChanges {
    pub quiz_id: Uuid,
    pub content: String,
    pub ord: i32,
}

#[derive(Debug, Deserialize)]
pub struct QuizQuestionDraft {
    pub quiz_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub ord: i32,
}

impl QuizQuestionDraft {
    pub fn into_changes(self) -> Result<QuizQuestionChanges> {
        Ok(QuizQuestionChanges {
            quiz_id: self.quiz_id,
            content: required(self.content, "Content")?,
            ord: validate_ord(self.ord)?,
        })
    }
}

/// Position of a question within its quiz; the first slot is 0
pub fn validate_ord(ord: i32) -> Result<i32> {
    if ord < 0 {
        return Err(AdminError::validation(
            "Invalid order",
            "Question order cannot be negative",
        ));
    }
    Ok(ord)
}

/// Body of the single-question reorder call
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ord: i32,
}

/// Quiz question with its quiz and theme
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestionDetails {
    #[serde(flatten)]
    pub question: QuizQuestion,
    pub quiz: Quiz,
    pub theme: QuizTheme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_order_is_rejected() {
        assert!(validate_ord(-1).is_err());
        assert_eq!(validate_ord(0).unwrap(), 0);
    }

    #[test]
    fn quiz_draft_clears_blank_image() {
        let changes = QuizDraft {
            theme_id: Uuid::new_v4(),
            title: "Trust Basics".into(),
            description: None,
            image: Some("  ".into()),
        }
        .into_changes()
        .unwrap();

        assert_eq!(changes.title, "Trust Basics");
        assert!(changes.image.is_none());
    }

    #[test]
    fn theme_draft_needs_a_name() {
        let err = QuizThemeDraft {
            name: "".into(),
            description: Some("Talk it out".into()),
        }
        .into_changes()
        .unwrap_err();

        assert!(matches!(err, AdminError::Validation { .. }));
    }
}
