// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! In-memory filtering of fetched rows.
//!
//! Screens fetch their whole result set and narrow it here; the search term
//! is never pushed down to the database.

use crate::models::service::{ProviderWithDirectory, ServiceCategory, SubcategoryWithCategory};
use crate::models::{
    CoupleWithNames, DailyQuestionDetails, Question, QuizQuestionDetails, QuizTheme,
    QuizWithTheme, UserWithEmail,
};

/// Row that can be matched against a search box
pub trait Searchable {
    /// Display fields the term is matched against; absent fields never match
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// Case-insensitive substring match over any field; an empty term matches.
/// The term is used as typed, so whitespace counts.
pub fn matches(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the rows matching `term`, preserving order
pub fn filter_rows<T: Searchable>(rows: Vec<T>, term: &str) -> Vec<T> {
    if term.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| matches(term, &row.search_fields()))
        .collect()
}

impl Searchable for UserWithEmail {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.profile.name.as_str()),
            Some(self.email.as_str()),
            self.profile.country.as_deref(),
        ]
    }
}

impl Searchable for CoupleWithNames {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.user1_name.as_deref(), self.user2_name.as_deref()]
    }
}

impl Searchable for QuizTheme {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.description.as_deref()]
    }
}

impl Searchable for QuizWithTheme {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.quiz.title.as_str()),
            self.quiz.description.as_deref(),
            Some(self.theme.name.as_str()),
        ]
    }
}

impl Searchable for QuizQuestionDetails {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.question.content.as_str()),
            Some(self.quiz.title.as_str()),
            Some(self.theme.name.as_str()),
        ]
    }
}

impl Searchable for Question {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.content.as_str())]
    }
}

impl Searchable for DailyQuestionDetails {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.question.as_ref().map(|q| q.content.as_str()),
            self.couple.as_ref().and_then(|c| c.user1_name.as_deref()),
            self.couple.as_ref().and_then(|c| c.user2_name.as_deref()),
        ]
    }
}

impl Searchable for ServiceCategory {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.description.as_deref()]
    }
}

impl Searchable for SubcategoryWithCategory {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.subcategory.name.as_str()),
            Some(self.category.name.as_str()),
        ]
    }
}

impl Searchable for ProviderWithDirectory {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.provider.name.as_str()),
            Some(self.subcategory.name.as_str()),
            Some(self.category.name.as_str()),
        ]
    }
}
