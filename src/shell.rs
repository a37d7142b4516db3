// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Sections of the console and the sidebar menu.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Dashboard,
    Users,
    Couples,
    QuizThemes,
    Quizzes,
    QuizQuestions,
    Questions,
    DailyQuestions,
    ServiceCategories,
    ServiceSubcategories,
    ServiceProviders,
    ServiceStats,
}

impl Section {
    /// Sidebar order
    pub const ALL: [Section; 12] = [
        Section::Dashboard,
        Section::Users,
        Section::Couples,
        Section::QuizThemes,
        Section::Quizzes,
        Section::QuizQuestions,
        Section::Questions,
        Section::DailyQuestions,
        Section::ServiceCategories,
        Section::ServiceSubcategories,
        Section::ServiceProviders,
        Section::ServiceStats,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Users => "users",
            Section::Couples => "couples",
            Section::QuizThemes => "quiz-themes",
            Section::Quizzes => "quizzes",
            Section::QuizQuestions => "quiz-questions",
            Section::Questions => "questions",
            Section::DailyQuestions => "daily-questions",
            Section::ServiceCategories => "service-categories",
            Section::ServiceSubcategories => "service-subcategories",
            Section::ServiceProviders => "service-providers",
            Section::ServiceStats => "service-stats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Users => "Users",
            Section::Couples => "Couples",
            Section::QuizThemes => "Quiz Themes",
            Section::Quizzes => "Quizzes",
            Section::QuizQuestions => "Quiz Questions",
            Section::Questions => "Questions",
            Section::DailyQuestions => "Daily Questions",
            Section::ServiceCategories => "Service Categories",
            Section::ServiceSubcategories => "Service Subcategories",
            Section::ServiceProviders => "Service Providers",
            Section::ServiceStats => "Service Stats",
        }
    }

    /// Unknown ids land on the dashboard
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|section| section.id() == id.trim())
            .unwrap_or(Section::Dashboard)
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::Dashboard
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Section::from_id(s))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
}

/// Sidebar entries in display order
pub fn menu() -> Vec<MenuItem> {
    Section::ALL
        .into_iter()
        .map(|section| MenuItem {
            id: section.id(),
            label: section.label(),
        })
        .collect()
}
