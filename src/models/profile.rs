// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdminError, Result};
use crate::schema::{profiles, users};
use super::{blank_to_none, required};

/// Accepted values of `profiles.gender`
pub const GENDERS: [&str; 3] = ["male", "female", "other"];

/// App user profile, created at sign-up
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub profile_picture: Option<String>,
    pub mood: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub interests: Option<Vec<String>>,
    pub invite_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

/// Fields the console may edit on a profile
#[derive(Debug, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub struct ProfileChanges {
    pub name: String,
    pub gender: Option<String>,
    pub country: Option<String>,
}

/// Edit form for a user
#[derive(Debug, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ProfileDraft {
    pub fn into_changes(self) -> Result<ProfileChanges> {
        let gender = blank_to_none(self.gender).map(|g| g.to_lowercase());
        if let Some(gender) = &gender {
            if !GENDERS.contains(&gender.as_str()) {
                return Err(AdminError::validation(
                    "Invalid gender",
                    format!("Gender must be one of: {}", GENDERS.join(", ")),
                ));
            }
        }

        Ok(ProfileChanges {
            name: required(self.name, "Name")?,
            gender,
            country: blank_to_none(self.country),
        })
    }
}

/// Registered account of the authentication service
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Profile merged with its account e-mail and couple linkage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithEmail {
    #[serde(flatten)]
    pub profile: Profile,
    pub email: String,
    pub couple_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
}
