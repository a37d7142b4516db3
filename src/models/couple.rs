// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::schema::couples;

/// Pairing of one or two profiles
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = couples)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Couple {
    pub id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub user1_id: Uuid,
    pub user2_id: Option<Uuid>,
}

impl Couple {
    /// Whether the profile is one of the two members
    pub fn has_member(&self, profile_id: Uuid) -> bool {
        self.user1_id == profile_id || self.user2_id == Some(profile_id)
    }

    /// The other member, if the profile belongs to this couple
    pub fn partner_of(&self, profile_id: Uuid) -> Option<Uuid> {
        if self.user1_id == profile_id {
            self.user2_id
        } else if self.user2_id == Some(profile_id) {
            Some(self.user1_id)
        } else {
            None
        }
    }

    /// Profile ids referenced by this couple
    pub fn member_ids(&self) -> impl Iterator<Item = Uuid> {
        std::iter::once(self.user1_id).chain(self.user2_id)
    }
}

/// Couple row with member names resolved for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoupleWithNames {
    #[serde(flatten)]
    pub couple: Couple,
    pub user1_name: Option<String>,
    pub user2_name: Option<String>,
}

impl CoupleWithNames {
    pub fn resolve(couple: Couple, names: &HashMap<Uuid, String>) -> Self {
        let user1_name = names.get(&couple.user1_id).cloned();
        let user2_name = couple.user2_id.and_then(|id| names.get(&id).cloned());
        Self {
            couple,
            user1_name,
            user2_name,
        }
    }

    /// "Alex & Sam" style label used by couple pickers
    pub fn label(&self) -> String {
        let first = self.user1_name.as_deref().unwrap_or("Unknown");
        match &self.user2_name {
            Some(second) => format!("{} & {}", first, second),
            None => format!("{} (pending)", first),
        }
    }
}
