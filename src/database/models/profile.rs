use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Profile document. `U` is the owner reference: the bare user id as
/// stored, or [`UserSummary`] once joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile<U = Uuid> {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: U,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub social: Social,
    pub date: DateTime<Utc>,
}

pub type PopulatedProfile = Profile<UserSummary>;

/// Mutable profile fields. An upsert replaces all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social: Social,
}

impl Profile {
    pub fn create(user: Uuid, fields: ProfileFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            name: fields.name,
            bio: fields.bio,
            location: fields.location,
            website: fields.website,
            social: fields.social,
            date: Utc::now(),
        }
    }

    /// Full replace of the mutable fields; id, owner and date are kept.
    pub fn replace(&mut self, fields: ProfileFields) {
        self.name = fields.name;
        self.bio = fields.bio;
        self.location = fields.location;
        self.website = fields.website;
        self.social = fields.social;
    }

    pub fn populate(self, user: UserSummary) -> PopulatedProfile {
        self.map_user(|_| user)
    }
}

impl<U> Profile<U> {
    /// Swaps the owner reference, keeping every other field.
    pub fn map_user<V>(self, f: impl FnOnce(U) -> V) -> Profile<V> {
        Profile {
            id: self.id,
            user: f(self.user),
            name: self.name,
            bio: self.bio,
            location: self.location,
            website: self.website,
            social: self.social,
            date: self.date,
        }
    }
}
