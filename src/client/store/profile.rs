use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Action;
use crate::database::models::{PopulatedProfile, Profile, UserSummary};

/// Owner as the server sent it: joined on reads, a bare id after a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileOwner {
    Populated(UserSummary),
    Id(Uuid),
}

impl ProfileOwner {
    pub fn id(&self) -> Uuid {
        match self {
            ProfileOwner::Populated(user) => user.id,
            ProfileOwner::Id(id) => *id,
        }
    }

    pub fn avatar(&self) -> Option<&str> {
        match self {
            ProfileOwner::Populated(user) => Some(&user.avatar),
            ProfileOwner::Id(_) => None,
        }
    }
}

pub type ProfileView = Profile<ProfileOwner>;

impl From<PopulatedProfile> for ProfileView {
    fn from(profile: PopulatedProfile) -> Self {
        profile.map_user(ProfileOwner::Populated)
    }
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        profile.map_user(ProfileOwner::Id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileError {
    pub msg: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileState {
    pub profile: Option<ProfileView>,
    pub profiles: Vec<PopulatedProfile>,
    pub loading: bool,
    pub error: Option<ProfileError>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            profile: None,
            profiles: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

pub fn reduce(state: &ProfileState, action: &Action) -> ProfileState {
    match action {
        Action::ProfileStart => ProfileState {
            loading: true,
            ..state.clone()
        },
        Action::GetProfile(profile) => ProfileState {
            profile: Some(profile.clone()),
            loading: false,
            ..state.clone()
        },
        Action::GetProfiles(profiles) => ProfileState {
            profiles: profiles.clone(),
            loading: false,
            ..state.clone()
        },
        Action::ProfileError { msg, status } => ProfileState {
            error: Some(ProfileError {
                msg: msg.clone(),
                status: *status,
            }),
            loading: false,
            ..state.clone()
        },
        Action::ClearProfile => ProfileState {
            profile: None,
            loading: false,
            ..state.clone()
        },
        _ => state.clone(),
    }
}
