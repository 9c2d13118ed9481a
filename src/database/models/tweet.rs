use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub reply: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    /// Author display name at posting time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Author avatar at posting time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub text: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_to: Option<Uuid>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub date_posted: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTweet {
    pub user: Uuid,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub text: String,
    pub replied_to: Option<Uuid>,
}

impl Tweet {
    pub fn create(new: NewTweet) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user: new.user,
            name: new.name,
            avatar: new.avatar,
            text: new.text,
            likes: Vec::new(),
            replied_to: new.replied_to,
            replies: Vec::new(),
            date_posted: now,
            date_updated: now,
        }
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Prepends `user`; `false` if it already likes the tweet.
    pub fn add_like(&mut self, user: Uuid) -> bool {
        if self.is_liked_by(user) {
            return false;
        }
        self.likes.insert(0, Like { user });
        true
    }

    /// Removes the single entry for `user`; `false` if there is none.
    pub fn remove_like(&mut self, user: Uuid) -> bool {
        match self.likes.iter().position(|like| like.user == user) {
            Some(index) => {
                self.likes.remove(index);
                true
            }
            None => false,
        }
    }
}
