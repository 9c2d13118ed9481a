use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewTweet, NewUser, PopulatedProfile, Profile, ProfileFields, Reply, Tweet, User};
use super::store::{LikeChange, Store};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    profiles: Vec<Profile>,
    tweets: Vec<Tweet>,
}

/// Process-local store. Collections keep insertion order; each method
/// holds the write lock for its whole check-and-mutate step.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn populate(data: &Collections, profile: &Profile) -> Option<PopulatedProfile> {
    data.users
        .iter()
        .find(|u| u.id == profile.user)
        .map(|owner| profile.clone().populate(owner.summary()))
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut data = self.data.write().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!("email {} already registered", user.email)));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password: user.password,
            avatar: user.avatar,
            date: Utc::now(),
        };
        data.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut data = self.data.write().await;
        let before = data.users.len();
        data.users.retain(|u| u.id != id);
        data.profiles.retain(|p| p.user != id);
        Ok(data.users.len() != before)
    }

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.profiles.iter().find(|p| p.user == user).cloned())
    }

    async fn find_populated_profile(&self, user: Uuid) -> Result<Option<PopulatedProfile>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data
            .profiles
            .iter()
            .find(|p| p.user == user)
            .and_then(|p| populate(&data, p)))
    }

    async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.profiles.iter().filter_map(|p| populate(&data, p)).collect())
    }

    async fn upsert_profile(&self, user: Uuid, fields: ProfileFields) -> Result<Profile, DatabaseError> {
        let mut data = self.data.write().await;
        if let Some(existing) = data.profiles.iter_mut().find(|p| p.user == user) {
            existing.replace(fields);
            return Ok(existing.clone());
        }

        let profile = Profile::create(user, fields);
        data.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn delete_profile(&self, user: Uuid) -> Result<bool, DatabaseError> {
        let mut data = self.data.write().await;
        let before = data.profiles.len();
        data.profiles.retain(|p| p.user != user);
        Ok(data.profiles.len() != before)
    }

    async fn insert_tweet(&self, tweet: NewTweet) -> Result<Tweet, DatabaseError> {
        let tweet = Tweet::create(tweet);
        self.data.write().await.tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, DatabaseError> {
        let data = self.data.read().await;
        Ok(data.tweets.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, DatabaseError> {
        let data = self.data.read().await;
        // Later inserts win ties on equal timestamps
        let mut tweets: Vec<Tweet> = data.tweets.iter().rev().cloned().collect();
        tweets.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
        Ok(tweets)
    }

    async fn update_tweet_text(
        &self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Tweet>, DatabaseError> {
        let mut data = self.data.write().await;
        Ok(data.tweets.iter_mut().find(|t| t.id == id).map(|tweet| {
            tweet.text = text.to_string();
            tweet.date_updated = updated_at;
            tweet.clone()
        }))
    }

    async fn delete_tweet(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut data = self.data.write().await;
        let before = data.tweets.len();
        data.tweets.retain(|t| t.id != id);
        Ok(data.tweets.len() != before)
    }

    async fn append_reply(&self, parent: Uuid, reply: Uuid) -> Result<bool, DatabaseError> {
        let mut data = self.data.write().await;
        match data.tweets.iter_mut().find(|t| t.id == parent) {
            Some(tweet) => {
                tweet.replies.push(Reply { reply });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError> {
        let mut data = self.data.write().await;
        Ok(match data.tweets.iter_mut().find(|t| t.id == tweet) {
            None => LikeChange::Missing,
            Some(t) => {
                if t.add_like(user) {
                    LikeChange::Applied(t.likes.clone())
                } else {
                    LikeChange::Unchanged
                }
            }
        })
    }

    async fn remove_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError> {
        let mut data = self.data.write().await;
        Ok(match data.tweets.iter_mut().find(|t| t.id == tweet) {
            None => LikeChange::Missing,
            Some(t) => {
                if t.remove_like(user) {
                    LikeChange::Applied(t.likes.clone())
                } else {
                    LikeChange::Unchanged
                }
            }
        })
    }
}
