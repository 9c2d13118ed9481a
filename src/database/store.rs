use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Like, NewTweet, NewUser, PopulatedProfile, Profile, ProfileFields, Tweet, User};

/// Result of a conditional like/unlike.
#[derive(Debug, Clone, PartialEq)]
pub enum LikeChange {
    /// The update was applied; holds the resulting like list.
    Applied(Vec<Like>),
    /// The caller already liked (like) or had not liked (unlike) the tweet.
    Unchanged,
    Missing,
}

/// Persistence contract for users, profiles and tweets.
///
/// Every method is a single atomic operation on one document (or one
/// uniqueness-checked insert); handlers compose them without transactions.
#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, DatabaseError>;
    async fn find_populated_profile(&self, user: Uuid) -> Result<Option<PopulatedProfile>, DatabaseError>;
    async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>, DatabaseError>;
    /// Create-if-absent, else full replace of the mutable fields.
    async fn upsert_profile(&self, user: Uuid, fields: ProfileFields) -> Result<Profile, DatabaseError>;
    async fn delete_profile(&self, user: Uuid) -> Result<bool, DatabaseError>;

    async fn insert_tweet(&self, tweet: NewTweet) -> Result<Tweet, DatabaseError>;
    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, DatabaseError>;
    /// Newest `datePosted` first.
    async fn list_tweets(&self) -> Result<Vec<Tweet>, DatabaseError>;
    async fn update_tweet_text(
        &self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Tweet>, DatabaseError>;
    async fn delete_tweet(&self, id: Uuid) -> Result<bool, DatabaseError>;
    /// Appends `{reply}` to the parent's replies; `false` if the parent is gone.
    async fn append_reply(&self, parent: Uuid, reply: Uuid) -> Result<bool, DatabaseError>;
    async fn add_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError>;
    async fn remove_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError>;
}
