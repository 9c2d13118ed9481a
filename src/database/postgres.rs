use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    Like, NewTweet, NewUser, PopulatedProfile, Profile, ProfileFields, Reply, Social, Tweet, User,
    UserSummary,
};
use super::store::{LikeChange, Store};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        avatar TEXT NOT NULL,
        date TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        bio TEXT,
        location TEXT,
        website TEXT,
        youtube TEXT,
        facebook TEXT,
        linkedin TEXT,
        instagram TEXT,
        date TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tweets (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        name TEXT,
        avatar TEXT,
        text TEXT NOT NULL,
        likes UUID[] NOT NULL DEFAULT '{}',
        replied_to UUID,
        replies UUID[] NOT NULL DEFAULT '{}',
        date_posted TIMESTAMPTZ NOT NULL,
        date_updated TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tweets_date_posted_idx ON tweets (date_posted DESC)",
];

const PROFILE_COLUMNS: &str =
    "p.id, p.user_id, p.name, p.bio, p.location, p.website, p.youtube, p.facebook, p.linkedin, p.instagram, p.date";

const TWEET_COLUMNS: &str =
    "id, user_id, name, avatar, text, likes, replied_to, replies, date_posted, date_updated";

const UNIQUE_VIOLATION: &str = "23505";

#[derive(FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    youtube: Option<String>,
    facebook: Option<String>,
    linkedin: Option<String>,
    instagram: Option<String>,
    date: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user: row.user_id,
            name: row.name,
            bio: row.bio,
            location: row.location,
            website: row.website,
            social: Social {
                youtube: row.youtube,
                facebook: row.facebook,
                linkedin: row.linkedin,
                instagram: row.instagram,
            },
            date: row.date,
        }
    }
}

#[derive(FromRow)]
struct PopulatedProfileRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    owner_avatar: String,
    owner_date: DateTime<Utc>,
}

impl From<PopulatedProfileRow> for PopulatedProfile {
    fn from(row: PopulatedProfileRow) -> Self {
        let owner = UserSummary {
            id: row.profile.user_id,
            avatar: row.owner_avatar,
            date: row.owner_date,
        };
        Profile::<Uuid>::from(row.profile).populate(owner)
    }
}

#[derive(FromRow)]
struct TweetRow {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    avatar: Option<String>,
    text: String,
    likes: Vec<Uuid>,
    replied_to: Option<Uuid>,
    replies: Vec<Uuid>,
    date_posted: DateTime<Utc>,
    date_updated: DateTime<Utc>,
}

impl From<TweetRow> for Tweet {
    fn from(row: TweetRow) -> Self {
        Tweet {
            id: row.id,
            user: row.user_id,
            name: row.name,
            avatar: row.avatar,
            text: row.text,
            likes: likes(row.likes),
            replied_to: row.replied_to,
            replies: row.replies.into_iter().map(|reply| Reply { reply }).collect(),
            date_posted: row.date_posted,
            date_updated: row.date_updated,
        }
    }
}

fn likes(users: Vec<Uuid>) -> Vec<Like> {
    users.into_iter().map(|user| Like { user }).collect()
}

/// PostgreSQL-backed store. Likes, replies and profile upserts are single
/// conditional statements, so concurrent duplicates cannot slip through.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn tweet_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM tweets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    fn like_change(&self, updated: Option<(Vec<Uuid>,)>, exists: bool) -> LikeChange {
        match (updated, exists) {
            (Some((users,)), _) => LikeChange::Applied(likes(users)),
            (None, true) => LikeChange::Unchanged,
            (None, false) => LikeChange::Missing,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password, avatar, date) VALUES ($1, $2, $3, $4, now()) \
             RETURNING id, email, password, avatar, date",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(DatabaseError::Conflict(format!("email {} already registered", user.email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT id, email, password, avatar, date FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>("SELECT id, email, password, avatar, date FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let sql = format!("SELECT {} FROM profiles p WHERE p.user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    async fn find_populated_profile(&self, user: Uuid) -> Result<Option<PopulatedProfile>, DatabaseError> {
        let sql = format!(
            "SELECT {}, u.avatar AS owner_avatar, u.date AS owner_date \
             FROM profiles p JOIN users u ON u.id = p.user_id WHERE p.user_id = $1",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, PopulatedProfileRow>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PopulatedProfile::from))
    }

    async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>, DatabaseError> {
        let sql = format!(
            "SELECT {}, u.avatar AS owner_avatar, u.date AS owner_date \
             FROM profiles p JOIN users u ON u.id = p.user_id ORDER BY p.date, p.id",
            PROFILE_COLUMNS
        );
        let rows = sqlx::query_as::<_, PopulatedProfileRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PopulatedProfile::from).collect())
    }

    async fn upsert_profile(&self, user: Uuid, fields: ProfileFields) -> Result<Profile, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles AS p
                (id, user_id, name, bio, location, website, youtube, facebook, linkedin, instagram, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                website = EXCLUDED.website,
                youtube = EXCLUDED.youtube,
                facebook = EXCLUDED.facebook,
                linkedin = EXCLUDED.linkedin,
                instagram = EXCLUDED.instagram
            RETURNING p.id, p.user_id, p.name, p.bio, p.location, p.website,
                      p.youtube, p.facebook, p.linkedin, p.instagram, p.date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user)
        .bind(&fields.name)
        .bind(&fields.bio)
        .bind(&fields.location)
        .bind(&fields.website)
        .bind(&fields.social.youtube)
        .bind(&fields.social.facebook)
        .bind(&fields.social.linkedin)
        .bind(&fields.social.instagram)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_profile(&self, user: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_tweet(&self, tweet: NewTweet) -> Result<Tweet, DatabaseError> {
        let tweet = Tweet::create(tweet);
        sqlx::query(
            "INSERT INTO tweets (id, user_id, name, avatar, text, replied_to, date_posted, date_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(tweet.id)
        .bind(tweet.user)
        .bind(&tweet.name)
        .bind(&tweet.avatar)
        .bind(&tweet.text)
        .bind(tweet.replied_to)
        .bind(tweet.date_posted)
        .bind(tweet.date_updated)
        .execute(&self.pool)
        .await?;

        Ok(tweet)
    }

    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>, DatabaseError> {
        let sql = format!("SELECT {} FROM tweets WHERE id = $1", TWEET_COLUMNS);
        let row = sqlx::query_as::<_, TweetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Tweet::from))
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, DatabaseError> {
        let sql = format!("SELECT {} FROM tweets ORDER BY date_posted DESC", TWEET_COLUMNS);
        let rows = sqlx::query_as::<_, TweetRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Tweet::from).collect())
    }

    async fn update_tweet_text(
        &self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Tweet>, DatabaseError> {
        let sql = format!(
            "UPDATE tweets SET text = $2, date_updated = $3 WHERE id = $1 RETURNING {}",
            TWEET_COLUMNS
        );
        let row = sqlx::query_as::<_, TweetRow>(&sql)
            .bind(id)
            .bind(text)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Tweet::from))
    }

    async fn delete_tweet(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_reply(&self, parent: Uuid, reply: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE tweets SET replies = array_append(replies, $2) WHERE id = $1")
            .bind(parent)
            .bind(reply)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError> {
        let updated: Option<(Vec<Uuid>,)> = sqlx::query_as(
            "UPDATE tweets SET likes = array_prepend($2, likes) \
             WHERE id = $1 AND NOT ($2 = ANY(likes)) RETURNING likes",
        )
        .bind(tweet)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        let exists = updated.is_some() || self.tweet_exists(tweet).await?;
        Ok(self.like_change(updated, exists))
    }

    async fn remove_like(&self, tweet: Uuid, user: Uuid) -> Result<LikeChange, DatabaseError> {
        let updated: Option<(Vec<Uuid>,)> = sqlx::query_as(
            "UPDATE tweets SET likes = array_remove(likes, $2) \
             WHERE id = $1 AND $2 = ANY(likes) RETURNING likes",
        )
        .bind(tweet)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        let exists = updated.is_some() || self.tweet_exists(tweet).await?;
        Ok(self.like_change(updated, exists))
    }
}
