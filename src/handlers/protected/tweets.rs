// handlers/protected/tweets.rs - /api/tweets handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::load_caller;
use crate::database::models::{Like, NewTweet, Tweet};
use crate::database::LikeChange;
use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_id;
use crate::middleware::{AuthUser, JsonBody};
use crate::server::AppState;
use crate::validation::TweetRequest;

pub const TWEET_NOT_FOUND: &str = "Tweet not found";
pub const NOT_AUTHOR_EDIT: &str = "You are not authorised to edit this tweet";
pub const NOT_AUTHOR_DELETE: &str = "You are not authorised to delete this tweet";
pub const ALREADY_LIKED: &str = "Tweet has already been liked";
pub const NOT_LIKED: &str = "Tweet has not yet been liked";

fn tweet_not_found() -> ApiError {
    ApiError::not_found(TWEET_NOT_FOUND)
}

fn tweet_id(raw: &str) -> ApiResult<Uuid> {
    parse_id(raw, tweet_not_found)
}

async fn load_tweet(state: &AppState, id: Uuid) -> ApiResult<Tweet> {
    state.store.find_tweet(id).await?.ok_or_else(tweet_not_found)
}

/// Text plus the author snapshot: profile name (if any) and account
/// avatar at posting time.
async fn compose(
    state: &AppState,
    caller: AuthUser,
    req: TweetRequest,
    replied_to: Option<Uuid>,
) -> ApiResult<NewTweet> {
    let user = load_caller(state, caller).await?;
    let profile = state.store.find_profile(user.id).await?;

    Ok(NewTweet {
        user: user.id,
        name: profile.map(|p| p.name),
        avatar: Some(user.avatar),
        text: req.text.unwrap_or_default(),
        replied_to,
    })
}

/// POST /api/tweets - Post a tweet
///
/// Expected Input:
/// ```json
/// { "text": "hello" }
/// ```
pub async fn create_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    JsonBody(req): JsonBody<TweetRequest>,
) -> ApiResult<Json<Tweet>> {
    req.validate().map_err(ApiError::validation)?;

    let new_tweet = compose(&state, caller, req, None).await?;
    let tweet = state.store.insert_tweet(new_tweet).await?;

    info!("User {} posted tweet {}", tweet.user, tweet.id);
    Ok(Json(tweet))
}

/// POST /api/tweets/reply/:id - Reply to a tweet
///
/// The reply is inserted first, then linked into the parent's `replies`.
/// The two writes are independent; a parent deleted in between leaves the
/// reply unlinked.
pub async fn reply_to_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(parent_id): Path<String>,
    JsonBody(req): JsonBody<TweetRequest>,
) -> ApiResult<Json<Tweet>> {
    req.validate().map_err(ApiError::validation)?;
    let parent = load_tweet(&state, tweet_id(&parent_id)?).await?;

    let new_tweet = compose(&state, caller, req, Some(parent.id)).await?;
    let reply = state.store.insert_tweet(new_tweet).await?;

    if !state.store.append_reply(parent.id, reply.id).await? {
        warn!("Parent tweet {} vanished before reply {} was linked", parent.id, reply.id);
    }

    Ok(Json(reply))
}

/// GET /api/tweets - All tweets, newest first
pub async fn list_tweets(State(state): State<AppState>) -> ApiResult<Json<Vec<Tweet>>> {
    Ok(Json(state.store.list_tweets().await?))
}

/// GET /api/tweets/:id
pub async fn get_tweet(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Tweet>> {
    Ok(Json(load_tweet(&state, tweet_id(&id)?).await?))
}

/// PUT /api/tweets/:id - Replace the text of the caller's tweet
pub async fn update_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<TweetRequest>,
) -> ApiResult<Json<Tweet>> {
    req.validate().map_err(ApiError::validation)?;

    let tweet = load_tweet(&state, tweet_id(&id)?).await?;
    if tweet.user != caller.id {
        return Err(ApiError::forbidden(NOT_AUTHOR_EDIT));
    }

    let text = req.text.unwrap_or_default();
    state
        .store
        .update_tweet_text(tweet.id, &text, Utc::now())
        .await?
        .map(Json)
        .ok_or_else(tweet_not_found)
}

/// DELETE /api/tweets/:id - Delete the caller's tweet
pub async fn delete_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let tweet = load_tweet(&state, tweet_id(&id)?).await?;
    if tweet.user != caller.id {
        return Err(ApiError::forbidden(NOT_AUTHOR_DELETE));
    }

    if !state.store.delete_tweet(tweet.id).await? {
        return Err(tweet_not_found());
    }

    info!("User {} deleted tweet {}", caller.id, tweet.id);
    Ok(Json(json!({ "msg": "Tweet removed" })))
}

/// PUT /api/tweets/like/:id - Like a tweet; returns the resulting likes
pub async fn like_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Like>>> {
    match state.store.add_like(tweet_id(&id)?, caller.id).await? {
        LikeChange::Applied(likes) => Ok(Json(likes)),
        LikeChange::Unchanged => Err(ApiError::bad_request(ALREADY_LIKED)),
        LikeChange::Missing => Err(tweet_not_found()),
    }
}

/// PUT /api/tweets/unlike/:id - Withdraw the caller's like
pub async fn unlike_tweet(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Like>>> {
    match state.store.remove_like(tweet_id(&id)?, caller.id).await? {
        LikeChange::Applied(likes) => Ok(Json(likes)),
        LikeChange::Unchanged => Err(ApiError::bad_request(NOT_LIKED)),
        LikeChange::Missing => Err(tweet_not_found()),
    }
}
