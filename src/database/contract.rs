//! Behaviour every [`Store`] backend must share. Each check creates its own
//! users and tweets so it can run against a database that already holds data.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Like, NewTweet, NewUser, ProfileFields, Social, User};
use super::store::{LikeChange, Store};

pub async fn user(store: &dyn Store) -> User {
    store
        .insert_user(NewUser {
            email: format!("{}@x.com", Uuid::new_v4()),
            password: "hash".to_string(),
            avatar: "//avatar".to_string(),
        })
        .await
        .unwrap()
}

pub fn new_tweet(user: Uuid, text: &str) -> NewTweet {
    NewTweet {
        user,
        name: None,
        avatar: None,
        text: text.to_string(),
        replied_to: None,
    }
}

fn named(name: &str) -> ProfileFields {
    ProfileFields {
        name: name.to_string(),
        ..Default::default()
    }
}

pub async fn duplicate_email_conflicts(store: Arc<dyn Store>) {
    let existing = user(store.as_ref()).await;

    let err = store
        .insert_user(NewUser {
            email: existing.email.clone(),
            password: "h".into(),
            avatar: "a".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));

    let found = store.find_user_by_email(&existing.email).await.unwrap().unwrap();
    assert_eq!(found.id, existing.id);
}

pub async fn likes_are_conditional(store: Arc<dyn Store>) {
    let author = user(store.as_ref()).await;
    let tweet = store.insert_tweet(new_tweet(author.id, "hi")).await.unwrap();
    let fan = Uuid::new_v4();

    let first = store.add_like(tweet.id, author.id).await.unwrap();
    assert_eq!(first, LikeChange::Applied(vec![Like { user: author.id }]));
    assert_eq!(store.add_like(tweet.id, author.id).await.unwrap(), LikeChange::Unchanged);

    // Newest like first
    assert_eq!(
        store.add_like(tweet.id, fan).await.unwrap(),
        LikeChange::Applied(vec![Like { user: fan }, Like { user: author.id }])
    );

    assert_eq!(
        store.remove_like(tweet.id, fan).await.unwrap(),
        LikeChange::Applied(vec![Like { user: author.id }])
    );
    assert_eq!(store.remove_like(tweet.id, fan).await.unwrap(), LikeChange::Unchanged);

    let gone = Uuid::new_v4();
    assert_eq!(store.add_like(gone, fan).await.unwrap(), LikeChange::Missing);
    assert_eq!(store.remove_like(gone, fan).await.unwrap(), LikeChange::Missing);
}

pub async fn concurrent_likes_from_one_user_apply_once(store: Arc<dyn Store>) {
    let author = user(store.as_ref()).await;
    let tweet = store.insert_tweet(new_tweet(author.id, "hi")).await.unwrap().id;
    let liker = Uuid::new_v4();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_like(tweet, liker).await.unwrap() })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        if let LikeChange::Applied(_) = handle.await.unwrap() {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(store.find_tweet(tweet).await.unwrap().unwrap().likes.len(), 1);
}

pub async fn upsert_keeps_identity_and_replaces_fields(store: Arc<dyn Store>) {
    let owner = user(store.as_ref()).await;
    let created = store
        .upsert_profile(
            owner.id,
            ProfileFields {
                name: "A".into(),
                bio: Some("first".into()),
                social: Social {
                    youtube: Some("yt/a".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = store.upsert_profile(owner.id, named("A2")).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.date, created.date);
    assert_eq!(updated.name, "A2");
    assert_eq!(updated.bio, None);
    assert_eq!(updated.social, Social::default());

    let populated = store.find_populated_profile(owner.id).await.unwrap().unwrap();
    assert_eq!(populated.user.id, owner.id);
    assert_eq!(populated.user.avatar, owner.avatar);
}

pub async fn concurrent_upserts_leave_one_profile(store: Arc<dyn Store>) {
    let owner = user(store.as_ref()).await.id;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.upsert_profile(owner, named(&format!("A{}", i))).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);

    let mine = store
        .list_profiles()
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.user.id == owner)
        .count();
    assert_eq!(mine, 1);
}

pub async fn deleting_user_removes_profile(store: Arc<dyn Store>) {
    let owner = user(store.as_ref()).await;
    store.upsert_profile(owner.id, named("A")).await.unwrap();

    assert!(store.delete_user(owner.id).await.unwrap());
    assert!(store.find_profile(owner.id).await.unwrap().is_none());
    assert!(store.find_user(owner.id).await.unwrap().is_none());
    assert!(!store.delete_user(owner.id).await.unwrap());
}

pub async fn tweets_list_newest_first(store: Arc<dyn Store>) {
    let author = Uuid::new_v4();
    let first = store.insert_tweet(new_tweet(author, "one")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = store.insert_tweet(new_tweet(author, "two")).await.unwrap();

    let ids: Vec<Uuid> = store
        .list_tweets()
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .filter(|id| *id == first.id || *id == second.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

pub async fn edit_reply_and_delete(store: Arc<dyn Store>) {
    let author = Uuid::new_v4();
    let parent = store.insert_tweet(new_tweet(author, "parent")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;

    let edited = store
        .update_tweet_text(parent.id, "edited", Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.text, "edited");
    assert!(edited.date_updated > edited.date_posted);
    assert!(store
        .update_tweet_text(Uuid::new_v4(), "x", Utc::now())
        .await
        .unwrap()
        .is_none());

    let reply = Uuid::new_v4();
    assert!(store.append_reply(parent.id, reply).await.unwrap());
    assert!(!store.append_reply(Uuid::new_v4(), reply).await.unwrap());
    let fetched = store.find_tweet(parent.id).await.unwrap().unwrap();
    assert_eq!(fetched.replies.len(), 1);
    assert_eq!(fetched.replies[0].reply, reply);

    assert!(store.delete_tweet(parent.id).await.unwrap());
    assert!(store.find_tweet(parent.id).await.unwrap().is_none());
    assert!(!store.delete_tweet(parent.id).await.unwrap());
}
