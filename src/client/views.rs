//! Plain-text renderings of store state and API documents.

use super::store::{Alert, AlertType, AuthState, ProfileView};
use crate::database::models::{PopulatedProfile, Social, Tweet};

/// What a private page should do for the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Loading,
    SignIn,
}

pub fn guard(auth: &AuthState) -> Access {
    if auth.is_authenticated {
        Access::Granted
    } else if auth.loading {
        Access::Loading
    } else {
        Access::SignIn
    }
}

fn marker(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Success => "✓",
        AlertType::Danger => "✗",
        AlertType::Info => "•",
    }
}

pub fn render_alerts(alerts: &[Alert]) -> String {
    alerts
        .iter()
        .map(|a| format!("{} {}", marker(a.alert_type), a.msg))
        .collect::<Vec<_>>()
        .join("\n")
}

fn social_lines(social: &Social) -> Vec<String> {
    [
        ("YouTube", &social.youtube),
        ("Facebook", &social.facebook),
        ("LinkedIn", &social.linkedin),
        ("Instagram", &social.instagram),
    ]
    .into_iter()
    .filter_map(|(label, link)| link.as_ref().map(|link| format!("  {}: {}", label, link)))
    .collect()
}

pub fn render_profile(profile: &ProfileView) -> String {
    let mut lines = vec![format!("{} ({})", profile.name, profile.user.id())];
    if let Some(avatar) = profile.user.avatar() {
        lines.push(format!("  Avatar: {}", avatar));
    }
    for (label, value) in [
        ("Bio", &profile.bio),
        ("Location", &profile.location),
        ("Website", &profile.website),
    ] {
        if let Some(value) = value {
            lines.push(format!("  {}: {}", label, value));
        }
    }
    lines.extend(social_lines(&profile.social));
    lines.join("\n")
}

pub fn render_profiles(profiles: &[PopulatedProfile]) -> String {
    if profiles.is_empty() {
        return "No profiles found".to_string();
    }

    profiles
        .iter()
        .map(|p| {
            let location = p.location.as_deref().map(|l| format!(" · {}", l)).unwrap_or_default();
            format!("{}{} ({})", p.name, location, p.user.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_tweet(tweet: &Tweet) -> String {
    let author = tweet.name.as_deref().unwrap_or("(no profile)");
    let mut lines = vec![format!(
        "{} · {} · {}",
        tweet.id,
        author,
        tweet.date_posted.format("%Y-%m-%d %H:%M")
    )];
    if let Some(parent) = tweet.replied_to {
        lines.push(format!("  ↳ reply to {}", parent));
    }
    lines.push(format!("  {}", tweet.text));

    let mut counts = format!("  ♥ {}  ↩ {}", tweet.likes.len(), tweet.replies.len());
    if tweet.date_updated != tweet.date_posted {
        counts.push_str("  (edited)");
    }
    lines.push(counts);
    lines.join("\n")
}

pub fn render_tweets(tweets: &[Tweet]) -> String {
    if tweets.is_empty() {
        return "No tweets yet".to_string();
    }
    tweets.iter().map(render_tweet).collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewTweet, Profile, ProfileFields};
    use uuid::Uuid;

    #[test]
    fn guard_follows_auth_flags() {
        let mut auth = AuthState::default();
        assert_eq!(guard(&auth), Access::Loading);

        auth.loading = false;
        assert_eq!(guard(&auth), Access::SignIn);

        auth.is_authenticated = true;
        assert_eq!(guard(&auth), Access::Granted);
    }

    #[test]
    fn profile_lists_only_present_fields() {
        let profile = Profile::create(
            Uuid::new_v4(),
            ProfileFields {
                name: "Ann".into(),
                location: Some("Leeds".into()),
                social: Social {
                    instagram: Some("ig/ann".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let text = render_profile(&ProfileView::from(profile));

        assert!(text.starts_with("Ann ("));
        assert!(text.contains("Location: Leeds"));
        assert!(text.contains("Instagram: ig/ann"));
        assert!(!text.contains("Bio"));
    }

    #[test]
    fn tweet_without_profile_name() {
        let tweet = Tweet::create(NewTweet {
            user: Uuid::new_v4(),
            name: None,
            avatar: None,
            text: "hello".into(),
            replied_to: None,
        });
        let text = render_tweet(&tweet);

        assert!(text.contains("(no profile)"));
        assert!(text.contains("  hello"));
        assert!(text.ends_with("♥ 0  ↩ 0"));
    }
}
