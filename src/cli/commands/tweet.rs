use clap::Subcommand;
use serde_json::json;

use crate::cli::config::Session;
use crate::cli::frontend::Frontend;
use crate::cli::utils::{output_document, output_success};
use crate::cli::OutputFormat;
use crate::client::views::{render_tweet, render_tweets};

#[derive(Subcommand)]
pub enum TweetCommands {
    #[command(about = "Post a tweet")]
    Post {
        #[arg(help = "Tweet text")]
        text: String,
    },

    #[command(about = "Reply to a tweet")]
    Reply {
        #[arg(help = "Tweet ID to reply to")]
        id: String,
        #[arg(help = "Reply text")]
        text: String,
    },

    #[command(about = "List tweets, newest first")]
    List,

    #[command(about = "Show one tweet")]
    Show {
        #[arg(help = "Tweet ID")]
        id: String,
    },

    #[command(about = "Replace the text of your tweet")]
    Edit {
        #[arg(help = "Tweet ID")]
        id: String,
        #[arg(help = "New text")]
        text: String,
    },

    #[command(about = "Delete your tweet")]
    Delete {
        #[arg(help = "Tweet ID")]
        id: String,
    },

    #[command(about = "Like a tweet")]
    Like {
        #[arg(help = "Tweet ID")]
        id: String,
    },

    #[command(about = "Withdraw your like")]
    Unlike {
        #[arg(help = "Tweet ID")]
        id: String,
    },
}

pub async fn handle(cmd: TweetCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    // Every tweet route is protected
    Frontend::new(session).require_user().await?;
    let client = session.client();

    match cmd {
        TweetCommands::Post { text } => {
            let tweet = client.post_tweet(&text).await?;
            output_document(output_format, &tweet, render_tweet(&tweet))
        }
        TweetCommands::Reply { id, text } => {
            let tweet = client.reply(&id, &text).await?;
            output_document(output_format, &tweet, render_tweet(&tweet))
        }
        TweetCommands::List => {
            let tweets = client.tweets().await?;
            output_document(output_format, &tweets, render_tweets(&tweets))
        }
        TweetCommands::Show { id } => {
            let tweet = client.tweet(&id).await?;
            output_document(output_format, &tweet, render_tweet(&tweet))
        }
        TweetCommands::Edit { id, text } => {
            let tweet = client.edit_tweet(&id, &text).await?;
            output_document(output_format, &tweet, render_tweet(&tweet))
        }
        TweetCommands::Delete { id } => {
            let res = client.delete_tweet(&id).await?;
            output_success(output_format, &res.msg, Some(json!({ "id": id })))
        }
        TweetCommands::Like { id } => {
            let likes = client.like(&id).await?;
            output_success(output_format, &format!("Liked ({} likes)", likes.len()), Some(json!({ "likes": likes })))
        }
        TweetCommands::Unlike { id } => {
            let likes = client.unlike(&id).await?;
            output_success(
                output_format,
                &format!("Unliked ({} likes)", likes.len()),
                Some(json!({ "likes": likes })),
            )
        }
    }
}
