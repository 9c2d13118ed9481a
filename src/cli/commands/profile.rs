use clap::{Args, Subcommand};

use crate::cli::config::Session;
use crate::cli::frontend::{alerts_error, profile_error, Frontend};
use crate::cli::utils::output_document;
use crate::cli::OutputFormat;
use crate::client::views::{render_alerts, render_profile, render_profiles};
use crate::client::RootState;
use crate::validation::ProfileRequest;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Me,

    #[command(about = "Show a user's profile")]
    Show {
        #[arg(help = "User ID")]
        user: String,
    },

    #[command(about = "List all profiles")]
    List,

    #[command(about = "Create or replace your profile (omitted fields are cleared)")]
    Set(ProfileArgs),
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub youtube: Option<String>,
    #[arg(long)]
    pub facebook: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    #[arg(long)]
    pub instagram: Option<String>,
}

impl From<ProfileArgs> for ProfileRequest {
    fn from(args: ProfileArgs) -> Self {
        ProfileRequest {
            name: Some(args.name),
            bio: args.bio,
            location: args.location,
            website: args.website,
            youtube: args.youtube,
            facebook: args.facebook,
            linkedin: args.linkedin,
            instagram: args.instagram,
        }
    }
}

pub async fn handle(cmd: ProfileCommands, session: &Session, output_format: OutputFormat) -> anyhow::Result<()> {
    let frontend = Frontend::new(session);
    let actions = frontend.actions();

    match cmd {
        ProfileCommands::Me => {
            frontend.require_user().await?;
            actions.get_current_profile().await;
            output_profile(&frontend.state().await, output_format)
        }
        ProfileCommands::Show { user } => {
            actions.get_profile_by_id(&user).await;
            output_profile(&frontend.state().await, output_format)
        }
        ProfileCommands::List => {
            actions.get_profiles().await;
            let state = frontend.state().await;
            if let Some(error) = &state.profile.error {
                return Err(profile_error(Some(error)));
            }
            let profiles = &state.profile.profiles;
            output_document(output_format, profiles, render_profiles(profiles))
        }
        ProfileCommands::Set(args) => {
            frontend.require_user().await?;
            actions.get_current_profile().await;
            let edit = frontend.state().await.profile.profile.is_some();

            if !actions.create_profile(&ProfileRequest::from(args), edit).await {
                return Err(alerts_error(&frontend.state().await, "Profile not saved"));
            }

            let state = frontend.state().await;
            let profile = state.profile.profile.as_ref().ok_or_else(|| profile_error(None))?;
            let text = format!("{}\n{}", render_alerts(&state.alerts), render_profile(profile));
            output_document(output_format, profile, text)
        }
    }
}

fn output_profile(state: &RootState, output_format: OutputFormat) -> anyhow::Result<()> {
    match &state.profile.profile {
        Some(profile) => output_document(output_format, profile, render_profile(profile)),
        None => Err(profile_error(state.profile.error.as_ref())),
    }
}
