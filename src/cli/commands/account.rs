use clap::Subcommand;

use crate::cli::config::{save_session, Session};
use crate::cli::frontend::{profile_error, Frontend};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::actions::ACCOUNT_DELETED;

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "Permanently delete the account and its profile")]
    Delete {
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

pub async fn handle(cmd: AccountCommands, session: &mut Session, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccountCommands::Delete { yes } => {
            if !yes {
                anyhow::bail!("This can not be undone. Re-run with --yes to confirm");
            }
            let frontend = Frontend::new(session);
            frontend.require_user().await?;

            frontend.actions().delete_account().await;
            let state = frontend.state().await;
            if state.auth.is_authenticated {
                return Err(profile_error(state.profile.error.as_ref()));
            }

            session.sign_out();
            save_session(session)?;
            output_success(output_format, ACCOUNT_DELETED, None)
        }
    }
}
