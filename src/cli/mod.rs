pub mod commands;
pub mod config;
pub mod frontend;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "twit")]
#[command(about = "twit - Command-line client for the TwitterClone API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL for this invocation (overrides the saved session)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create an account and start a session")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from TWIT_PASSWORD if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Start a session")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from TWIT_PASSWORD if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved token")]
    Logout,

    #[command(about = "Show the signed-in account")]
    Whoami,

    #[command(about = "Account management")]
    Account {
        #[command(subcommand)]
        cmd: commands::account::AccountCommands,
    },

    #[command(about = "Profiles")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Tweets")]
    Tweet {
        #[command(subcommand)]
        cmd: commands::tweet::TweetCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut session = config::load_session()?;
    if let Some(server) = cli.server {
        session.server_url = server;
    }

    match cli.command {
        Commands::Register { email, password } => {
            commands::auth::register(&mut session, email, password, output_format).await
        }
        Commands::Login { email, password } => {
            commands::auth::login(&mut session, email, password, output_format).await
        }
        Commands::Logout => commands::auth::logout(&mut session, output_format).await,
        Commands::Whoami => commands::auth::whoami(&session, output_format).await,
        Commands::Account { cmd } => commands::account::handle(cmd, &mut session, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &session, output_format).await,
        Commands::Tweet { cmd } => commands::tweet::handle(cmd, &session, output_format).await,
    }
}
