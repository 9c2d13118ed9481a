use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Saved CLI session: which server to talk to and the token issued by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server_url: String,
    pub token: Option<String>,
    pub email: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            email: None,
            signed_in_at: None,
        }
    }
}

impl Session {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.server_url).with_token(self.token.clone())
    }

    pub fn sign_in(&mut self, email: String, token: String) {
        self.email = Some(email);
        self.token = Some(token);
        self.signed_in_at = Some(Utc::now());
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.email = None;
        self.signed_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TWIT_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("twit")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

const SESSION_FILE: &str = "session.json";

pub fn load_session() -> anyhow::Result<Session> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

pub fn load_session_from(dir: &Path) -> anyhow::Result<Session> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let content = serde_json::to_string_pretty(session)?;
    fs::write(dir.join(SESSION_FILE), content)?;
    Ok(())
}
