use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub msg: String,
    pub alert_type: AlertType,
}

/// Alerts in the order they were raised.
pub fn reduce(state: &[Alert], action: &Action) -> Vec<Alert> {
    match action {
        Action::SetAlert(alert) => {
            let mut next = state.to_vec();
            next.push(alert.clone());
            next
        }
        Action::RemoveAlert(id) => state.iter().filter(|a| a.id != *id).cloned().collect(),
        _ => state.to_vec(),
    }
}
