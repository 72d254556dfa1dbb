//! Conversation state toggles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumIter, EnumString};

use super::{account_path, fetch, Payload};
use crate::error::Result;
use crate::transport::{Method, Requester};

/// Conversation priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
    None,
}

/// Conversation status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConversationStatus {
    Open,
    Resolved,
    Pending,
    Snoozed,
}

/// Result of a status toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusToggle {
    #[serde(default)]
    pub success: bool,
    pub conversation_id: u64,
    pub current_status: String,
}

pub struct Conversations {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl Conversations {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, conversation_id: u64, action: &str) -> String {
        account_path(
            self.account_id,
            &format!("/conversations/{conversation_id}/{action}"),
        )
    }

    /// Set the priority. [`Priority::None`] clears it.
    pub async fn toggle_priority(&self, conversation_id: u64, priority: Priority) -> Result<()> {
        let body = match priority {
            Priority::None => json!({ "priority": null }),
            other => json!({ "priority": other }),
        };
        self.requester
            .request(
                Method::POST,
                &self.path(conversation_id, "toggle_priority"),
                Some(&body),
            )
            .await?;
        Ok(())
    }

    pub async fn toggle_status(
        &self,
        conversation_id: u64,
        status: ConversationStatus,
    ) -> Result<StatusToggle> {
        let body = json!({ "status": status });
        let resp: Payload<StatusToggle> = fetch(
            self.requester.as_ref(),
            Method::POST,
            &self.path(conversation_id, "toggle_status"),
            Some(&body),
        )
        .await?;
        Ok(resp.payload)
    }
}
