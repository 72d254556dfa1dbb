//! Agents assigned to an inbox.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{account_path, fetch, invalid_field, Payload};
use crate::error::Result;
use crate::transport::{Method, Requester};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub availability_status: Option<String>,
}

pub struct InboxMembers {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl InboxMembers {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        account_path(self.account_id, &format!("/inbox_members{suffix}"))
    }

    pub async fn list(&self, inbox_id: u64) -> Result<Vec<InboxMember>> {
        let resp: Payload<Vec<InboxMember>> = fetch(
            self.requester.as_ref(),
            Method::GET,
            &self.path(&format!("/{inbox_id}")),
            None,
        )
        .await?;
        Ok(resp.payload)
    }

    /// Add agents to the inbox, keeping existing members.
    pub async fn add(&self, inbox_id: u64, user_ids: &[u64]) -> Result<Vec<InboxMember>> {
        self.change(Method::POST, inbox_id, user_ids).await
    }

    /// Replace the inbox's member list with `user_ids`.
    pub async fn update(&self, inbox_id: u64, user_ids: &[u64]) -> Result<Vec<InboxMember>> {
        self.change(Method::PATCH, inbox_id, user_ids).await
    }

    pub async fn remove(&self, inbox_id: u64, user_ids: &[u64]) -> Result<()> {
        ensure_users(user_ids)?;
        let body = json!({ "inbox_id": inbox_id, "user_ids": user_ids });
        self.requester
            .request(Method::DELETE, &self.path(""), Some(&body))
            .await?;
        Ok(())
    }

    async fn change(
        &self,
        method: Method,
        inbox_id: u64,
        user_ids: &[u64],
    ) -> Result<Vec<InboxMember>> {
        ensure_users(user_ids)?;
        let body = json!({ "inbox_id": inbox_id, "user_ids": user_ids });
        let resp: Payload<Vec<InboxMember>> = fetch(
            self.requester.as_ref(),
            method,
            &self.path(""),
            Some(&body),
        )
        .await?;
        Ok(resp.payload)
    }
}

fn ensure_users(user_ids: &[u64]) -> Result<()> {
    if user_ids.is_empty() {
        return Err(invalid_field(
            "user_ids",
            "user_ids must contain at least one agent id".to_string(),
        ));
    }
    Ok(())
}
