//! Account-level agent bots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{account_path, fetch, require_non_empty};
use crate::error::Result;
use crate::transport::{Method, Requester};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentBot {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub outgoing_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentBotInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing_url: Option<String>,
}

pub struct AgentBots {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl AgentBots {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        account_path(self.account_id, &format!("/agent_bots{suffix}"))
    }

    pub async fn list(&self) -> Result<Vec<AgentBot>> {
        fetch(self.requester.as_ref(), Method::GET, &self.path(""), None).await
    }

    pub async fn get(&self, id: u64) -> Result<AgentBot> {
        fetch(self.requester.as_ref(), Method::GET, &self.path(&format!("/{id}")), None).await
    }

    pub async fn create(&self, input: &AgentBotInput) -> Result<AgentBot> {
        require_non_empty("name", &input.name)?;
        let body = serde_json::to_value(input)?;
        fetch(self.requester.as_ref(), Method::POST, &self.path(""), Some(&body)).await
    }

    pub async fn update(&self, id: u64, input: &AgentBotInput) -> Result<AgentBot> {
        require_non_empty("name", &input.name)?;
        let body = serde_json::to_value(input)?;
        fetch(
            self.requester.as_ref(),
            Method::PATCH,
            &self.path(&format!("/{id}")),
            Some(&body),
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.requester
            .request(Method::DELETE, &self.path(&format!("/{id}")), None)
            .await?;
        Ok(())
    }
}
