//! Automation rules: event-triggered conditions and actions.

use std::sync::Arc;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use super::{account_path, fetch, require_non_empty, Payload};
use crate::error::Result;
use crate::transport::{Method, Requester};

/// Events an automation rule can listen for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AutomationEvent {
    ConversationCreated,
    ConversationUpdated,
    MessageCreated,
    ConversationOpened,
}

/// A stored rule. `event_name` stays a string so rules created with newer
/// event types still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub conditions: Vec<Value>,
    #[serde(default)]
    pub actions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct AutomationRuleInput {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_name: AutomationEvent,
    #[builder(default = true)]
    pub active: bool,
    #[builder(default)]
    pub conditions: Vec<Value>,
    #[builder(default)]
    pub actions: Vec<Value>,
}

pub struct AutomationRules {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl AutomationRules {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        account_path(self.account_id, &format!("/automation_rules{suffix}"))
    }

    pub async fn list(&self) -> Result<Vec<AutomationRule>> {
        let resp: Payload<Vec<AutomationRule>> = fetch(
            self.requester.as_ref(),
            Method::GET,
            &self.path(""),
            None,
        )
        .await?;
        Ok(resp.payload)
    }

    pub async fn get(&self, id: u64) -> Result<AutomationRule> {
        let resp: Payload<AutomationRule> = fetch(
            self.requester.as_ref(),
            Method::GET,
            &self.path(&format!("/{id}")),
            None,
        )
        .await?;
        Ok(resp.payload)
    }

    pub async fn create(&self, input: &AutomationRuleInput) -> Result<AutomationRule> {
        require_non_empty("name", &input.name)?;
        let body = serde_json::to_value(input)?;
        let resp: Payload<AutomationRule> = fetch(
            self.requester.as_ref(),
            Method::POST,
            &self.path(""),
            Some(&body),
        )
        .await?;
        Ok(resp.payload)
    }

    pub async fn update(&self, id: u64, input: &AutomationRuleInput) -> Result<AutomationRule> {
        require_non_empty("name", &input.name)?;
        let body = serde_json::to_value(input)?;
        let resp: Payload<AutomationRule> = fetch(
            self.requester.as_ref(),
            Method::PATCH,
            &self.path(&format!("/{id}")),
            Some(&body),
        )
        .await?;
        Ok(resp.payload)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.requester
            .request(Method::DELETE, &self.path(&format!("/{id}")), None)
            .await?;
        Ok(())
    }
}
