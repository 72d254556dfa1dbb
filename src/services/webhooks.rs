//! Account webhooks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumIter, EnumString};

use super::{account_path, fetch, invalid_field, require_non_empty, Payload};
use crate::error::Result;
use crate::transport::{Method, Requester};

/// Events a webhook can subscribe to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WebhookEvent {
    ConversationCreated,
    ConversationStatusChanged,
    ConversationUpdated,
    MessageCreated,
    MessageUpdated,
    WebwidgetTriggered,
    ContactCreated,
    ContactUpdated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookInput {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub subscriptions: Vec<WebhookEvent>,
}

#[derive(Deserialize)]
struct WebhookList {
    webhooks: Vec<Webhook>,
}

#[derive(Deserialize)]
struct WebhookOne {
    webhook: Webhook,
}

pub struct Webhooks {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl Webhooks {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        account_path(self.account_id, &format!("/webhooks{suffix}"))
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        let resp: Payload<WebhookList> = fetch(
            self.requester.as_ref(),
            Method::GET,
            &self.path(""),
            None,
        )
        .await?;
        Ok(resp.payload.webhooks)
    }

    pub async fn create(&self, input: &WebhookInput) -> Result<Webhook> {
        validate(input)?;
        let body = json!({ "webhook": input });
        let resp: Payload<WebhookOne> = fetch(
            self.requester.as_ref(),
            Method::POST,
            &self.path(""),
            Some(&body),
        )
        .await?;
        Ok(resp.payload.webhook)
    }

    pub async fn update(&self, id: u64, input: &WebhookInput) -> Result<Webhook> {
        validate(input)?;
        let body = json!({ "webhook": input });
        let resp: Payload<WebhookOne> = fetch(
            self.requester.as_ref(),
            Method::PATCH,
            &self.path(&format!("/{id}")),
            Some(&body),
        )
        .await?;
        Ok(resp.payload.webhook)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.requester
            .request(Method::DELETE, &self.path(&format!("/{id}")), None)
            .await?;
        Ok(())
    }
}

fn validate(input: &WebhookInput) -> Result<()> {
    require_non_empty("url", &input.url)?;
    if !(input.url.starts_with("https://") || input.url.starts_with("http://")) {
        return Err(invalid_field(
            "url",
            format!("invalid url \"{}\": must start with http:// or https://", input.url),
        ));
    }
    if input.subscriptions.is_empty() {
        return Err(invalid_field(
            "subscriptions",
            "subscriptions must name at least one event".to_string(),
        ));
    }
    Ok(())
}
