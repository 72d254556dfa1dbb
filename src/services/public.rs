//! Public (client-facing) API, scoped to one inbox.
//!
//! These endpoints authenticate with the inbox and contact identifiers in
//! the path, not with an access token.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{fetch, path_segment, require_non_empty};
use crate::error::Result;
use crate::transport::{Method, Requester};

/// A contact as seen through the public API. `source_id` is the contact
/// identifier used in later calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicContact {
    #[serde(default)]
    pub id: Option<u64>,
    pub source_id: String,
    #[serde(default)]
    pub pubsub_token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicContactInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicConversation {
    pub id: u64,
    #[serde(default)]
    pub inbox_id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub messages: Vec<PublicMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicMessage {
    pub id: u64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message_type: Option<Value>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

pub struct PublicApi {
    requester: Arc<dyn Requester>,
    inbox_identifier: String,
}

impl PublicApi {
    pub fn new(requester: Arc<dyn Requester>, inbox_identifier: impl Into<String>) -> Self {
        Self {
            requester,
            inbox_identifier: inbox_identifier.into(),
        }
    }

    fn path(&self, suffix: &str) -> Result<String> {
        let inbox = path_segment("inbox_identifier", &self.inbox_identifier)?;
        Ok(format!("/public/api/v1/inboxes/{inbox}{suffix}"))
    }

    fn contact_path(&self, contact: &str, suffix: &str) -> Result<String> {
        let contact = path_segment("contact_identifier", contact)?;
        self.path(&format!("/contacts/{contact}{suffix}"))
    }

    pub async fn create_contact(&self, input: &PublicContactInput) -> Result<PublicContact> {
        let body = serde_json::to_value(input)?;
        fetch(self.requester.as_ref(), Method::POST, &self.path("/contacts")?, Some(&body)).await
    }

    pub async fn get_contact(&self, contact: &str) -> Result<PublicContact> {
        fetch(self.requester.as_ref(), Method::GET, &self.contact_path(contact, "")?, None).await
    }

    pub async fn update_contact(
        &self,
        contact: &str,
        input: &PublicContactInput,
    ) -> Result<PublicContact> {
        let body = serde_json::to_value(input)?;
        fetch(
            self.requester.as_ref(),
            Method::PATCH,
            &self.contact_path(contact, "")?,
            Some(&body),
        )
        .await
    }

    pub async fn create_conversation(&self, contact: &str) -> Result<PublicConversation> {
        fetch(
            self.requester.as_ref(),
            Method::POST,
            &self.contact_path(contact, "/conversations")?,
            Some(&json!({})),
        )
        .await
    }

    pub async fn list_conversations(&self, contact: &str) -> Result<Vec<PublicConversation>> {
        fetch(
            self.requester.as_ref(),
            Method::GET,
            &self.contact_path(contact, "/conversations")?,
            None,
        )
        .await
    }

    pub async fn create_message(
        &self,
        contact: &str,
        conversation_id: u64,
        content: &str,
    ) -> Result<PublicMessage> {
        require_non_empty("content", content)?;
        let path = self.contact_path(
            contact,
            &format!("/conversations/{conversation_id}/messages"),
        )?;
        let body = json!({ "content": content });
        fetch(self.requester.as_ref(), Method::POST, &path, Some(&body)).await
    }

    pub async fn list_messages(
        &self,
        contact: &str,
        conversation_id: u64,
    ) -> Result<Vec<PublicMessage>> {
        let path = self.contact_path(
            contact,
            &format!("/conversations/{conversation_id}/messages"),
        )?;
        fetch(self.requester.as_ref(), Method::GET, &path, None).await
    }
}
