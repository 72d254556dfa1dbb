//! Canned responses: saved replies addressed by a short code.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{account_path, fetch, require_non_empty};
use crate::error::Result;
use crate::transport::{Method, Requester};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannedResponse {
    pub id: u64,
    pub short_code: String,
    pub content: String,
    #[serde(default)]
    pub account_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannedResponseInput {
    pub short_code: String,
    pub content: String,
}

pub struct CannedResponses {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl CannedResponses {
    pub fn new(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    fn path(&self, suffix: &str) -> String {
        account_path(self.account_id, &format!("/canned_responses{suffix}"))
    }

    pub async fn list(&self) -> Result<Vec<CannedResponse>> {
        fetch(self.requester.as_ref(), Method::GET, &self.path(""), None).await
    }

    pub async fn create(&self, input: &CannedResponseInput) -> Result<CannedResponse> {
        validate(input)?;
        let body = json!({ "canned_response": input });
        fetch(self.requester.as_ref(), Method::POST, &self.path(""), Some(&body)).await
    }

    pub async fn update(&self, id: u64, input: &CannedResponseInput) -> Result<CannedResponse> {
        validate(input)?;
        let body = json!({ "canned_response": input });
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

fn validate(input: &CannedResponseInput) -> Result<()> {
    require_non_empty("short_code", &input.short_code)?;
    require_non_empty("content", &input.content)
}
