//! Entry point tying a requester to an account.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    AgentBots, AutomationRules, CannedResponses, Conversations, InboxMembers, PublicApi, Reports,
    Webhooks,
};
use crate::transport::{HttpRequester, Requester};

/// Account-scoped API client.
///
/// ```no_run
/// # async fn example() -> supportdesk::error::Result<()> {
/// let config = supportdesk::config::Config::load(None)?;
/// let client = supportdesk::Client::new(&config)?;
/// for reply in client.canned_responses().list().await? {
///     println!("{}: {}", reply.short_code, reply.content);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    requester: Arc<dyn Requester>,
    account_id: u64,
}

impl Client {
    /// Build an HTTP client. Fails before any request when the token or
    /// account id is missing.
    pub fn new(config: &Config) -> Result<Self> {
        config.require_token()?;
        let account_id = config.require_account_id()?;
        let requester = HttpRequester::new(config)?;
        Ok(Self::with_requester(Arc::new(requester), account_id))
    }

    pub fn with_requester(requester: Arc<dyn Requester>, account_id: u64) -> Self {
        Self {
            requester,
            account_id,
        }
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    pub fn canned_responses(&self) -> CannedResponses {
        CannedResponses::new(self.requester.clone(), self.account_id)
    }

    pub fn automation_rules(&self) -> AutomationRules {
        AutomationRules::new(self.requester.clone(), self.account_id)
    }

    pub fn webhooks(&self) -> Webhooks {
        Webhooks::new(self.requester.clone(), self.account_id)
    }

    pub fn inbox_members(&self) -> InboxMembers {
        InboxMembers::new(self.requester.clone(), self.account_id)
    }

    pub fn agent_bots(&self) -> AgentBots {
        AgentBots::new(self.requester.clone(), self.account_id)
    }

    pub fn conversations(&self) -> Conversations {
        Conversations::new(self.requester.clone(), self.account_id)
    }

    pub fn reports(&self) -> Reports {
        Reports::new(self.requester.clone(), self.account_id)
    }
}

/// Public API client for one inbox. Needs neither a token nor an account id.
///
/// Any configured account token is dropped so it never reaches the public
/// endpoints.
pub fn public_client(config: &Config, inbox_identifier: impl Into<String>) -> Result<PublicApi> {
    let requester = HttpRequester::new(&config.clone().without_api_token())?;
    Ok(PublicApi::new(Arc::new(requester), inbox_identifier))
}
