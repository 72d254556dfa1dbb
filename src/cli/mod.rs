//! CLI entry point for supportdesk.

pub mod auth;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// supportdesk CLI
#[derive(Parser, Debug)]
#[command(name = "supportdesk", version, about = "supportdesk: customer-support API CLI")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and output flags accepted before any subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL (overrides SUPPORTDESK_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API access token (overrides SUPPORTDESK_API_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Account id (overrides SUPPORTDESK_ACCOUNT_ID and the config file)
    #[arg(long, global = true)]
    pub account_id: Option<u64>,

    /// Config file (default: ~/.supportdesk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store or clear credentials
    Auth(AuthArgs),
    /// Saved reply templates
    #[command(subcommand)]
    CannedResponses(CannedResponseCommands),
    /// Event-driven automation rules
    #[command(subcommand)]
    AutomationRules(AutomationRuleCommands),
    /// Outgoing webhooks
    #[command(subcommand)]
    Webhooks(WebhookCommands),
    /// Agents assigned to inboxes
    #[command(subcommand)]
    InboxMembers(InboxMemberCommands),
    /// Account agent bots
    #[command(subcommand)]
    AgentBots(AgentBotCommands),
    /// Conversation priority and status
    #[command(subcommand)]
    Conversations(ConversationCommands),
    /// Account reports
    #[command(subcommand)]
    Reports(ReportCommands),
    /// Public inbox API (no token needed)
    Public(PublicArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Save the global --token/--base-url/--account-id to the config file
    Login,
    /// Show the resolved configuration
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum CannedResponseCommands {
    List,
    Create(CannedResponseArgs),
    Update {
        id: u64,
        #[command(flatten)]
        args: CannedResponseArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct CannedResponseArgs {
    #[arg(long)]
    pub short_code: String,
    #[arg(long)]
    pub content: String,
}

#[derive(Subcommand, Debug)]
pub enum AutomationRuleCommands {
    List,
    Get {
        id: u64,
    },
    Create(AutomationRuleArgs),
    Update {
        id: u64,
        #[command(flatten)]
        args: AutomationRuleArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct AutomationRuleArgs {
    #[arg(long)]
    pub name: String,
    /// Triggering event, e.g. conversation_created
    #[arg(long)]
    pub event: String,
    #[arg(long)]
    pub description: Option<String>,
    /// JSON array of condition objects
    #[arg(long, default_value = "[]")]
    pub conditions: String,
    /// JSON array of action objects
    #[arg(long, default_value = "[]")]
    pub actions: String,
    /// Create the rule disabled
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    List,
    Create(WebhookArgs),
    Update {
        id: u64,
        #[command(flatten)]
        args: WebhookArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct WebhookArgs {
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub name: Option<String>,
    /// Event to subscribe to (repeatable)
    #[arg(long = "subscription", required = true)]
    pub subscriptions: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum InboxMemberCommands {
    List {
        inbox_id: u64,
    },
    Add(InboxMemberArgs),
    Update(InboxMemberArgs),
    Remove(InboxMemberArgs),
}

#[derive(Args, Debug)]
pub struct InboxMemberArgs {
    pub inbox_id: u64,
    /// Agent id (repeatable)
    #[arg(long = "user", required = true)]
    pub user_ids: Vec<u64>,
}

#[derive(Subcommand, Debug)]
pub enum AgentBotCommands {
    List,
    Get {
        id: u64,
    },
    Create(AgentBotArgs),
    Update {
        id: u64,
        #[command(flatten)]
        args: AgentBotArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct AgentBotArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub outgoing_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConversationCommands {
    /// Set priority: urgent, high, medium, low, none
    Priority { id: u64, priority: String },
    /// Set status: open, resolved, pending, snoozed
    Status { id: u64, status: String },
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    Summary(ReportArgs),
    Timeseries {
        /// e.g. conversations_count
        metric: String,
        #[command(flatten)]
        args: ReportArgs,
    },
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// account, agent, inbox, label or team
    #[arg(long = "type", default_value = "account")]
    pub report_type: String,
    /// Id of the agent/inbox/label/team
    #[arg(long)]
    pub id: Option<u64>,
    /// Start of the window (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub since: String,
    /// End of the window (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub until: String,
}

#[derive(Parser, Debug)]
pub struct PublicArgs {
    /// Inbox identifier from the inbox settings
    #[arg(long)]
    pub inbox: String,

    #[command(subcommand)]
    pub command: PublicCommands,
}

#[derive(Subcommand, Debug)]
pub enum PublicCommands {
    CreateContact(PublicContactArgs),
    GetContact {
        contact: String,
    },
    UpdateContact {
        contact: String,
        #[command(flatten)]
        args: PublicContactArgs,
    },
    CreateConversation {
        contact: String,
    },
    ListConversations {
        contact: String,
    },
    SendMessage {
        contact: String,
        conversation_id: u64,
        content: String,
    },
    ListMessages {
        contact: String,
        conversation_id: u64,
    },
}

#[derive(Args, Debug)]
pub struct PublicContactArgs {
    #[arg(long)]
    pub identifier: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone_number: Option<String>,
}
