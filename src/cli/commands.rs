//! Command dispatch: resolve config, call the service, print the result.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::output::print;
use super::*;
use crate::client::{public_client, Client};
use crate::config::Config;
use crate::error::Result;
use crate::services::{
    invalid_field, parse_choice, AgentBotInput, AutomationRuleInput, CannedResponseInput,
    PublicApi, PublicContactInput, ReportQuery, WebhookInput,
};

/// Run one parsed invocation.
pub async fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    let format = global.output;
    match cli.command {
        Commands::Auth(args) => auth::handle(args.command, &global),
        Commands::Public(args) => {
            let config = resolve_config(&global)?;
            let api = public_client(&config, args.inbox)?;
            run_public(&api, args.command, format).await
        }
        Commands::CannedResponses(cmd) => {
            run_canned_responses(&account_client(&global)?, cmd, format).await
        }
        Commands::AutomationRules(cmd) => {
            run_automation_rules(&account_client(&global)?, cmd, format).await
        }
        Commands::Webhooks(cmd) => run_webhooks(&account_client(&global)?, cmd, format).await,
        Commands::InboxMembers(cmd) => {
            run_inbox_members(&account_client(&global)?, cmd, format).await
        }
        Commands::AgentBots(cmd) => run_agent_bots(&account_client(&global)?, cmd, format).await,
        Commands::Conversations(cmd) => {
            run_conversations(&account_client(&global)?, cmd, format).await
        }
        Commands::Reports(cmd) => run_reports(&account_client(&global)?, cmd, format).await,
    }
}

/// Config from every layer, with command-line flags on top.
pub fn resolve_config(global: &GlobalArgs) -> Result<Config> {
    let config = Config::load(global.config.as_deref())?;
    Ok(apply_flags(config, global))
}

pub(crate) fn apply_flags(mut config: Config, global: &GlobalArgs) -> Config {
    if let Some(url) = &global.base_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(token) = &global.token {
        config = config.with_api_token(token.as_str());
    }
    if let Some(account_id) = global.account_id {
        config = config.with_account_id(account_id);
    }
    config
}

fn account_client(global: &GlobalArgs) -> Result<Client> {
    Client::new(&resolve_config(global)?)
}

async fn run_canned_responses(
    client: &Client,
    cmd: CannedResponseCommands,
    format: OutputFormat,
) -> Result<()> {
    let service = client.canned_responses();
    match cmd {
        CannedResponseCommands::List => print(format, &service.list().await?),
        CannedResponseCommands::Create(args) => {
            print(format, &service.create(&canned_input(args)).await?)
        }
        CannedResponseCommands::Update { id, args } => {
            print(format, &service.update(id, &canned_input(args)).await?)
        }
        CannedResponseCommands::Delete { id } => print(format, &service.delete(id).await?),
    }
}

fn canned_input(args: CannedResponseArgs) -> CannedResponseInput {
    CannedResponseInput {
        short_code: args.short_code,
        content: args.content,
    }
}

async fn run_automation_rules(
    client: &Client,
    cmd: AutomationRuleCommands,
    format: OutputFormat,
) -> Result<()> {
    let service = client.automation_rules();
    match cmd {
        AutomationRuleCommands::List => print(format, &service.list().await?),
        AutomationRuleCommands::Get { id } => print(format, &service.get(id).await?),
        AutomationRuleCommands::Create(args) => {
            print(format, &service.create(&automation_input(args)?).await?)
        }
        AutomationRuleCommands::Update { id, args } => {
            print(format, &service.update(id, &automation_input(args)?).await?)
        }
        AutomationRuleCommands::Delete { id } => print(format, &service.delete(id).await?),
    }
}

fn automation_input(args: AutomationRuleArgs) -> Result<AutomationRuleInput> {
    Ok(AutomationRuleInput::builder()
        .name(args.name)
        .maybe_description(args.description)
        .event_name(parse_choice("event_name", &args.event)?)
        .active(!args.inactive)
        .conditions(parse_json_array("conditions", &args.conditions)?)
        .actions(parse_json_array("actions", &args.actions)?)
        .build())
}

async fn run_webhooks(client: &Client, cmd: WebhookCommands, format: OutputFormat) -> Result<()> {
    let service = client.webhooks();
    match cmd {
        WebhookCommands::List => print(format, &service.list().await?),
        WebhookCommands::Create(args) => print(format, &service.create(&webhook_input(args)?).await?),
        WebhookCommands::Update { id, args } => {
            print(format, &service.update(id, &webhook_input(args)?).await?)
        }
        WebhookCommands::Delete { id } => print(format, &service.delete(id).await?),
    }
}

fn webhook_input(args: WebhookArgs) -> Result<WebhookInput> {
    let subscriptions = args
        .subscriptions
        .iter()
        .map(|raw| parse_choice("subscriptions", raw))
        .collect::<Result<Vec<_>>>()?;
    Ok(WebhookInput {
        url: args.url,
        name: args.name,
        subscriptions,
    })
}

async fn run_inbox_members(
    client: &Client,
    cmd: InboxMemberCommands,
    format: OutputFormat,
) -> Result<()> {
    let service = client.inbox_members();
    match cmd {
        InboxMemberCommands::List { inbox_id } => print(format, &service.list(inbox_id).await?),
        InboxMemberCommands::Add(args) => {
            print(format, &service.add(args.inbox_id, &args.user_ids).await?)
        }
        InboxMemberCommands::Update(args) => {
            print(format, &service.update(args.inbox_id, &args.user_ids).await?)
        }
        InboxMemberCommands::Remove(args) => {
            print(format, &service.remove(args.inbox_id, &args.user_ids).await?)
        }
    }
}

async fn run_agent_bots(client: &Client, cmd: AgentBotCommands, format: OutputFormat) -> Result<()> {
    let service = client.agent_bots();
    match cmd {
        AgentBotCommands::List => print(format, &service.list().await?),
        AgentBotCommands::Get { id } => print(format, &service.get(id).await?),
        AgentBotCommands::Create(args) => print(format, &service.create(&bot_input(args)).await?),
        AgentBotCommands::Update { id, args } => {
            print(format, &service.update(id, &bot_input(args)).await?)
        }
        AgentBotCommands::Delete { id } => print(format, &service.delete(id).await?),
    }
}

fn bot_input(args: AgentBotArgs) -> AgentBotInput {
    AgentBotInput {
        name: args.name,
        description: args.description,
        outgoing_url: args.outgoing_url,
    }
}

async fn run_conversations(
    client: &Client,
    cmd: ConversationCommands,
    format: OutputFormat,
) -> Result<()> {
    let service = client.conversations();
    match cmd {
        ConversationCommands::Priority { id, priority } => {
            let priority = parse_choice("priority", &priority)?;
            print(format, &service.toggle_priority(id, priority).await?)
        }
        ConversationCommands::Status { id, status } => {
            let status = parse_choice("status", &status)?;
            print(format, &service.toggle_status(id, status).await?)
        }
    }
}

async fn run_reports(client: &Client, cmd: ReportCommands, format: OutputFormat) -> Result<()> {
    let service = client.reports();
    match cmd {
        ReportCommands::Summary(args) => print(format, &service.summary(&report_query(&args)?).await?),
        ReportCommands::Timeseries { metric, args } => {
            let metric = parse_choice("metric", &metric)?;
            print(
                format,
                &service.timeseries(metric, &report_query(&args)?).await?,
            )
        }
    }
}

fn report_query(args: &ReportArgs) -> Result<ReportQuery> {
    Ok(ReportQuery::builder()
        .report_type(parse_choice("type", &args.report_type)?)
        .maybe_id(args.id)
        .since(parse_bound("since", &args.since, false)?)
        .until(parse_bound("until", &args.until, true)?)
        .build())
}

async fn run_public(api: &PublicApi, cmd: PublicCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        PublicCommands::CreateContact(args) => {
            print(format, &api.create_contact(&contact_input(args)).await?)
        }
        PublicCommands::GetContact { contact } => print(format, &api.get_contact(&contact).await?),
        PublicCommands::UpdateContact { contact, args } => print(
            format,
            &api.update_contact(&contact, &contact_input(args)).await?,
        ),
        PublicCommands::CreateConversation { contact } => {
            print(format, &api.create_conversation(&contact).await?)
        }
        PublicCommands::ListConversations { contact } => {
            print(format, &api.list_conversations(&contact).await?)
        }
        PublicCommands::SendMessage {
            contact,
            conversation_id,
            content,
        } => print(
            format,
            &api.create_message(&contact, conversation_id, &content).await?,
        ),
        PublicCommands::ListMessages {
            contact,
            conversation_id,
        } => print(
            format,
            &api.list_messages(&contact, conversation_id).await?,
        ),
    }
}

fn contact_input(args: PublicContactArgs) -> PublicContactInput {
    PublicContactInput {
        identifier: args.identifier,
        name: args.name,
        email: args.email,
        phone_number: args.phone_number,
        ..Default::default()
    }
}

/// Parse `YYYY-MM-DD` (start or end of that UTC day) or an RFC 3339 timestamp.
fn parse_bound(field: &str, raw: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        invalid_field(
            field,
            format!("invalid {field} \"{raw}\": expected YYYY-MM-DD or RFC 3339"),
        )
    })?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc()).ok_or_else(|| {
        invalid_field(field, format!("invalid {field} \"{raw}\": out of range"))
    })
}

fn parse_json_array(field: &str, raw: &str) -> Result<Vec<Value>> {
    serde_json::from_str(raw)
        .map_err(|e| invalid_field(field, format!("invalid {field}: expected a JSON array ({e})")))
}
