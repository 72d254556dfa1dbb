//! Service request shapes and input validation, checked through a
//! recording requester.

mod common;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{client, MockRequester, RecordedCall};
use supportdesk::error::{ClientError, ErrorCode};
use supportdesk::services::*;
use supportdesk::transport::Method;

fn call(method: Method, path: &str, body: Option<Value>) -> RecordedCall {
    RecordedCall {
        method,
        path: path.to_string(),
        body,
    }
}

#[tokio::test]
async fn canned_response_create_wraps_body() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"id": 4, "short_code": "bye", "content": "Goodbye"}));

    let created = client(&mock)
        .canned_responses()
        .create(&CannedResponseInput {
            short_code: "bye".into(),
            content: "Goodbye".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 4);
    assert_eq!(
        mock.last_call(),
        call(
            Method::POST,
            "/api/v1/accounts/1/canned_responses",
            Some(json!({"canned_response": {"short_code": "bye", "content": "Goodbye"}})),
        )
    );
}

#[tokio::test]
async fn canned_response_rejects_blank_fields_before_sending() {
    let mock = MockRequester::new();
    let err = client(&mock)
        .canned_responses()
        .update(
            9,
            &CannedResponseInput {
                short_code: "  ".into(),
                content: "x".into(),
            },
        )
        .await
        .unwrap_err();

    let structured = err.to_structured();
    assert_eq!(structured.code(), ErrorCode::ValidationFailed);
    assert_eq!(structured.context().get("field"), Some(&json!("short_code")));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn automation_rule_builder_defaults_and_payload() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"payload": {
        "id": 12,
        "name": "Escalate",
        "event_name": "message_created",
        "active": true,
        "conditions": [],
        "actions": [{"action_name": "assign_team", "action_params": [2]}]
    }}));

    let input = AutomationRuleInput::builder()
        .name("Escalate")
        .event_name(AutomationEvent::MessageCreated)
        .actions(vec![json!({"action_name": "assign_team", "action_params": [2]})])
        .build();
    let rule = client(&mock).automation_rules().create(&input).await.unwrap();

    assert_eq!(rule.id, 12);
    assert_eq!(rule.event_name, "message_created");
    let sent = mock.last_call();
    assert_eq!(sent.path, "/api/v1/accounts/1/automation_rules");
    assert_eq!(
        sent.body,
        Some(json!({
            "name": "Escalate",
            "event_name": "message_created",
            "active": true,
            "conditions": [],
            "actions": [{"action_name": "assign_team", "action_params": [2]}]
        }))
    );
}

#[tokio::test]
async fn automation_rule_accepts_unknown_event_names_from_server() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"payload": [
        {"id": 1, "name": "Old", "event_name": "conversation_opened"},
        {"id": 2, "name": "New", "event_name": "contact_merged"}
    ]}));

    let rules = client(&mock).automation_rules().list().await.unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1].event_name, "contact_merged");
}

#[tokio::test]
async fn webhook_create_and_list_unwrap_payload() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"payload": {"webhook": {
        "id": 3,
        "url": "https://hooks.example/desk",
        "subscriptions": ["message_created"]
    }}}));
    mock.queue_response(json!({"payload": {"webhooks": []}}));

    let service = client(&mock).webhooks();
    let created = service
        .create(&WebhookInput {
            url: "https://hooks.example/desk".into(),
            name: None,
            subscriptions: vec![WebhookEvent::MessageCreated],
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    assert!(service.list().await.unwrap().is_empty());

    assert_eq!(
        mock.calls()[0].body,
        Some(json!({"webhook": {
            "url": "https://hooks.example/desk",
            "subscriptions": ["message_created"]
        }}))
    );
}

#[tokio::test]
async fn webhook_validation() {
    let mock = MockRequester::new();
    let service = client(&mock).webhooks();

    let bad_url = service
        .create(&WebhookInput {
            url: "hooks.example".into(),
            name: None,
            subscriptions: vec![WebhookEvent::ContactCreated],
        })
        .await
        .unwrap_err();
    assert_eq!(bad_url.code(), ErrorCode::ValidationFailed);

    let no_events = service
        .create(&WebhookInput {
            url: "https://hooks.example".into(),
            name: None,
            subscriptions: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(
        no_events.to_structured().context().get("field"),
        Some(&json!("subscriptions"))
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn inbox_member_changes() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"payload": [{"id": 7, "name": "Ana"}]}));
    mock.queue_response(Value::Null);

    let service = client(&mock).inbox_members();
    let members = service.add(4, &[7]).await.unwrap();
    assert_eq!(members[0].name, "Ana");
    service.remove(4, &[7]).await.unwrap();

    let body = Some(json!({"inbox_id": 4, "user_ids": [7]}));
    assert_eq!(
        mock.calls(),
        vec![
            call(Method::POST, "/api/v1/accounts/1/inbox_members", body.clone()),
            call(Method::DELETE, "/api/v1/accounts/1/inbox_members", body),
        ]
    );

    let err = service.update(4, &[]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn agent_bot_crud_paths() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"id": 2, "name": "Bot"}));
    mock.queue_response(Value::Null);

    let service = client(&mock).agent_bots();
    let bot = service.get(2).await.unwrap();
    assert_eq!(bot.description, None);
    service.delete(2).await.unwrap();

    let paths: Vec<_> = mock.calls().into_iter().map(|c| (c.method, c.path)).collect();
    assert_eq!(
        paths,
        vec![
            (Method::GET, "/api/v1/accounts/1/agent_bots/2".to_string()),
            (Method::DELETE, "/api/v1/accounts/1/agent_bots/2".to_string()),
        ]
    );
}

#[tokio::test]
async fn conversation_priority_none_clears_value() {
    let mock = MockRequester::new();
    let service = client(&mock).conversations();

    service.toggle_priority(8, Priority::High).await.unwrap();
    service.toggle_priority(8, Priority::None).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls[0].path, "/api/v1/accounts/1/conversations/8/toggle_priority");
    assert_eq!(calls[0].body, Some(json!({"priority": "high"})));
    assert_eq!(calls[1].body, Some(json!({"priority": null})));
}

#[tokio::test]
async fn conversation_status_toggle() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"payload": {
        "success": true,
        "conversation_id": 8,
        "current_status": "snoozed"
    }}));

    let toggled = client(&mock)
        .conversations()
        .toggle_status(8, ConversationStatus::Snoozed)
        .await
        .unwrap();
    assert!(toggled.success);
    assert_eq!(toggled.current_status, "snoozed");
    assert_eq!(mock.last_call().body, Some(json!({"status": "snoozed"})));
}

#[test]
fn bad_priority_lists_every_choice() {
    let err = parse_choice::<Priority>("priority", "critical").unwrap_err();
    let structured = err.to_structured();
    assert_eq!(structured.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        structured.allowed_values(),
        ["urgent", "high", "medium", "low", "none"]
    );
    assert_eq!(choices::<ConversationStatus>(), ["open", "resolved", "pending", "snoozed"]);
}

#[tokio::test]
async fn report_summary_query_and_decoding() {
    let mock = MockRequester::new();
    mock.queue_response(json!({
        "conversations_count": 12,
        "avg_first_response_time": "95.5",
        "resolutions_count": 4
    }));

    let query = ReportQuery::builder()
        .report_type(ReportType::Inbox)
        .id(3)
        .since(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .until(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        .build();
    let summary = client(&mock).reports().summary(&query).await.unwrap();

    assert_eq!(summary.conversations_count, 12.0);
    assert_eq!(summary.avg_first_response_time, 95.5);
    assert_eq!(summary.incoming_messages_count, 0.0);
    assert_eq!(
        mock.last_call().path,
        "/api/v2/accounts/1/reports/summary?type=inbox&id=3&since=1704067200&until=1704153600"
    );
}

#[tokio::test]
async fn report_window_must_be_ordered() {
    let mock = MockRequester::new();
    let query = ReportQuery::builder()
        .since(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
        .until(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .build();

    let err = client(&mock)
        .reports()
        .timeseries(ReportMetric::ConversationsCount, &query)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn public_api_paths() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"source_id": "src-1", "pubsub_token": "ps"}));
    mock.queue_response(json!({"id": 40, "content": "hello"}));

    let api = PublicApi::new(mock.clone(), "inb-1");
    let contact = api
        .create_contact(&PublicContactInput {
            name: Some("Visitor".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(contact.source_id, "src-1");

    let message = api.create_message("src-1", 5, "hello").await.unwrap();
    assert_eq!(message.content.as_deref(), Some("hello"));

    let calls = mock.calls();
    assert_eq!(calls[0].path, "/public/api/v1/inboxes/inb-1/contacts");
    assert_eq!(calls[0].body, Some(json!({"name": "Visitor"})));
    assert_eq!(
        calls[1],
        call(
            Method::POST,
            "/public/api/v1/inboxes/inb-1/contacts/src-1/conversations/5/messages",
            Some(json!({"content": "hello"})),
        )
    );
}

#[tokio::test]
async fn public_api_requires_identifiers() {
    let mock = MockRequester::new();
    let err = PublicApi::new(mock.clone(), "inb-1")
        .get_contact("")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_structured().context().get("field"),
        Some(&json!("contact_identifier"))
    );

    let err = PublicApi::new(mock.clone(), "")
        .list_conversations("src-1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn public_identifiers_are_escaped_as_single_segments() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"source_id": "x"}));

    PublicApi::new(mock.clone(), "inb-1")
        .get_contact("../../../../../../api/v1/accounts/1/agent_bots/7")
        .await
        .unwrap();
    assert_eq!(
        mock.last_call().path,
        "/public/api/v1/inboxes/inb-1/contacts/..%2F..%2F..%2F..%2F..%2F..%2Fapi%2Fv1%2Faccounts%2F1%2Fagent_bots%2F7"
    );

    let err = PublicApi::new(mock.clone(), "inb-1")
        .list_conversations("..")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(
        err.to_structured().context().get("field"),
        Some(&json!("contact_identifier"))
    );

    let err = PublicApi::new(mock.clone(), ".")
        .get_contact("src-1")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_structured().context().get("field"),
        Some(&json!("inbox_identifier"))
    );
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn unexpected_response_shape_names_the_endpoint() {
    let mock = MockRequester::new();
    mock.queue_response(json!({"unexpected": true}));

    let err = client(&mock).agent_bots().get(2).await.unwrap_err();
    assert!(matches!(err, ClientError::Request(_)));
    let structured = err.to_structured();
    assert_eq!(structured.code(), ErrorCode::Unknown);
    assert!(
        structured.message().contains("/api/v1/accounts/1/agent_bots/2"),
        "{}",
        structured.message()
    );
}

#[tokio::test]
async fn requester_errors_pass_through_unchanged() {
    let mock = MockRequester::new();
    mock.queue_error(ClientError::api(403, "forbidden for this account"));

    let err = client(&mock).webhooks().list().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(mock.calls().len(), 1);
}
