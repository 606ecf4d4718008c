use serde_json::json;

use super::support::{CallKind, RecordingTransport};
use crate::{
    action::{ActionCommand, ActionResult},
    command::TransportCommand,
    params,
    params::Params,
};

#[test]
fn params_merge_is_last_writer_wins() {
    let mut params = params! { "a" => "1", "b" => "2" };
    params.merge(&params! { "b" => "3", "c" => "4" });
    assert_eq!(params.get("a"), Some("1"));
    assert_eq!(params.get("b"), Some("3"));
    assert_eq!(params.get("c"), Some("4"));
}

#[tokio::test]
async fn read_merges_defaults_params_and_overrides_in_order() {
    let transport = RecordingTransport::new();
    let cmd = TransportCommand::with_defaults(
        transport.clone(),
        params! { "token" => "t1", "first" => "1" },
    );

    cmd.read_with(
        "get_tasks",
        &params! { "first" => "11", "rows" => "10" },
        &params! { "rows" => "25" },
    )
    .await
    .unwrap();

    let (kind, sent) = transport.single_call();
    assert_eq!(kind, CallKind::Read);
    assert_eq!(sent.get("cmd"), Some("get_tasks"));
    assert_eq!(sent.get("token"), Some("t1"));
    assert_eq!(sent.get("first"), Some("11"), "per-call beats defaults");
    assert_eq!(sent.get("rows"), Some("25"), "overrides beat per-call");
}

#[tokio::test]
async fn write_dispatches_body_encoded() {
    let transport = RecordingTransport::new();
    let cmd = TransportCommand::new(transport.clone());

    cmd.write("create_task", &params! { "name" => "scan" })
        .await
        .unwrap();

    let (kind, sent) = transport.single_call();
    assert_eq!(kind, CallKind::Write);
    assert_eq!(sent.get("cmd"), Some("create_task"));
    assert_eq!(sent.get("name"), Some("scan"));
}

#[tokio::test]
async fn action_wraps_envelope_without_judging_domain_success() {
    let transport = RecordingTransport::with_response(json!({
        "action_result": {
            "_id": "task-9",
            "action": "create_task",
            "message": "name already exists",
        }
    }));
    let actions = ActionCommand::new(TransportCommand::new(transport.clone()));

    let result = actions
        .action("create_task", &params! { "name" => "dup" })
        .await
        .unwrap();

    // A domain-level failure still resolves; the message carries it.
    assert_eq!(
        result,
        ActionResult {
            id: Some("task-9".to_owned()),
            action: "create_task".to_owned(),
            message: "name already exists".to_owned(),
        }
    );
    assert_eq!(transport.single_call().0, CallKind::Write);
}

#[tokio::test]
async fn action_tolerates_bare_envelopes() {
    let transport = RecordingTransport::with_response(json!({"message": "ok"}));
    let actions = ActionCommand::new(TransportCommand::new(transport));

    let result = actions.action("start_task", &Params::new()).await.unwrap();
    assert_eq!(result.id, None);
    assert_eq!(result.message, "ok");
}
