use super::*;
use stock_watcher::command_handler::{CommandHandler, PollOutcome, StatusInfo};
use stock_watcher::store::OffsetStore;
use wiremock::matchers::query_param;

fn create_test_handler(telegram: &MockServer, dir: &TempDir) -> CommandHandler {
    let notifier = telegram_notifier(telegram);
    CommandHandler::new(
        notifier.clone(),
        notifier.clone(),
        OffsetStore::from_config(&store_config(dir)),
        notifier.authorized_chat_id().map(str::to_string),
        StatusInfo {
            check_interval_minutes: 60,
            product_count: 3,
        },
    )
}

async fn mount_updates(server: &MockServer, offset: &str, updates: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/bot{}/getUpdates", BOT_TOKEN)))
        .and(query_param("offset", offset))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": updates
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_check_command_advances_offset() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("last_update_id.txt"), "12")?;
    let telegram = MockServer::start().await;

    mount_updates(
        &telegram,
        "13",
        json!([{"update_id": 13, "message": {"chat": {"id": CHAT_ID}, "text": "/check"}}]),
    )
    .await;
    mount_send_message(&telegram, 1).await;

    let outcome = create_test_handler(&telegram, &dir).process().await;

    assert!(outcome.check_requested);
    assert_eq!(outcome.new_offset, 13);
    assert_eq!(std::fs::read_to_string(dir.path().join("last_update_id.txt"))?.trim(), "13");
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_and_plain_messages() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let telegram = MockServer::start().await;

    mount_updates(
        &telegram,
        "1",
        json!([
            {"update_id": 5, "message": {"chat": {"id": 999}, "text": "/check"}},
            {"update_id": 3, "message": {"chat": {"id": CHAT_ID}, "text": "hello"}},
            {"update_id": 9, "message": {"chat": {"id": CHAT_ID}, "text": "what's up"}},
            {"update_id": 7}
        ]),
    )
    .await;
    mount_send_message(&telegram, 0).await;

    let outcome = create_test_handler(&telegram, &dir).process().await;

    assert!(!outcome.check_requested);
    assert_eq!(outcome.replies_sent, 0);
    assert_eq!(OffsetStore::from_config(&store_config(&dir)).load(), 9);
    Ok(())
}

#[tokio::test]
async fn test_status_and_help_replies() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let telegram = MockServer::start().await;

    mount_updates(
        &telegram,
        "1",
        json!([
            {"update_id": 1, "message": {"chat": {"id": CHAT_ID}, "text": "/status@stock_bot"}},
            {"update_id": 2, "message": {"chat": {"id": CHAT_ID}, "text": "/HELP"}},
            {"update_id": 3, "message": {"chat": {"id": CHAT_ID}, "text": "/start"}}
        ]),
    )
    .await;
    mount_send_message(&telegram, 3).await;

    let outcome = create_test_handler(&telegram, &dir).process().await;
    assert_eq!(outcome.replies_sent, 3);

    let messages = sent_messages(&telegram).await;
    assert!(messages[0].contains("Monitored products: 3"));
    assert!(messages[1].contains("Available commands"));
    assert!(messages[2].contains("Command '/start' not recognized"));
    Ok(())
}

#[tokio::test]
async fn test_api_failure_is_treated_as_no_messages() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("last_update_id.txt"), "40")?;
    let telegram = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&telegram)
        .await;

    let outcome = create_test_handler(&telegram, &dir).process().await;

    assert_eq!(
        outcome,
        PollOutcome {
            previous_offset: 40,
            new_offset: 40,
            ..PollOutcome::default()
        }
    );
    Ok(())
}
