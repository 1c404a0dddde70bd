use super::*;
use stock_watcher::models::{Availability, CheckStatus};

#[tokio::test]
async fn test_available_product_is_logged_and_notified() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pages = MockServer::start().await;
    let telegram = MockServer::start().await;

    mount_page(&pages, "/vps-1000", 200, AVAILABLE_PAGE).await;
    mount_send_message(&telegram, 1).await;

    let monitor = create_test_monitor(&pages, &telegram, &dir, &[("A", "/vps-1000")])?;
    let outcome = monitor.run_check().await;

    assert_eq!(outcome.batch.results.len(), 1);
    assert_eq!(outcome.batch.results[0].available, Availability::Available);
    assert_eq!(outcome.batch.results[0].status, CheckStatus::Available);
    assert!(outcome.report.any_available);
    assert!(outcome.notified);

    let log: Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("availability_log.json"))?)?;
    assert_eq!(log.as_array().map(Vec::len), Some(1));
    assert_eq!(log[0]["results"][0]["available"], json!(true));
    assert_eq!(log[0]["results"][0]["status"], json!("AVAILABLE"));

    let messages = sent_messages(&telegram).await;
    assert!(messages[0].contains("ACTION REQUIRED"));
    assert!(messages[0].contains("Order now!"));
    Ok(())
}

#[tokio::test]
async fn test_first_sold_out_run_is_silent() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pages = MockServer::start().await;
    let telegram = MockServer::start().await;

    mount_page(&pages, "/vps-1000", 200, SOLD_OUT_PAGE).await;
    mount_send_message(&telegram, 0).await;

    let monitor = create_test_monitor(&pages, &telegram, &dir, &[("A", "/vps-1000")])?;
    let outcome = monitor.run_check().await;

    assert_eq!(outcome.batch.results[0].status, CheckStatus::SoldOut);
    assert!(!outcome.report.changes_detected);
    assert!(!outcome.notified);
    Ok(())
}

#[tokio::test]
async fn test_restock_then_sell_out_transitions() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pages = MockServer::start().await;
    let telegram = MockServer::start().await;
    mount_send_message(&telegram, 2).await;

    let monitor = create_test_monitor(&pages, &telegram, &dir, &[("A", "/vps-1000")])?;

    // 1. Sold out, nothing to report
    mount_page(&pages, "/vps-1000", 200, SOLD_OUT_PAGE).await;
    assert!(!monitor.run_check().await.notified);

    // 2. Back in stock
    pages.reset().await;
    mount_page(&pages, "/vps-1000", 200, AVAILABLE_PAGE).await;
    let restocked = monitor.run_check().await;
    assert!(restocked.notified);
    assert!(restocked.message.contains("NOW AVAILABLE!"));

    // 3. Gone again
    pages.reset().await;
    mount_page(&pages, "/vps-1000", 200, SOLD_OUT_PAGE).await;
    let sold_out = monitor.run_check().await;
    assert!(sold_out.report.changes_detected);
    assert!(!sold_out.report.any_available);
    assert!(sold_out.notified);
    assert!(sold_out.message.contains("Sold out again"));
    assert!(sold_out.message.ends_with("Status change detected"));

    let store = ResultStore::from_config(&store_config(&dir));
    assert_eq!(store.load_all()?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_http_failure_yields_error_result() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pages = MockServer::start().await;
    let telegram = MockServer::start().await;

    mount_page(&pages, "/vps-1000", 503, "").await;
    mount_page(&pages, "/vps-2000", 200, AVAILABLE_PAGE).await;
    mount_send_message(&telegram, 1).await;

    let monitor = create_test_monitor(
        &pages,
        &telegram,
        &dir,
        &[("A", "/vps-1000"), ("B", "/vps-2000")],
    )?;
    let outcome = monitor.run_check().await;

    assert!(outcome.has_errors());
    assert_eq!(outcome.batch.results[0].status, CheckStatus::Error);
    assert_eq!(outcome.batch.results[0].available, Availability::Unknown);
    assert!(outcome.batch.results[0].error.is_some());
    assert_eq!(outcome.batch.results[1].status, CheckStatus::Available);

    let log: Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("availability_log.json"))?)?;
    assert_eq!(log[0]["results"][0]["status"], json!("ERROR"));
    assert_eq!(log[0]["results"][0]["available"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn test_notification_failure_does_not_lose_batch() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pages = MockServer::start().await;
    let telegram = MockServer::start().await;

    mount_page(&pages, "/vps-1000", 200, AVAILABLE_PAGE).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&telegram)
        .await;

    let monitor = create_test_monitor(&pages, &telegram, &dir, &[("A", "/vps-1000")])?;
    let outcome = monitor.run_check().await;

    assert!(!outcome.notified);
    let store = ResultStore::from_config(&store_config(&dir));
    assert_eq!(store.load_all()?.len(), 1);
    Ok(())
}
