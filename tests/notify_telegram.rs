// tests/notify_telegram.rs
use mockito::Matcher;
use serde_json::json;
use vacancy_watch::error::DeliveryError;
use vacancy_watch::notify::telegram::TelegramNotifier;
use vacancy_watch::notify::{notify_new_jobs, Deliver};
use vacancy_watch::JobRecord;

fn notifier(base: &str) -> TelegramNotifier {
    TelegramNotifier::new("123:abc".into(), "-1001".into()).with_api_base(base)
}

#[tokio::test]
async fn posts_send_message_with_chat_and_text() {
    let mut server = mockito::Server::new_async().await;
    let api = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "chat_id": "-1001",
            "text": "hello",
            "disable_web_page_preview": true
        })))
        .with_status(200)
        .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
        .create_async()
        .await;

    notifier(&server.url())
        .deliver_chunk("hello")
        .await
        .expect("delivered");
    api.assert_async().await;
}

#[tokio::test]
async fn api_error_carries_description() {
    let mut server = mockito::Server::new_async().await;
    let _api = server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = notifier(&server.url())
        .deliver_chunk("hello")
        .await
        .unwrap_err();
    match err {
        DeliveryError::Status {
            status,
            description,
        } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn each_chunk_is_one_request_and_failures_continue() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"chat_id": "-1001"})),
            Matcher::Regex("new jobs found".into()),
        ]))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let rest = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::Regex(r#"^\{"chat_id":"-1001","text":"Engineer"#.into()))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let jobs: Vec<_> = (0..30)
        .map(|i| JobRecord::new(format!("https://x/{i}"), format!("Engineer {i}"), "Acme").unwrap())
        .collect();
    let report = notify_new_jobs(&notifier(&server.url()), &jobs, 400).await;

    assert!(report.chunks >= 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, report.chunks - 1);
    first.assert_async().await;
    rest.assert_async().await;
}
