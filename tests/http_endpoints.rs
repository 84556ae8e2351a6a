use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitewatch::analysis::{AiAnalysis, DiffAnalyzer, GeminiAnalyzer, StructuredExtractor};
use sitewatch::monitoring::classifier::Importance;
use sitewatch::monitoring::fetcher::{FetchError, HttpFetcher, PageFetcher};
use sitewatch::notifications::models::{ChangeNotification, NotificationPrefs};
use sitewatch::notifications::senders::email::EmailSender;
use sitewatch::notifications::senders::slack::SlackSender;
use sitewatch::notifications::senders::{NotificationSender, SenderError};
use sitewatch::notifications::service::{ChangeNotifier, NotificationService};

fn notification() -> ChangeNotification {
    ChangeNotification {
        site_name: "Acme Corp".to_string(),
        site_url: "https://acme.example.com/pricing".to_string(),
        dashboard_url: "https://app.example.com/dashboard".to_string(),
        importance: Importance::Medium,
        changes_count: 4,
        change_percentage: 8.0,
        summary: "New plan added".to_string(),
        intent: "Upselling.".to_string(),
        suggestions: "Review our pricing.".to_string(),
    }
}

#[tokio::test]
async fn fetcher_returns_page_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plan A\nplan B"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5));
    let page = fetcher
        .fetch(&format!("{}/pricing", server.uri()))
        .await
        .unwrap();

    assert_eq!(page.content, "plan A\nplan B");
}

#[tokio::test]
async fn fetcher_rejects_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5));
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();

    match err {
        FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {other}"),
    }
}

fn gemini_text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn analyzer_parses_json_embedded_in_prose() {
    let server = MockServer::start().await;
    let text = "Here is the analysis you asked for:\n\
        {\"summary\": \"A new plan\", \"intent\": \"Upselling\", \"suggestions\": [\"React\"]}\n\
        Let me know if you need more.";
    Mock::given(method("POST"))
        .and(path("/v1beta/generate"))
        .and(body_string_contains("Acme Corp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response(text)))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = GeminiAnalyzer::new(
        format!("{}/v1beta/generate", server.uri()),
        "test-key".to_string(),
    );
    let analysis = analyzer
        .analyze("Acme Corp", &["New plan".to_string()], &[])
        .await;

    assert_eq!(
        analysis,
        AiAnalysis {
            summary: "A new plan".to_string(),
            intent: "Upselling".to_string(),
            suggestions: vec!["React".to_string()],
        }
    );
}

#[tokio::test]
async fn analyzer_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let analyzer = GeminiAnalyzer::new(server.uri(), "test-key".to_string());
    let analysis = analyzer.analyze("Acme Corp", &[], &[]).await;

    assert_eq!(analysis, AiAnalysis::fallback());
}

#[tokio::test]
async fn analyzer_falls_back_on_unstructured_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_text_response("Sorry, I cannot help with that.")),
        )
        .mount(&server)
        .await;

    let analyzer = GeminiAnalyzer::new(server.uri(), "test-key".to_string());
    let analysis = analyzer.analyze("Acme Corp", &[], &[]).await;

    assert_eq!(analysis, AiAnalysis::fallback());
}

/// Extractor that treats the whole response text as the payload.
struct WholeTextExtractor;

impl StructuredExtractor for WholeTextExtractor {
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        Some(text.trim())
    }
}

#[tokio::test]
async fn analyzer_accepts_a_swapped_extractor() {
    let server = MockServer::start().await;
    // bare JSON with leading whitespace, which the whole-text extractor
    // must hand over verbatim
    let text = "  {\"summary\": \"s\", \"intent\": \"i\", \"suggestions\": []}  ";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text_response(text)))
        .mount(&server)
        .await;

    let analyzer = GeminiAnalyzer::new(server.uri(), "test-key".to_string())
        .with_extractor(Box::new(WholeTextExtractor));
    let analysis = analyzer.analyze("Acme Corp", &[], &[]).await;

    assert_eq!(analysis.summary, "s");
    assert_eq!(analysis.intent, "i");
    assert!(analysis.suggestions.is_empty());
}

#[tokio::test]
async fn analyzer_falls_back_on_empty_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
        )
        .mount(&server)
        .await;

    let analyzer = GeminiAnalyzer::new(server.uri(), "test-key".to_string());
    let analysis = analyzer.analyze("Acme Corp", &[], &[]).await;

    assert_eq!(analysis, AiAnalysis::fallback());
}

#[tokio::test]
async fn slack_sender_posts_blocks_to_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string_contains("Acme Corp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let sender = SlackSender::new();
    let result = sender
        .send(&format!("{}/hook", server.uri()), &notification())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn slack_sender_surfaces_webhook_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
        .mount(&server)
        .await;

    let sender = SlackSender::new();
    let err = sender.send(&server.uri(), &notification()).await.unwrap_err();

    match err {
        SenderError::SendFailed(msg) => {
            assert!(msg.contains("404"));
            assert!(msg.contains("no_service"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn email_sender_posts_html_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_string_contains("owner@example.com"))
        .and(body_string_contains("Acme Corp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    let sender = EmailSender::new("re_test_key".to_string(), "alerts@example.com".to_string())
        .with_base_url(server.uri());
    let result = sender.send("owner@example.com", &notification()).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn notification_service_dispatches_per_channel_prefs() {
    let email_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "1" })))
        .expect(1)
        .mount(&email_api)
        .await;

    let slack_api = MockServer::start().await;
    // slack is disabled in the prefs, so the webhook must never be hit
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&slack_api)
        .await;

    let sender = EmailSender::new("re_test_key".to_string(), "alerts@example.com".to_string())
        .with_base_url(email_api.uri());
    let service = NotificationService::new(Some(sender));

    let prefs = NotificationPrefs {
        email_enabled: true,
        email: "owner@example.com".to_string(),
        slack_enabled: false,
        slack_webhook_url: Some(format!("{}/hook", slack_api.uri())),
    };
    let outcome = service.notify_change(&prefs, &notification()).await;

    assert!(outcome.email);
    assert!(!outcome.slack);
}

#[tokio::test]
async fn notification_service_reports_channel_failure_without_erroring() {
    let email_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&email_api)
        .await;

    let slack_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&slack_api)
        .await;

    let sender = EmailSender::new("re_test_key".to_string(), "alerts@example.com".to_string())
        .with_base_url(email_api.uri());
    let service = NotificationService::new(Some(sender));

    let prefs = NotificationPrefs {
        email_enabled: true,
        email: "owner@example.com".to_string(),
        slack_enabled: true,
        slack_webhook_url: Some(format!("{}/hook", slack_api.uri())),
    };
    let outcome = service.notify_change(&prefs, &notification()).await;

    // the failed email does not block the slack delivery
    assert!(!outcome.email);
    assert!(outcome.slack);
}

#[tokio::test]
async fn notification_service_skips_slack_without_webhook_url() {
    let service = NotificationService::new(None);

    let prefs = NotificationPrefs {
        email_enabled: false,
        email: "owner@example.com".to_string(),
        slack_enabled: true,
        slack_webhook_url: None,
    };
    let outcome = service.notify_change(&prefs, &notification()).await;

    assert!(!outcome.email);
    assert!(!outcome.slack);
}
