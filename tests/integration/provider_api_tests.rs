/*!
 * Provider API integration tests against a local HTTP mock
 */

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adsync::app_config::{Config, TranslationProvider};
use adsync::app_controller::Controller;
use adsync::database::models::{NewAdCopy, TranslationFilter};
use adsync::translation::RecordingProgress;

use crate::common;

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

async fn gemini_config(server: &MockServer, dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.provider = TranslationProvider::Gemini;
    config.database_path = common::database_path(dir).to_string_lossy().to_string();
    let provider = config.active_provider_config_mut();
    provider.api_key = "integration-key".to_string();
    provider.endpoint = server.uri();
    provider.timeout_secs = 5;
    config
}

#[tokio::test]
async fn test_translateAll_throughGemini_shouldStoreProofreadRow() {
    let server = MockServer::start().await;
    let dir = common::create_temp_dir().unwrap();

    // proofreading prompt
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "integration-key"))
        .and(body_string_contains("translation quality expert"))
        .respond_with(gemini_reply(
            "```json\n{\"score\": 93, \"corrected\": \"Économisez sur <product> dès maintenant...\", \"feedback\": \"Natural\"}\n```",
        ))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    // body translation
    Mock::given(method("POST"))
        .and(body_string_contains("Shop now and save on __PLACEHOLDER_0__"))
        .respond_with(gemini_reply("Achetez maintenant et économisez sur __PLACEHOLDER_0__..."))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    // headline translation
    Mock::given(method("POST"))
        .respond_with(gemini_reply("Obtenez 50 % de réduction aujourd'hui !\n"))
        .with_priority(3)
        .mount(&server)
        .await;

    let controller = Controller::with_config(gemini_config(&server, dir.path()).await).unwrap();
    controller
        .create_ad_copy(NewAdCopy::new("Get 50% off today!", "Shop now and save on <product>..."))
        .await
        .unwrap();
    controller.add_country("FR", "French", None, None).await.unwrap();

    let summary = controller
        .translate_all("FR", &RecordingProgress::new())
        .await
        .unwrap();

    assert_eq!(summary.created_count(), 1);
    let rows = controller
        .list_translations(&TranslationFilter::default())
        .await
        .unwrap();
    assert_eq!(rows[0].headline, "Obtenez 50 % de réduction aujourd'hui !");
    assert_eq!(rows[0].body, "Économisez sur <product> dès maintenant...");
    assert_eq!(rows[0].quality_score, 93);
}

#[tokio::test]
async fn test_translateAll_withGeminiOutage_shouldFailAndStoreNothing() {
    let server = MockServer::start().await;
    let dir = common::create_temp_dir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let controller = Controller::with_config(gemini_config(&server, dir.path()).await).unwrap();
    controller
        .create_ad_copy(NewAdCopy::new("Headline", "Body"))
        .await
        .unwrap();
    controller.add_country("ES", "Spanish", None, None).await.unwrap();

    let result = controller.translate_all("ES", &RecordingProgress::new()).await;

    assert!(result.is_err());
    assert_eq!(controller.stats().await.unwrap().translation_count, 0);
}

#[tokio::test]
async fn test_testPrompts_throughGemini_shouldReportDegradedReview() {
    let server = MockServer::start().await;
    let dir = common::create_temp_dir().unwrap();

    Mock::given(method("POST"))
        .and(body_string_contains("translation quality expert"))
        .respond_with(gemini_reply("I think it is great."))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(gemini_reply("¡Obtén __PLACEHOLDER_0__% de descuento en __PLACEHOLDER_1__ hoy!"))
        .with_priority(2)
        .mount(&server)
        .await;

    let controller = Controller::with_config(gemini_config(&server, dir.path()).await).unwrap();
    controller.add_country("MX", "Spanish", None, None).await.unwrap();

    let (report, promoted) = controller
        .test_prompts("MX", None, Some("Use Mexican Spanish".to_string()), None, false)
        .await
        .unwrap();

    assert!(report.degraded);
    assert_eq!(report.score, 85);
    assert_eq!(report.feedback, "Auto-approved");
    assert_eq!(report.translation, "¡Obtén <discount>% de descuento en <product> hoy!");
    assert!(promoted.is_none());
    let live = controller.get_country("MX").await.unwrap();
    assert_eq!(live.user_prompt, "");
}
