/*!
 * End-to-end tests for bulk translation over an in-memory store
 */

use std::sync::Arc;

use adsync::database::models::{NewTranslation, TranslationFilter};
use adsync::errors::{ProviderError, TranslationError};
use adsync::providers::Provider;
use adsync::translation::progress::ProgressEvent;
use adsync::translation::{BulkTranslator, Proofreader, RecordingProgress, Translator};

use crate::common::{self, mock_providers::RoutingProvider};

fn bulk_for(repo: &adsync::Repository, provider: &RoutingProvider) -> BulkTranslator {
    let provider: Arc<dyn Provider> = Arc::new(provider.clone());
    BulkTranslator::new(
        repo.clone(),
        Translator::new(provider.clone()),
        Proofreader::new(provider),
    )
}

#[tokio::test]
async fn test_translate_twoAdsThreeCountries_shouldCreateSixRowsAndSixUpdates() {
    common::init_test_logging();
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    let provider = RoutingProvider::new(91);
    let progress = RecordingProgress::new();

    let summary = bulk_for(&repo, &provider)
        .translate(&ads, &countries, &progress)
        .await
        .unwrap();

    assert_eq!(summary.created_count(), 6);
    assert_eq!(summary.degraded, 0);
    let stored = repo.list_translations(&TranslationFilter::default()).await.unwrap();
    assert_eq!(stored.len(), 6);

    let advances = progress.advances();
    assert_eq!(advances.len(), 6);
    assert_eq!(advances, (1..=6).map(|done| (done, 6)).collect::<Vec<_>>());
    assert_eq!(progress.events().first(), Some(&ProgressEvent::Started(6)));

    // first ad has all four fields, second only headline and body
    assert_eq!(provider.translate_calls(), 3 * 4 + 3 * 2);
    assert_eq!(provider.proofread_calls(), 6);
}

#[tokio::test]
async fn test_translate_shouldVisitPairsAdMajor() {
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    let provider = RoutingProvider::new(80);

    let summary = bulk_for(&repo, &provider)
        .translate(&ads, &countries, &RecordingProgress::new())
        .await
        .unwrap();

    let order: Vec<(i64, &str)> = summary
        .created
        .iter()
        .map(|t| (t.ad_copy_id, t.country_code.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (ads[0].id, "FR"),
            (ads[0].id, "DE"),
            (ads[0].id, "JP"),
            (ads[1].id, "FR"),
            (ads[1].id, "DE"),
            (ads[1].id, "JP"),
        ]
    );
}

#[tokio::test]
async fn test_translate_frenchScenario_shouldKeepProductTagInBody() {
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    let provider = RoutingProvider::new(88);
    let french = countries.iter().find(|c| c.language == "French").unwrap().clone();

    let summary = bulk_for(&repo, &provider)
        .translate(&ads[..1], &[french], &RecordingProgress::new())
        .await
        .unwrap();

    let row = &summary.created[0];
    assert_eq!(row.language, "French");
    assert!(row.body.contains("<product>"), "body was {}", row.body);
    assert!(row.body.ends_with("(checked)"), "body should be the corrected text");
    assert_eq!(row.headline, "[French] Get 50% off today!");
    assert_eq!(row.link_text, "[French] Shop now");
    assert_eq!(row.product, "[French] Sneakers");
    assert_eq!(row.quality_score, 88);

    let sent = provider.prompts();
    assert!(sent.iter().all(|p| !p.contains("Text to translate:\nShop now and save on <product>")));
    assert!(sent.iter().any(|p| p.starts_with("You are a French copywriter.")));
}

#[tokio::test]
async fn test_translate_withFailureMidway_shouldKeepEarlierRows() {
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    // first pair needs 4 translations + 1 proofread, the second pair fails on its headline
    let provider = RoutingProvider::new(75).failing_after(5);
    let progress = RecordingProgress::new();

    let result = bulk_for(&repo, &provider).translate(&ads, &countries, &progress).await;

    assert!(matches!(
        result,
        Err(TranslationError::Provider(ProviderError::ApiError { status_code: 503, .. }))
    ));
    let stored = repo.list_translations(&TranslationFilter::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].country_code, "FR");
    assert_eq!(progress.advances(), vec![(1, 6)]);
    assert_eq!(provider.calls(), 6);
}

#[tokio::test]
async fn test_translateAllTo_withExistingRow_shouldSkipWithoutModelCalls() {
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    let german = countries.iter().find(|c| c.country_code == "DE").unwrap().clone();
    repo.insert_translation(&NewTranslation {
        ad_copy_id: ads[0].id,
        country_code: "DE".to_string(),
        language: "German".to_string(),
        headline: "Heute 50% Rabatt!".to_string(),
        body: "Jetzt kaufen und bei <product> sparen...".to_string(),
        link_text: "Jetzt kaufen".to_string(),
        product: "Turnschuhe".to_string(),
        quality_score: 97,
    })
    .await
    .unwrap();
    let provider = RoutingProvider::new(82);
    let progress = RecordingProgress::new();

    let summary = bulk_for(&repo, &provider)
        .translate_all_to(&german, &ads, &progress)
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.created_count(), 1);
    assert_eq!(summary.created[0].ad_copy_id, ads[1].id);
    // only the second ad (headline + body + proofread)
    assert_eq!(provider.calls(), 3);
    assert_eq!(progress.advances(), vec![(1, 2), (2, 2)]);

    let german_rows = repo
        .list_translations(&TranslationFilter {
            country_code: Some("DE".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(german_rows.len(), 2);
}

#[tokio::test]
async fn test_translateAllTo_runTwice_shouldNotDuplicate() {
    let (repo, ads, countries) = common::seeded_repository().await.unwrap();
    let japan = countries.iter().find(|c| c.country_code == "JP").unwrap().clone();
    let provider = RoutingProvider::new(90);
    let bulk = bulk_for(&repo, &provider);

    let first = bulk.translate_all_to(&japan, &ads, &RecordingProgress::new()).await.unwrap();
    let second = bulk.translate_all_to(&japan, &ads, &RecordingProgress::new()).await.unwrap();

    assert_eq!(first.created_count(), 2);
    assert_eq!(second.created_count(), 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(repo.stats().await.unwrap().translation_count, 2);
}
