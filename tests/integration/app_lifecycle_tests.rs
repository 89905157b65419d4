/*!
 * Full app lifecycle tests through the controller
 */

use std::sync::Arc;

use adsync::app_config::Config;
use adsync::app_controller::{Controller, FieldEdits};
use adsync::database::models::{NewAdCopy, QualityBand, TranslationFilter};
use adsync::translation::{NoProgress, RecordingProgress};

use crate::common::{self, mock_providers::RoutingProvider};

fn file_backed_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.database_path = common::database_path(dir).to_string_lossy().to_string();
    config
}

#[tokio::test]
async fn test_controller_withFileDatabase_shouldPersistAcrossInstances() {
    let dir = common::create_temp_dir().unwrap();
    let config = file_backed_config(dir.path());

    {
        let controller = Controller::with_config(config.clone()).unwrap();
        controller
            .create_ad_copy(NewAdCopy::new("Winter deals", "Warm up with <product>"))
            .await
            .unwrap();
        controller.add_country("se", "Swedish", None, None).await.unwrap();
    }

    let reopened = Controller::with_config(config).unwrap();
    let stats = reopened.stats().await.unwrap();
    assert_eq!(stats.ad_copy_count, 1);
    assert_eq!(stats.country_count, 1);
    assert_eq!(reopened.get_country("SE").await.unwrap().language, "Swedish");
}

#[tokio::test]
async fn test_adCopyLifecycle_shouldCreateUpdateAndDelete() {
    let controller = Controller::new_for_test().unwrap();

    let ad = controller
        .create_ad_copy(NewAdCopy::new("Old headline", "Body <x>").product("Widget"))
        .await
        .unwrap();
    let edits = FieldEdits {
        headline: Some("New headline".to_string()),
        ..Default::default()
    };
    let updated = controller.update_ad_copy(ad.id, &edits).await.unwrap();

    assert_eq!(updated.headline, "New headline");
    assert_eq!(updated.body, "Body <x>");
    assert_eq!(updated.product, "Widget");

    controller.delete_ad_copy(ad.id).await.unwrap();
    assert!(controller.get_ad_copy(ad.id).await.is_err());
    assert!(controller.delete_ad_copy(ad.id).await.is_err());
}

#[tokio::test]
async fn test_createAdCopy_withBlankBody_shouldBeRejected() {
    let controller = Controller::new_for_test().unwrap();

    let result = controller.create_ad_copy(NewAdCopy::new("Headline", "   ")).await;

    assert!(result.is_err());
    assert!(controller.list_ad_copies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_addCountry_withDuplicateOrBadCode_shouldFail() {
    let controller = Controller::new_for_test().unwrap();
    controller.add_country("FR", "French", None, None).await.unwrap();

    assert!(controller.add_country("fr", "French", None, None).await.is_err());
    assert!(controller.add_country("FRA", "French", None, None).await.is_err());
    assert!(controller.add_country("F1", "French", None, None).await.is_err());
    assert_eq!(controller.list_countries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_translateThenCurate_shouldFilterUpdateAndDelete() {
    let repo = adsync::Repository::new_in_memory().unwrap();
    let provider = RoutingProvider::new(72);
    let controller = Controller::with_parts(Config::default(), repo, Some(Arc::new(provider.clone())));

    let first = controller
        .create_ad_copy(NewAdCopy::new("First", "Try <product>"))
        .await
        .unwrap();
    let second = controller
        .create_ad_copy(NewAdCopy::new("Second", "Love <product>"))
        .await
        .unwrap();
    controller.add_country("FR", "French", None, None).await.unwrap();
    controller.add_country("DE", "German", None, None).await.unwrap();

    let summary = controller
        .translate(
            &[first.id, second.id],
            &["fr".to_string(), "de".to_string()],
            &RecordingProgress::new(),
        )
        .await
        .unwrap();
    assert_eq!(summary.created_count(), 4);

    let french = controller
        .list_translations(&TranslationFilter {
            country_code: Some("FR".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(french.len(), 2);
    assert!(french.iter().all(|t| t.quality_band() == QualityBand::Medium));

    let for_second = controller
        .list_translations(&TranslationFilter {
            ad_copy_id: Some(second.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(for_second.len(), 2);

    let high_only = controller
        .list_translations(&TranslationFilter {
            min_quality: 80,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(high_only.is_empty());

    let target = &french[0];
    let edited = controller
        .update_translation(
            target.id,
            &FieldEdits {
                body: Some("Essayez <product> !".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.body, "Essayez <product> !");
    assert_eq!(edited.quality_score, 72);
    assert_eq!(edited.headline, target.headline);

    controller.delete_translation(target.id).await.unwrap();
    assert_eq!(controller.stats().await.unwrap().translation_count, 3);
}

#[tokio::test]
async fn test_deleteAdCopy_shouldLeaveTranslations() {
    let provider = RoutingProvider::new(90);
    let controller = Controller::with_parts(
        Config::default(),
        adsync::Repository::new_in_memory().unwrap(),
        Some(Arc::new(provider)),
    );
    let ad = controller
        .create_ad_copy(NewAdCopy::new("Gone soon", "Body"))
        .await
        .unwrap();
    controller.add_country("IT", "Italian", None, None).await.unwrap();
    controller.translate_all("IT", &NoProgress).await.unwrap();

    controller.delete_ad_copy(ad.id).await.unwrap();

    let orphans = controller
        .list_translations(&TranslationFilter {
            ad_copy_id: Some(ad.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(orphans.len(), 1);
}

#[tokio::test]
async fn test_translate_withEmptySelection_shouldFail() {
    let controller = Controller::new_for_test().unwrap();

    assert!(controller.translate(&[], &["FR".to_string()], &NoProgress).await.is_err());
}
