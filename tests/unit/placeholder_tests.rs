/*!
 * Tests for placeholder protection and the translator built on it
 */

use std::sync::Arc;

use adsync::providers::mock::MockProvider;
use adsync::translation::placeholders::{extract_placeholders, PlaceholderMap};
use adsync::translation::{TranslationTarget, Translator};

const SAMPLES: &[&str] = &[
    "",
    "No tags at all.",
    "<product>",
    "Get <discount>% off on <product> today!",
    "<a><b><a><c><b>",
    "Unicode: <produit> à <prix> € - <produit>",
    "Spans 3 < 4 and 5 > 2, then <tag with spaces>",
    "Stray > then <unclosed",
];

#[test]
fn test_protect_thenRestore_shouldReturnOriginalForAllSamples() {
    for sample in SAMPLES {
        let (map, protected) = PlaceholderMap::protect(sample);
        assert_eq!(&map.restore(&protected), sample, "round trip failed for {:?}", sample);
    }
}

#[test]
fn test_protect_shouldRemoveEveryTagFromPromptText() {
    for sample in SAMPLES {
        let (map, protected) = PlaceholderMap::protect(sample);
        assert!(extract_placeholders(&protected).is_empty(), "tag left in {:?}", protected);
        for tag in map.tags() {
            assert!(sample.contains(tag.as_str()));
        }
    }
}

#[test]
fn test_protect_distinctTags_shouldEachGetOwnSentinel() {
    let (map, protected) = PlaceholderMap::protect("<a> <b> <c>");

    assert_eq!(map.len(), 3);
    assert_eq!(protected, "__PLACEHOLDER_0__ __PLACEHOLDER_1__ __PLACEHOLDER_2__");
}

#[tokio::test]
async fn test_translateText_withoutTags_shouldSendTextUnchanged() {
    let mock = MockProvider::working();
    let translator = Translator::new(Arc::new(mock.clone()));
    let target = TranslationTarget::new("Italian", "sys", "usr");

    let result = translator.translate_text("Plain offer", &target).await.unwrap();

    assert_eq!(result, "Plain offer");
    assert_eq!(mock.request_count(), 1);
    assert!(mock.last_prompt().unwrap().contains("Text to translate:\nPlain offer\n"));
}

#[tokio::test]
async fn test_translateText_withDistinctTags_shouldKeepEachTagVerbatim() {
    let mock = MockProvider::working();
    let translator = Translator::new(Arc::new(mock));
    let target = TranslationTarget::new("Spanish", "sys", "");
    let text = "Save <discount>% on <product> until <date>";

    let result = translator.translate_text(text, &target).await.unwrap();

    for tag in extract_placeholders(text) {
        assert!(result.contains(&tag), "{} missing from {}", tag, result);
    }
}
