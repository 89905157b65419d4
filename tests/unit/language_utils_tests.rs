/*!
 * Tests for language name resolution
 */

use adsync::language_utils::{language_from_code, resolve_language_name};

#[test]
fn test_resolveLanguageName_withCommonMarkets_shouldResolve() {
    for (input, expected) in [
        ("French", "French"),
        ("german", "German"),
        ("ja", "Japanese"),
        ("pt", "Portuguese"),
        ("ita", "Italian"),
    ] {
        assert_eq!(resolve_language_name(input).unwrap(), expected, "input {}", input);
    }
}

#[test]
fn test_languageFromCode_withInvalidLength_shouldReturnNone() {
    assert!(language_from_code("f").is_none());
    assert!(language_from_code("fren").is_none());
}

#[test]
fn test_resolveLanguageName_withMadeUpName_shouldFail() {
    assert!(resolve_language_name("Elvish Deluxe").is_err());
}
