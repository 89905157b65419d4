/*!
 * Common test utilities for the adsync test suite
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use adsync::database::models::{AdCopy, CountryPrompt, NewAdCopy, NewCountryPrompt};
use adsync::database::Repository;

// Re-export the mock providers module
pub mod mock_providers;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Path of a database file inside `dir`
pub fn database_path(dir: &Path) -> PathBuf {
    dir.join("adsync-test.db")
}

/// The two ad copies used across scenarios
pub fn sample_ads() -> Vec<NewAdCopy> {
    vec![
        NewAdCopy::new("Get 50% off today!", "Shop now and save on <product>...")
            .link_text("Shop now")
            .product("Sneakers"),
        NewAdCopy::new("Free shipping", "Order <product> before <deadline> and ship for free."),
    ]
}

/// Three target countries
pub fn sample_countries() -> Vec<NewCountryPrompt> {
    vec![
        NewCountryPrompt::new("FR", "French").system_prompt("You are a French copywriter."),
        NewCountryPrompt::new("DE", "German").system_prompt("You are a German copywriter."),
        NewCountryPrompt::new("JP", "Japanese")
            .system_prompt("You are a Japanese copywriter.")
            .user_prompt("Use polite form."),
    ]
}

/// In-memory repository with the sample ads and countries
pub async fn seeded_repository() -> Result<(Repository, Vec<AdCopy>, Vec<CountryPrompt>)> {
    let repo = Repository::new_in_memory()?;

    let mut ads = Vec::new();
    for ad in sample_ads() {
        ads.push(repo.create_ad_copy(&ad).await?);
    }

    let mut countries = Vec::new();
    for country in sample_countries() {
        countries.push(repo.create_country(&country).await?);
    }

    Ok((repo, ads, countries))
}

/// Enable log output for a test run when RUST_LOG is set
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
