/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::{DatabaseConnection, DatabaseStats};
use super::models::{
    normalize_country_code, now_timestamp, AdCopy, AdCopyUpdate, CountryPrompt, NewAdCopy, NewCountryPrompt,
    NewTranslation, Translation, TranslationFilter, TranslationUpdate,
};
use crate::errors::StoreError;

type StoreResult<T> = Result<T, StoreError>;

const AD_COPY_COLUMNS: &str = "id, headline, body, link_text, product, created_at";
const COUNTRY_COLUMNS: &str = "id, country_code, language, system_prompt, user_prompt, created_at";
const TRANSLATION_COLUMNS: &str = "id, ad_copy_id, country_code, language, headline, body, link_text, product, quality_score, created_at";

/// Repository for database operations
#[derive(Clone, Debug)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Record counts for the status overview
    pub async fn stats(&self) -> StoreResult<DatabaseStats> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.stats())
            .await
            .map_err(|e| StoreError::Connection(format!("Database task panicked: {}", e)))?
    }

    // =========================================================================
    // Ad Copy Operations
    // =========================================================================

    /// Insert a new ad copy
    pub async fn create_ad_copy(&self, ad: &NewAdCopy) -> StoreResult<AdCopy> {
        ad.validate()?;
        let ad = ad.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT INTO ad_copies (headline, body, link_text, product, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![ad.headline, ad.body, ad.link_text, ad.product, now_timestamp()],
                )?;
                let id = conn.last_insert_rowid();
                debug!("Created ad copy {}", id);
                Self::get_ad_copy_sync(conn, id)?.ok_or_else(|| StoreError::not_found("ad copy", id))
            })
            .await
    }

    /// Get an ad copy by ID
    pub async fn get_ad_copy(&self, id: i64) -> StoreResult<Option<AdCopy>> {
        self.db
            .execute_async(move |conn| Self::get_ad_copy_sync(conn, id))
            .await
    }

    fn get_ad_copy_sync(conn: &Connection, id: i64) -> StoreResult<Option<AdCopy>> {
        let sql = format!("SELECT {} FROM ad_copies WHERE id = ?1", AD_COPY_COLUMNS);
        Ok(conn.query_row(&sql, [id], ad_copy_from_row).optional()?)
    }

    /// List all ad copies, newest first
    pub async fn list_ad_copies(&self) -> StoreResult<Vec<AdCopy>> {
        self.db
            .execute_async(|conn| {
                let sql = format!(
                    "SELECT {} FROM ad_copies ORDER BY created_at DESC, id DESC",
                    AD_COPY_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], ad_copy_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    /// Fetch the given ad copies in the order requested
    pub async fn get_ad_copies(&self, ids: &[i64]) -> StoreResult<Vec<AdCopy>> {
        let ids = ids.to_vec();

        self.db
            .execute_async(move |conn| {
                ids.iter()
                    .map(|&id| {
                        Self::get_ad_copy_sync(conn, id)?
                            .ok_or_else(|| StoreError::not_found("ad copy", id))
                    })
                    .collect()
            })
            .await
    }

    /// Replace every editable field of an ad copy
    pub async fn update_ad_copy(&self, id: i64, ad: &AdCopyUpdate) -> StoreResult<AdCopy> {
        ad.validate()?;
        let ad = ad.clone();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE ad_copies SET headline = ?1, body = ?2, link_text = ?3, product = ?4 WHERE id = ?5",
                    params![ad.headline, ad.body, ad.link_text, ad.product, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::not_found("ad copy", id));
                }
                Self::get_ad_copy_sync(conn, id)?.ok_or_else(|| StoreError::not_found("ad copy", id))
            })
            .await
    }

    /// Delete an ad copy; its translations are kept
    pub async fn delete_ad_copy(&self, id: i64) -> StoreResult<()> {
        self.delete_by_id("ad_copies", "ad copy", id).await
    }

    // =========================================================================
    // Country Operations
    // =========================================================================

    /// Add a country prompt configuration
    pub async fn create_country(&self, country: &NewCountryPrompt) -> StoreResult<CountryPrompt> {
        country.validate()?;
        let country = country.clone();

        self.db
            .execute_async(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO country_prompts (country_code, language, system_prompt, user_prompt, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        country.country_code,
                        country.language,
                        country.system_prompt,
                        country.user_prompt,
                        now_timestamp()
                    ],
                );

                match inserted {
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        return Err(StoreError::invalid(
                            "country",
                            format!("country code {} already exists", country.country_code),
                        ));
                    }
                    other => {
                        other?;
                    }
                }

                let id = conn.last_insert_rowid();
                Self::get_country_sync(conn, id)?.ok_or_else(|| StoreError::not_found("country", id))
            })
            .await
    }

    /// Get a country by ID
    pub async fn get_country(&self, id: i64) -> StoreResult<Option<CountryPrompt>> {
        self.db
            .execute_async(move |conn| Self::get_country_sync(conn, id))
            .await
    }

    fn get_country_sync(conn: &Connection, id: i64) -> StoreResult<Option<CountryPrompt>> {
        let sql = format!("SELECT {} FROM country_prompts WHERE id = ?1", COUNTRY_COLUMNS);
        Ok(conn.query_row(&sql, [id], country_from_row).optional()?)
    }

    /// Get a country by its two-letter code (case-insensitive)
    pub async fn get_country_by_code(&self, code: &str) -> StoreResult<Option<CountryPrompt>> {
        let code = normalize_country_code(code);

        self.db
            .execute_async(move |conn| {
                let sql = format!(
                    "SELECT {} FROM country_prompts WHERE country_code = ?1",
                    COUNTRY_COLUMNS
                );
                Ok(conn.query_row(&sql, [code], country_from_row).optional()?)
            })
            .await
    }

    /// List all countries in insertion order
    pub async fn list_countries(&self) -> StoreResult<Vec<CountryPrompt>> {
        self.db
            .execute_async(|conn| {
                let sql = format!("SELECT {} FROM country_prompts ORDER BY id", COUNTRY_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], country_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    /// Replace the live prompts of a country
    pub async fn update_country_prompts(
        &self,
        id: i64,
        system_prompt: &str,
        user_prompt: &str,
    ) -> StoreResult<CountryPrompt> {
        let system_prompt = system_prompt.to_string();
        let user_prompt = user_prompt.to_string();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE country_prompts SET system_prompt = ?1, user_prompt = ?2 WHERE id = ?3",
                    params![system_prompt, user_prompt, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::not_found("country", id));
                }
                Self::get_country_sync(conn, id)?.ok_or_else(|| StoreError::not_found("country", id))
            })
            .await
    }

    /// Delete a country configuration
    pub async fn delete_country(&self, id: i64) -> StoreResult<()> {
        self.delete_by_id("country_prompts", "country", id).await
    }

    // =========================================================================
    // Translation Operations
    // =========================================================================

    /// Insert a translation row
    pub async fn insert_translation(&self, translation: &NewTranslation) -> StoreResult<Translation> {
        translation.validate()?;
        let t = translation.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translations (
                        ad_copy_id, country_code, language, headline, body,
                        link_text, product, quality_score, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    params![
                        t.ad_copy_id,
                        t.country_code,
                        t.language,
                        t.headline,
                        t.body,
                        t.link_text,
                        t.product,
                        t.quality_score,
                        now_timestamp(),
                    ],
                )?;
                let id = conn.last_insert_rowid();
                debug!("Stored translation {} ({} -> {})", id, t.ad_copy_id, t.country_code);
                Self::get_translation_sync(conn, id)?
                    .ok_or_else(|| StoreError::not_found("translation", id))
            })
            .await
    }

    /// Get a translation by ID
    pub async fn get_translation(&self, id: i64) -> StoreResult<Option<Translation>> {
        self.db
            .execute_async(move |conn| Self::get_translation_sync(conn, id))
            .await
    }

    fn get_translation_sync(conn: &Connection, id: i64) -> StoreResult<Option<Translation>> {
        let sql = format!("SELECT {} FROM translations WHERE id = ?1", TRANSLATION_COLUMNS);
        Ok(conn.query_row(&sql, [id], translation_from_row).optional()?)
    }

    /// List translations matching the filter, newest first
    pub async fn list_translations(&self, filter: &TranslationFilter) -> StoreResult<Vec<Translation>> {
        let country_code = filter.country_code.as_deref().map(normalize_country_code);
        let ad_copy_id = filter.ad_copy_id;
        let min_quality = filter.min_quality;

        self.db
            .execute_async(move |conn| {
                let sql = format!(
                    r#"
                    SELECT {} FROM translations
                    WHERE (?1 IS NULL OR country_code = ?1)
                      AND (?2 IS NULL OR ad_copy_id = ?2)
                      AND quality_score >= ?3
                    ORDER BY created_at DESC, id DESC
                    "#,
                    TRANSLATION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![country_code, ad_copy_id, min_quality], translation_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    /// Whether the ad copy already has a translation for the country
    pub async fn translation_exists(&self, ad_copy_id: i64, country_code: &str) -> StoreResult<bool> {
        let country_code = normalize_country_code(country_code);

        self.db
            .execute_async(move |conn| {
                let found: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM translations WHERE ad_copy_id = ?1 AND country_code = ?2 LIMIT 1",
                        params![ad_copy_id, country_code],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(found.is_some())
            })
            .await
    }

    /// Replace the text fields of a translation; the score is left untouched
    pub async fn update_translation(&self, id: i64, update: &TranslationUpdate) -> StoreResult<Translation> {
        let u = update.clone();

        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE translations SET headline = ?1, body = ?2, link_text = ?3, product = ?4 WHERE id = ?5",
                    params![u.headline, u.body, u.link_text, u.product, id],
                )?;
                if changed == 0 {
                    return Err(StoreError::not_found("translation", id));
                }
                Self::get_translation_sync(conn, id)?
                    .ok_or_else(|| StoreError::not_found("translation", id))
            })
            .await
    }

    /// Delete a translation
    pub async fn delete_translation(&self, id: i64) -> StoreResult<()> {
        self.delete_by_id("translations", "translation", id).await
    }

    async fn delete_by_id(&self, table: &'static str, entity: &'static str, id: i64) -> StoreResult<()> {
        self.db
            .execute_async(move |conn| {
                let sql = format!("DELETE FROM {} WHERE id = ?1", table);
                let changed = conn.execute(&sql, [id])?;
                if changed == 0 {
                    return Err(StoreError::not_found(entity, id));
                }
                debug!("Deleted {} {}", entity, id);
                Ok(())
            })
            .await
    }
}

fn ad_copy_from_row(row: &Row) -> rusqlite::Result<AdCopy> {
    Ok(AdCopy {
        id: row.get(0)?,
        headline: row.get(1)?,
        body: row.get(2)?,
        link_text: row.get(3)?,
        product: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn country_from_row(row: &Row) -> rusqlite::Result<CountryPrompt> {
    Ok(CountryPrompt {
        id: row.get(0)?,
        country_code: row.get(1)?,
        language: row.get(2)?,
        system_prompt: row.get(3)?,
        user_prompt: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn translation_from_row(row: &Row) -> rusqlite::Result<Translation> {
    Ok(Translation {
        id: row.get(0)?,
        ad_copy_id: row.get(1)?,
        country_code: row.get(2)?,
        language: row.get(3)?,
        headline: row.get(4)?,
        body: row.get(5)?,
        link_text: row.get(6)?,
        product: row.get(7)?,
        quality_score: row.get(8)?,
        created_at: row.get(9)?,
    })
}
