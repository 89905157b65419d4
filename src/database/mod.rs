/*!
 * Database module for persistent storage of ad copies, countries and translations.
 *
 * This module provides SQLite-based persistence for:
 * - Ad copy templates
 * - Per-country prompt configuration
 * - Translations with their quality scores
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::Repository;
