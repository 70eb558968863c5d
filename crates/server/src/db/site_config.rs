//! SEO/site configuration repository.
//!
//! A singleton row keyed by a fixed boolean primary key. Reads go through the
//! in-process cache on [`crate::state::AppState`]; writes come only from the
//! administrator surface and refresh the cache.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::SiteConfig;

#[derive(Debug, sqlx::FromRow)]
struct SiteConfigRow {
    title: String,
    description: String,
    keywords: String,
    author: String,
    support_link: Option<String>,
}

impl From<SiteConfigRow> for SiteConfig {
    fn from(row: SiteConfigRow) -> Self {
        Self {
            title: row.title,
            description: row.description,
            keywords: row.keywords,
            author: row.author,
            support_link: row.support_link,
        }
    }
}

/// Repository for the site configuration singleton.
pub struct SiteConfigRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SiteConfigRepository<'a> {
    /// Create a new site config repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read the singleton, if it has ever been written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<SiteConfig>, RepositoryError> {
        let row: Option<SiteConfigRow> = sqlx::query_as(
            "SELECT title, description, keywords, author, support_link \
             FROM site_config WHERE singleton",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(SiteConfig::from))
    }

    /// Write the singleton (insert or overwrite, last writer wins).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert(&self, config: &SiteConfig) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO site_config (singleton, title, description, keywords, author, support_link) \
             VALUES (TRUE, $1, $2, $3, $4, $5) \
             ON CONFLICT (singleton) DO UPDATE SET \
             title = EXCLUDED.title, description = EXCLUDED.description, \
             keywords = EXCLUDED.keywords, author = EXCLUDED.author, \
             support_link = EXCLUDED.support_link",
        )
        .bind(&config.title)
        .bind(&config.description)
        .bind(&config.keywords)
        .bind(&config.author)
        .bind(&config.support_link)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
