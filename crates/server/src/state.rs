//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StudioConfig;
use crate::db::RepositoryError;
use crate::db::site_config::SiteConfigRepository;
use crate::gemini::GeminiClient;
use crate::models::SiteConfig;

/// How long a cached site config is served before re-reading the store.
const SITE_CONFIG_TTL: Duration = Duration::from_secs(300);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StudioConfig,
    pool: PgPool,
    gemini: GeminiClient,
    site_config: Cache<(), SiteConfig>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StudioConfig, pool: PgPool) -> Self {
        let gemini = GeminiClient::new(&config.gemini);
        let site_config = Cache::builder()
            .max_capacity(1)
            .time_to_live(SITE_CONFIG_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gemini,
                site_config,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Gemini client.
    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }

    /// Read the site configuration, cache-first.
    ///
    /// Falls back to compiled-in defaults when the singleton has never been
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store read fails on a cache
    /// miss.
    pub async fn site_config(&self) -> Result<SiteConfig, RepositoryError> {
        if let Some(config) = self.inner.site_config.get(&()).await {
            return Ok(config);
        }

        let config = SiteConfigRepository::new(self.pool())
            .get()
            .await?
            .unwrap_or_default();
        self.inner.site_config.insert((), config.clone()).await;

        Ok(config)
    }

    /// Write the site configuration through to the store and refresh the
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store write fails; the
    /// cache is left untouched in that case.
    pub async fn put_site_config(&self, config: SiteConfig) -> Result<(), RepositoryError> {
        SiteConfigRepository::new(self.pool())
            .upsert(&config)
            .await?;
        self.inner.site_config.insert((), config).await;

        Ok(())
    }
}
