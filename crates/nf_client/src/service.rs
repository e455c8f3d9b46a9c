use nf_core::{Article, CacheStore, ConnectivityProbe, Error, PreferenceKey, Result, Section};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::decoder::{decode_articles, decode_sections};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::probe::TcpProbe;
use crate::url_builder::UrlBuilder;

/// Where a section list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionsOrigin {
    Network,
    Cache,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub section_id: Option<String>,
    pub page_size: String,
    pub search_term: Option<String>,
}

impl ArticleQuery {
    pub fn new(section_id: Option<&str>, page_size: &str) -> Self {
        Self {
            section_id: section_id.map(str::to_string),
            page_size: page_size.to_string(),
            search_term: None,
        }
    }

    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search_term = term.map(str::to_string);
        self
    }
}

/// Probe, fetch, decode and cache, one request at a time.
pub struct FeedService {
    urls: UrlBuilder,
    fetcher: Arc<dyn Fetcher>,
    probe: Arc<dyn ConnectivityProbe>,
    cache: Arc<dyn CacheStore>,
}

impl FeedService {
    pub fn new(
        urls: UrlBuilder,
        fetcher: Arc<dyn Fetcher>,
        probe: Arc<dyn ConnectivityProbe>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            urls,
            fetcher,
            probe,
            cache,
        }
    }

    /// Wire up the HTTP fetcher and a TCP probe against the configured API root.
    pub fn from_config(config: &ApiConfig, cache: Arc<dyn CacheStore>) -> Result<Self> {
        let urls = UrlBuilder::from_config(config)?;
        let fetcher = Arc::new(HttpFetcher::new(config)?);
        let probe = Arc::new(TcpProbe::for_base_url(&config.base_url, config.connect_timeout)?);
        Ok(Self::new(urls, fetcher, probe, cache))
    }

    pub fn with_probe(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Cached sections when a list has been saved before, otherwise the network.
    pub async fn load_sections(&self) -> Result<(Vec<Section>, SectionsOrigin)> {
        if self.cache.has_sections_loaded().await? {
            let sections = self.cache.get_saved_sections().await?;
            debug!("Using {} cached sections", sections.len());
            return Ok((sections, SectionsOrigin::Cache));
        }
        self.refresh_sections().await
    }

    /// Fetch the section list and replace the cache with it.
    ///
    /// Without connectivity the cached list is returned instead; with neither
    /// this fails with [`Error::Offline`].
    pub async fn refresh_sections(&self) -> Result<(Vec<Section>, SectionsOrigin)> {
        if !self.probe.is_connected().await {
            return self.cached_sections_or_offline().await;
        }

        let body = self.fetcher.fetch(&self.urls.build_sections_url()).await?;
        let sections = decode_sections(&body)?;
        if sections.is_empty() {
            warn!("Section request returned nothing");
            if self.cache.has_sections_loaded().await? {
                return Ok((self.cache.get_saved_sections().await?, SectionsOrigin::Cache));
            }
            return Ok((sections, SectionsOrigin::Network));
        }

        self.cache.save_sections(&sections).await?;
        info!("Fetched and cached {} sections", sections.len());
        Ok((sections, SectionsOrigin::Network))
    }

    /// Fetch articles. Articles are never cached, so this needs a connection.
    pub async fn load_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        if !self.probe.is_connected().await {
            return Err(Error::Offline);
        }

        let url = self.urls.build_articles_url(
            query.section_id.as_deref(),
            &query.page_size,
            query.search_term.as_deref(),
        );
        let body = self.fetcher.fetch(&url).await?;
        let articles = decode_articles(&body)?;
        info!("Fetched {} articles", articles.len());
        Ok(articles)
    }

    /// Fetch articles for the saved section and page size preferences.
    pub async fn load_articles_for_saved_preferences(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<Article>> {
        let section = self.cache.get_value_for_key(PreferenceKey::SelectedSection).await?;
        let page_size = self.cache.get_value_for_key(PreferenceKey::PageSize).await?;
        let query = ArticleQuery::new(Some(&section), &page_size).with_search(search_term);
        self.load_articles(&query).await
    }

    async fn cached_sections_or_offline(&self) -> Result<(Vec<Section>, SectionsOrigin)> {
        if self.cache.has_sections_loaded().await? {
            warn!("No network connection, using cached sections");
            Ok((self.cache.get_saved_sections().await?, SectionsOrigin::Cache))
        } else {
            Err(Error::Offline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;
    use async_trait::async_trait;
    use nf_storage::{InMemoryStore, PreferenceCache};
    use std::sync::Mutex;

    const SECTIONS: &str = r#"{"response": {"results": [
        {"id": "world", "webTitle": "World news"},
        {"id": "technology", "webTitle": "Technology"}
    ]}}"#;

    const ARTICLES: &str = r#"{"response": {"results": [{
        "sectionName": "World news", "webPublicationDate": "2024-03-01T10:15:00Z",
        "webTitle": "Headline", "webUrl": "https://example.com/a",
        "tags": [{"firstName": "Ada", "lastName": "Lovelace"}]
    }]}}"#;

    /// Serves one canned body and records every requested URL.
    struct CannedFetcher {
        body: String,
        requests: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    fn service(fetcher: Arc<CannedFetcher>, online: bool) -> FeedService {
        let urls = UrlBuilder::new("https://api.example.com", "k").unwrap();
        let cache = Arc::new(PreferenceCache::new(InMemoryStore::new()));
        FeedService::new(urls, fetcher, Arc::new(StaticProbe(online)), cache)
    }

    #[tokio::test]
    async fn test_refresh_sections_caches_result() {
        let fetcher = CannedFetcher::new(SECTIONS);
        let service = service(fetcher.clone(), true);

        let (sections, origin) = service.refresh_sections().await.unwrap();
        assert_eq!(origin, SectionsOrigin::Network);
        assert_eq!(sections.len(), 2);
        assert!(service.cache().has_sections_loaded().await.unwrap());
        assert_eq!(service.cache().get_saved_sections().await.unwrap(), sections);
        assert_eq!(
            fetcher.requests(),
            vec!["https://api.example.com/sections?api-key=k".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_sections_prefers_cache_once_loaded() {
        let fetcher = CannedFetcher::new(SECTIONS);
        let service = service(fetcher.clone(), true);

        service.load_sections().await.unwrap();
        let (sections, origin) = service.load_sections().await.unwrap();
        assert_eq!(origin, SectionsOrigin::Cache);
        assert_eq!(sections[0], Section::new("world", "World news"));
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_without_cache() {
        let service = service(CannedFetcher::new(SECTIONS), false);
        assert!(matches!(service.load_sections().await, Err(Error::Offline)));
        assert!(matches!(
            service.load_articles(&ArticleQuery::new(None, "10")).await,
            Err(Error::Offline)
        ));
    }

    #[tokio::test]
    async fn test_offline_refresh_falls_back_to_cache() {
        let service = service(CannedFetcher::new(""), false);
        service
            .cache()
            .save_sections(&[Section::new("sport", "Sport")])
            .await
            .unwrap();

        let (sections, origin) = service.refresh_sections().await.unwrap();
        assert_eq!(origin, SectionsOrigin::Cache);
        assert_eq!(sections, vec![Section::new("sport", "Sport")]);
    }

    #[tokio::test]
    async fn test_empty_body_does_not_mark_loaded() {
        let service = service(CannedFetcher::new(""), true);
        let (sections, origin) = service.refresh_sections().await.unwrap();
        assert!(sections.is_empty());
        assert_eq!(origin, SectionsOrigin::Network);
        assert!(!service.cache().has_sections_loaded().await.unwrap());
    }

    #[tokio::test]
    async fn test_decode_error_propagates() {
        let service = service(CannedFetcher::new(r#"{"oops": true}"#), true);
        assert!(matches!(
            service.refresh_sections().await,
            Err(Error::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_articles_use_saved_preferences() {
        let fetcher = CannedFetcher::new(ARTICLES);
        let service = service(fetcher.clone(), true);
        service
            .cache()
            .set_value_for_key(PreferenceKey::PageSize, "25")
            .await
            .unwrap();

        let articles = service.load_articles_for_saved_preferences(None).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].byline().as_deref(), Some("Ada Lovelace"));

        let requested = fetcher.requests();
        assert!(requested[0].starts_with("https://api.example.com/world?"));
        assert!(requested[0].contains("page-size=25"));
    }

    #[tokio::test]
    async fn test_search_query() {
        let fetcher = CannedFetcher::new(ARTICLES);
        let service = service(fetcher.clone(), true);
        let query = ArticleQuery::new(Some("technology"), "30").with_search(Some("rust"));

        service.load_articles(&query).await.unwrap();
        let requested = fetcher.requests();
        assert!(requested[0].contains("/search?q=rust&section=technology"));
        assert!(requested[0].contains("page-size=10"));
    }
}
