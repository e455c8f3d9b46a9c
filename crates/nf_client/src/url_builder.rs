use nf_core::{Error, Result};
use url::Url;

use crate::config::ApiConfig;

const SECTIONS_PATH: &str = "sections";
const SEARCH_PATH: &str = "search";

/// Page size used for every search request, regardless of the saved preference.
pub const SEARCH_PAGE_SIZE: &str = "10";

/// Builds request URLs against a fixed API root.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    api_key: String,
}

impl UrlBuilder {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!(
                "{}: cannot be used as a base for request paths",
                base_url
            )));
        }
        Ok(Self {
            base,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.api_key)
    }

    /// `<base>/sections?api-key=<key>`
    pub fn build_sections_url(&self) -> String {
        let mut url = self.with_path(SECTIONS_PATH);
        url.query_pairs_mut().append_pair("api-key", &self.api_key);
        url.into()
    }

    /// Article listing for a section (or every section), newest first.
    ///
    /// A non-empty `search_term` switches to the search endpoint, filtered by
    /// `section_id` when one is given, with a fixed page size of
    /// [`SEARCH_PAGE_SIZE`]. Both forms share the same encoded query builder.
    pub fn build_articles_url(
        &self,
        section_id: Option<&str>,
        page_size: &str,
        search_term: Option<&str>,
    ) -> String {
        let section_id = section_id.filter(|id| !id.is_empty());
        let search_term = search_term.map(str::trim).filter(|term| !term.is_empty());

        let (mut url, page_size) = match search_term {
            Some(term) => {
                let mut url = self.with_path(SEARCH_PATH);
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("q", term);
                    if let Some(id) = section_id {
                        query.append_pair("section", id);
                    }
                }
                (url, SEARCH_PAGE_SIZE)
            }
            None => (self.with_path(section_id.unwrap_or(SECTIONS_PATH)), page_size),
        };

        url.query_pairs_mut()
            .append_pair("show-tags", "contributor")
            .append_pair("order-by", "newest")
            .append_pair("page-size", page_size)
            .append_pair("api-key", &self.api_key);

        tracing::debug!("Built articles URL for section {:?}", section_id);
        url.into()
    }

    fn with_path(&self, segment: &str) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("https://content.guardianapis.com", "test").unwrap()
    }

    #[test]
    fn test_sections_url() {
        assert_eq!(
            builder().build_sections_url(),
            "https://content.guardianapis.com/sections?api-key=test"
        );
    }

    #[test]
    fn test_articles_url_for_section() {
        let url = builder().build_articles_url(Some("technology"), "20", None);
        assert!(url.starts_with("https://content.guardianapis.com/technology?"));
        assert!(url.contains("show-tags=contributor"));
        assert!(url.contains("order-by=newest"));
        assert!(url.contains("page-size=20"));
        assert!(url.contains("api-key=test"));
    }

    #[test]
    fn test_articles_url_without_section_uses_sections_path() {
        let url = builder().build_articles_url(None, "5", None);
        assert_eq!(
            url,
            "https://content.guardianapis.com/sections?show-tags=contributor&order-by=newest&page-size=5&api-key=test"
        );
    }

    #[test]
    fn test_empty_search_term_is_ignored() {
        let with_empty = builder().build_articles_url(Some("world"), "15", Some(""));
        let without = builder().build_articles_url(Some("world"), "15", None);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_search_url_is_encoded_and_uses_fixed_page_size() {
        let url = builder().build_articles_url(Some("world"), "50", Some("climate & energy"));
        assert_eq!(
            url,
            "https://content.guardianapis.com/search?q=climate+%26+energy&section=world&show-tags=contributor&order-by=newest&page-size=10&api-key=test"
        );
    }

    #[test]
    fn test_search_without_section() {
        let url = builder().build_articles_url(None, "50", Some("rust"));
        assert!(url.contains("/search?q=rust&show-tags"));
        assert!(!url.contains("section="));
    }

    #[test]
    fn test_base_with_path_prefix() {
        let builder = UrlBuilder::new("http://localhost:8080/api/", "k").unwrap();
        assert_eq!(
            builder.build_sections_url(),
            "http://localhost:8080/api/sections?api-key=k"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            UrlBuilder::new("not a url", "k"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            UrlBuilder::new("mailto:someone@example.com", "k"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
