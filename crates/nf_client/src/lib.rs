pub mod config;
pub mod decoder;
pub mod fetcher;
pub mod probe;
pub mod service;
pub mod url_builder;

pub use config::ApiConfig;
pub use decoder::{decode_articles, decode_sections};
pub use fetcher::{Fetcher, HttpFetcher};
pub use probe::{StaticProbe, TcpProbe};
pub use service::{ArticleQuery, FeedService, SectionsOrigin};
pub use url_builder::UrlBuilder;

pub mod prelude {
    pub use super::{ApiConfig, ArticleQuery, FeedService, Fetcher, SectionsOrigin, UrlBuilder};
    pub use nf_core::{Article, Contributor, Error, Result, Section};
}
