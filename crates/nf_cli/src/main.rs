use anyhow::Context;
use chrono::DateTime;
use clap::Parser;
use nf_client::{ApiConfig, ArticleQuery, FeedService, SectionsOrigin, StaticProbe};
use nf_core::{Article, CacheStore, PreferenceKey};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a news feed and its cached sections", long_about = None)]
pub struct Cli {
    /// Cache backend: memory, file or sqlite
    #[arg(long, default_value = "file")]
    store: String,
    /// Cache location for the file and sqlite backends
    #[arg(long)]
    cache: Option<PathBuf>,
    /// API root, overrides NEWSFEED_BASE_URL
    #[arg(long)]
    base_url: Option<String>,
    /// API key, overrides NEWSFEED_API_KEY
    #[arg(long)]
    api_key: Option<String>,
    /// Behave as if there were no network connection
    #[arg(long)]
    offline: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List sections, from the cache when they were loaded before
    Sections {
        /// Fetch from the network even if sections are cached
        #[arg(long)]
        refresh: bool,
    },
    /// List the newest articles
    Articles {
        /// Section id, defaults to the saved selection
        #[arg(long)]
        section: Option<String>,
        /// Number of articles, defaults to the saved page size
        #[arg(long)]
        page_size: Option<String>,
        /// Free text search within the section
        #[arg(long)]
        search: Option<String>,
    },
    /// Read or change saved preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum PrefsCommands {
    Get { key: PreferenceKey },
    Set { key: PreferenceKey, value: String },
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url);
    }
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key);
    }

    let cache = nf_storage::create_cache(&cli.store, cli.cache.as_deref())
        .await
        .with_context(|| format!("Failed to open {} cache", cli.store))?;
    let mut service = FeedService::from_config(&config, cache.clone())?;
    if cli.offline {
        service = service.with_probe(Arc::new(StaticProbe(false)));
    }
    info!("Using {} cache against {}", cli.store, config.base_url);

    match cli.command {
        Commands::Sections { refresh } => {
            let (sections, origin) = if refresh {
                service.refresh_sections().await?
            } else {
                service.load_sections().await?
            };
            if origin == SectionsOrigin::Cache {
                info!("Sections served from cache");
            }
            for section in sections {
                println!("{:<24} {}", section.id, section.title);
            }
        }
        Commands::Articles {
            section,
            page_size,
            search,
        } => {
            let section = match section {
                Some(section) => section,
                None => cache.get_value_for_key(PreferenceKey::SelectedSection).await?,
            };
            let page_size = match page_size {
                Some(size) => size,
                None => cache.get_value_for_key(PreferenceKey::PageSize).await?,
            };
            let query =
                ArticleQuery::new(Some(&section), &page_size).with_search(search.as_deref());
            let articles = service
                .load_articles(&query)
                .await
                .context("Failed to load articles")?;
            if articles.is_empty() {
                println!("No articles found");
            }
            for article in &articles {
                println!("{}", format_article(article));
            }
        }
        Commands::Prefs { command } => match command {
            PrefsCommands::Get { key } => {
                println!("{}", cache.get_value_for_key(key).await?);
            }
            PrefsCommands::Set { key, value } => {
                cache.set_value_for_key(key, &value).await?;
                info!("Saved {} = {}", key, value);
            }
            PrefsCommands::List => {
                for key in PreferenceKey::ALL {
                    println!("{} = {}", key, cache.get_value_for_key(key).await?);
                }
            }
        },
    }

    Ok(())
}

fn format_article(article: &Article) -> String {
    let mut line = format!(
        "[{}] {} ({})\n    {}",
        format_published(&article.published_at),
        article.title,
        article.section_name,
        article.url
    );
    if let Some(byline) = article.byline() {
        line.push_str(&format!("\n    by {}", byline));
    }
    line
}

/// Compact RFC 3339 rendering; anything else is shown verbatim.
fn format_published(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
