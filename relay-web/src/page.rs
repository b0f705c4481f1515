use crate::extract::extract_first_by_class;
use async_trait::async_trait;
use relay_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;

pub const DEFAULT_PRICE_SOURCE: &str =
    "https://index.minfin.com.ua/ua/markets/wares/prods/fruits-vegetables/vegetables/";
/// CSS class marking the price element on the source page.
pub const PRICE_CLASS: &str = "price";
const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("invalid price source: {0}")]
    Source(#[source] HttpError),
    #[error("price page fetch failed: {0}")]
    Fetch(#[source] HttpError),
}

/// Anything that can produce the current price text.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// `Ok(None)` when the page has no price element.
    async fn fetch_price(&self) -> Result<Option<String>, ScrapeError>;
}

#[derive(Clone)]
pub struct PriceScraper {
    http: HttpClient,
    source: String,
}

impl PriceScraper {
    pub fn new(source_url: &str) -> Result<Self, ScrapeError> {
        let http = HttpClient::new(source_url)
            .map_err(ScrapeError::Source)?
            .with_timeout(PAGE_TIMEOUT);
        Ok(Self {
            http,
            source: source_url.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[async_trait]
impl PriceSource for PriceScraper {
    async fn fetch_price(&self) -> Result<Option<String>, ScrapeError> {
        let html = self
            .http
            .get_text(
                &self.source,
                RequestOpts {
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(ScrapeError::Fetch)?;

        let price = extract_first_by_class(&html, PRICE_CLASS);
        tracing::debug!(
            page_bytes = html.len(),
            found = price.is_some(),
            "price.page.scraped"
        );
        Ok(price)
    }
}
