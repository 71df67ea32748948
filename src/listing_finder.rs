use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SearchConfig;
use crate::models::Listing;
use crate::scraper::Fetcher;
use crate::utils::error::{AppError, Result};

/// Structural selectors used to locate listing titles and prices on a
/// results page.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub title: Selector,
    pub price: Selector,
}

impl ListingSelectors {
    pub fn parse(title: &str, price: &str) -> Result<Self> {
        Ok(Self {
            title: parse_selector(title)?,
            price: parse_selector(price)?,
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::parse(&config.title_selector, &config.price_selector)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        AppError::Validation(format!("Invalid CSS selector '{}': {:?}", selector, e))
    })
}

/// Builds `<base>q-<kw1>+<kw2>/` from whitespace-separated keywords. The
/// keyword text becomes a single percent-encoded path segment.
pub fn search_url(base_url: &str, keywords: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    let query = keywords.split_whitespace().collect::<Vec<_>>().join("+");

    url.path_segments_mut()
        .map_err(|_| AppError::Validation(format!("OLX url '{}' cannot take a path", base_url)))?
        .pop_if_empty()
        .push(&format!("q-{}", query))
        .push("");

    Ok(url)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Pairs the n-th title element with the n-th price element.
///
/// Nothing ties a title to its price other than document order, so a
/// listing with a missing price shifts every later pair. When the counts
/// differ the result is truncated to the shorter side and a warning is
/// logged.
pub fn parse_listings(html: &str, selectors: &ListingSelectors) -> Vec<Listing> {
    let document = Html::parse_document(html);

    let titles: Vec<String> = document.select(&selectors.title).map(element_text).collect();
    let prices: Vec<String> = document.select(&selectors.price).map(element_text).collect();

    if titles.len() != prices.len() {
        warn!(
            titles = titles.len(),
            prices = prices.len(),
            "Title and price counts differ; listings are paired by position and may be misaligned"
        );
    }

    titles
        .into_iter()
        .zip(prices)
        .map(|(title, price)| Listing { title, price })
        .collect()
}

/// Fetches the search results page for `keywords` and extracts its listings.
///
/// Returns `None` when the page could not be fetched and `Some(vec![])` when
/// it was fetched but contained no listings.
pub async fn search(
    fetcher: &Fetcher,
    base_url: &str,
    keywords: &str,
    selectors: &ListingSelectors,
) -> Option<Vec<Listing>> {
    info!("Searching OLX with keywords: {}", keywords);

    let url = match search_url(base_url, keywords) {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot build search URL from {}: {}", base_url, e);
            return None;
        }
    };

    match fetcher.fetch(url.as_str()).await {
        Ok(html) => {
            let listings = parse_listings(&html, selectors);
            debug!(count = listings.len(), "Extracted listings from {}", url);
            Some(listings)
        }
        Err(e) => {
            warn!("Error searching OLX: {}", e);
            None
        }
    }
}
