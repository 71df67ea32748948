use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::scraper::Fetcher;

pub const TITLE_UNAVAILABLE: &str = "Title unavailable";
pub const DESCRIPTION_UNAVAILABLE: &str = "Description unavailable";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static DESCRIPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).expect("static selector"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

impl PageMetadata {
    /// Both fields set to their "unavailable" sentinels.
    pub fn unavailable() -> Self {
        Self {
            title: TITLE_UNAVAILABLE.to_string(),
            description: DESCRIPTION_UNAVAILABLE.to_string(),
        }
    }
}

/// Reads `<title>` and `<meta name="description">` from a page. Missing
/// pieces come back as sentinels rather than errors.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| TITLE_UNAVAILABLE.to_string());

    let description = document
        .select(&DESCRIPTION_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string());

    PageMetadata { title, description }
}

/// Fetches `url` and extracts its metadata. `None` means the fetch failed.
pub async fn fetch_metadata(fetcher: &Fetcher, url: &str) -> Option<PageMetadata> {
    match fetcher.fetch(url).await {
        Ok(html) => Some(extract_metadata(&html)),
        Err(e) => {
            warn!("Error accessing URL {}: {}", url, e);
            None
        }
    }
}
