use std::io::Write;
use tracing::info;

use crate::config::AppConfig;
use crate::listing_finder::{ListingSelectors, search};
use crate::metadata_extractor::{PageMetadata, fetch_metadata};
use crate::models::Listing;
use crate::notifiers::{Mailer, ThresholdCheck, notify_if_below};
use crate::price::sort_by_price;
use crate::scraper::Fetcher;
use crate::utils::error::Result;
use crate::utils::timing::timed;

/// Per-invocation switches, mostly from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub threshold: f64,
    pub recipient: String,
    /// Log each step's timing.
    pub log: bool,
    /// Print the sorted listings as JSON instead of text lines.
    pub json: bool,
}

impl RunOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            threshold: config.alert.threshold,
            recipient: config.recipient().to_string(),
            log: false,
            json: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub metadata: Option<PageMetadata>,
    /// `None` when the search page could not be fetched.
    pub sorted: Option<Vec<Listing>>,
    pub check: Option<ThresholdCheck>,
}

impl RunReport {
    pub fn search_failed(&self) -> bool {
        self.sorted.is_none()
    }

    pub fn notified(&self) -> bool {
        self.check.as_ref().is_some_and(|check| check.notified)
    }
}

/// One full pass: page metadata, search, sort, print, threshold check.
/// Human-readable results are written to `out`.
pub async fn run(
    config: &AppConfig,
    options: &RunOptions,
    fetcher: &Fetcher,
    mailer: &dyn Mailer,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let selectors = ListingSelectors::from_config(&config.olx)?;

    let metadata = timed("fetch_metadata", options.log, fetch_metadata(fetcher, &config.olx.url)).await;
    let shown = metadata.clone().unwrap_or_else(PageMetadata::unavailable);
    writeln!(out, "OLX page title: {}", shown.title)?;
    writeln!(out, "OLX description: {}", shown.description)?;

    let found = timed(
        "search",
        options.log,
        search(fetcher, &config.olx.url, &config.olx.keywords, &selectors),
    )
    .await;

    let Some(listings) = found else {
        writeln!(out, "Could not fetch OLX results for keywords '{}'", config.olx.keywords)?;
        return Ok(RunReport {
            metadata,
            sorted: None,
            check: None,
        });
    };

    let sorted = sort_by_price(&listings)?;
    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&sorted)?)?;
    } else {
        writeln!(
            out,
            "OLX listings for keywords '{}', sorted by price:",
            config.olx.keywords
        )?;
        for listing in &sorted {
            writeln!(out, "Title: {}, Price: {}", listing.title, listing.price)?;
        }
    }

    if listings.is_empty() {
        writeln!(out, "No listings found, skipping price check")?;
        return Ok(RunReport {
            metadata,
            sorted: Some(sorted),
            check: None,
        });
    }

    let check = timed(
        "check_price_drop",
        options.log,
        notify_if_below(mailer, listings, options.threshold, &options.recipient),
    )
    .await?;

    if check.notified {
        writeln!(out, "Notification e-mail sent to {}", options.recipient)?;
    }
    info!(
        count = check.listings.len(),
        lowest_price = check.lowest_price,
        notified = check.notified,
        "Run complete"
    );

    Ok(RunReport {
        metadata,
        sorted: Some(sorted),
        check: Some(check),
    })
}
