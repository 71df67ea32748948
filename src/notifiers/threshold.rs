use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Mailer, OutgoingEmail};
use crate::models::Listing;
use crate::price::{self, CURRENCY_SUFFIX};
use crate::utils::error::{AppError, Result};

/// Outcome of a threshold check. `listings` is the input, untouched and in
/// its original order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdCheck {
    pub listings: Vec<Listing>,
    pub lowest_price: f64,
    pub notified: bool,
}

pub fn compose_alert(
    cheapest: &Listing,
    lowest_price: f64,
    threshold: f64,
    recipient: &str,
) -> OutgoingEmail {
    let subject = format!(
        "OLX price alert: lowest price {} {} is below {} {}",
        lowest_price, CURRENCY_SUFFIX, threshold, CURRENCY_SUFFIX
    );

    let mut body = String::new();
    body.push_str(&format!(
        "The lowest price found ({} {}) dropped below the threshold ({} {}).\n\n",
        lowest_price, CURRENCY_SUFFIX, threshold, CURRENCY_SUFFIX
    ));
    body.push_str(&format!("Cheapest listing: {}\n", cheapest.title));
    body.push_str(&format!("Price: {}\n\n", cheapest.price));
    body.push_str(&format!("Checked at {}\n", Local::now().format("%Y-%m-%d %H:%M")));

    OutgoingEmail {
        to: recipient.to_string(),
        subject,
        body,
    }
}

/// Emails `recipient` when the cheapest listing is strictly below
/// `threshold`. Fails on an empty list, on an unparsable price, or when
/// delivery fails.
pub async fn notify_if_below(
    mailer: &dyn Mailer,
    listings: Vec<Listing>,
    threshold: f64,
    recipient: &str,
) -> Result<ThresholdCheck> {
    let (cheapest, lowest_price) = price::cheapest(&listings)?.ok_or(AppError::EmptyListings)?;

    let notified = lowest_price < threshold;
    if notified {
        let email = compose_alert(cheapest, lowest_price, threshold, recipient);
        mailer.send(&email).await?;
        info!(lowest_price, threshold, "Price below threshold, notified {}", recipient);
    } else {
        debug!(lowest_price, threshold, "Lowest price is not below threshold");
    }

    Ok(ThresholdCheck {
        listings,
        lowest_price,
        notified,
    })
}
