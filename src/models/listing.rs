use serde::{Deserialize, Serialize};

/// One scraped advertisement. `price` is kept exactly as the page shows it
/// (e.g. `"2.500 lei"`); see [`crate::price::normalize_price`] for the
/// numeric form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub price: String,
}

impl Listing {
    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
        }
    }
}
