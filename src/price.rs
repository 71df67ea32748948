use regex::Regex;
use std::sync::LazyLock;

use crate::models::Listing;
use crate::utils::error::{AppError, Result};

/// Currency suffix printed after every OLX.ro price.
pub const CURRENCY_SUFFIX: &str = "Lei";

static CURRENCY_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*lei\s*$").expect("static regex"));
// Thousands separators and any whitespace, non-breaking spaces included.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,\s]").expect("static regex"));
static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("static regex"));

/// Turns a displayed price such as `"2.500 lei"` or `"2,500 Lei"` into a
/// number. `.` and `,` are both treated as thousands separators.
pub fn normalize_price(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let without_currency = CURRENCY_SUFFIX_REGEX.replace(trimmed, "");
    let digits = SEPARATOR_REGEX.replace_all(&without_currency, "");

    if !DIGITS_REGEX.is_match(&digits) {
        return Err(AppError::Parse {
            message: format!("unrecognized price '{}'", raw),
        });
    }

    digits.parse::<f64>().map_err(|e| AppError::Parse {
        message: format!("unrecognized price '{}': {}", raw, e),
    })
}

/// Returns the listings in ascending price order. Equal prices keep their
/// original relative order. One bad price fails the whole sort.
pub fn sort_by_price(listings: &[Listing]) -> Result<Vec<Listing>> {
    let mut keyed = listings
        .iter()
        .map(|listing| Ok((normalize_price(&listing.price)?, listing)))
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(keyed.into_iter().map(|(_, listing)| listing.clone()).collect())
}

/// Cheapest listing and its normalized price, or `None` for an empty slice.
pub fn cheapest(listings: &[Listing]) -> Result<Option<(&Listing, f64)>> {
    let mut best: Option<(&Listing, f64)> = None;

    for listing in listings {
        let price = normalize_price(&listing.price)?;
        if best.is_none_or(|(_, lowest)| price < lowest) {
            best = Some((listing, price));
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2,500 Lei", 2500.0)]
    #[case("3.500 Lei", 3500.0)]
    #[case("1,250,000 Lei", 1250000.0)]
    #[case("999 lei", 999.0)]
    #[case("  4 200 lei ", 4200.0)]
    #[case("4\u{a0}200 lei", 4200.0)]
    #[case("750", 750.0)]
    fn test_normalize_price(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(normalize_price(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("Lei")]
    #[case("Schimb")]
    #[case("Gratuit")]
    #[case("100 EUR")]
    #[case("NaN Lei")]
    #[case("-5 Lei")]
    fn test_normalize_price_rejects_unexpected_formats(#[case] raw: &str) {
        let err = normalize_price(raw).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
        assert!(err.to_string().contains(raw));
    }

    #[test]
    fn test_grouped_digits_equal_digits_without_separators() {
        for raw in ["1,2 Lei", "12,345,678 Lei", "7,00,1 Lei"] {
            let expected: f64 = raw
                .trim_end_matches(" Lei")
                .replace(',', "")
                .parse()
                .unwrap();
            assert_eq!(normalize_price(raw).unwrap(), expected);
        }
    }

    fn iphone_listings() -> Vec<Listing> {
        vec![
            Listing::new("iPhone 15 Pro A", "3.500 Lei"),
            Listing::new("iPhone 15 Pro B", "2.999 Lei"),
        ]
    }

    #[test]
    fn test_sort_by_price_scenario() {
        let sorted = sort_by_price(&iphone_listings()).unwrap();

        let titles: Vec<_> = sorted.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["iPhone 15 Pro B", "iPhone 15 Pro A"]);
    }

    #[test]
    fn test_sort_is_monotonic_and_stable() {
        let listings = vec![
            Listing::new("first 1500", "1.500 lei"),
            Listing::new("cheap", "200 lei"),
            Listing::new("second 1500", "1,500 lei"),
            Listing::new("expensive", "12.000 lei"),
            Listing::new("third 1500", "1500 lei"),
        ];

        let sorted = sort_by_price(&listings).unwrap();
        let prices: Vec<f64> = sorted
            .iter()
            .map(|l| normalize_price(&l.price).unwrap())
            .collect();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));

        let titles: Vec<_> = sorted.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["cheap", "first 1500", "second 1500", "third 1500", "expensive"]
        );
    }

    #[test]
    fn test_sort_propagates_parse_error() {
        let listings = vec![
            Listing::new("ok", "100 lei"),
            Listing::new("swap only", "Schimb"),
        ];

        assert!(matches!(sort_by_price(&listings), Err(AppError::Parse { .. })));
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_by_price(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_cheapest() {
        let listings = iphone_listings();
        let (listing, price) = cheapest(&listings).unwrap().unwrap();
        assert_eq!(listing.title, "iPhone 15 Pro B");
        assert_eq!(price, 2999.0);
        assert!(cheapest(&[]).unwrap().is_none());
    }

    #[test]
    fn test_cheapest_keeps_first_of_equal_prices() {
        let listings = vec![
            Listing::new("a", "500 lei"),
            Listing::new("b", "500 lei"),
        ];

        let (listing, price) = cheapest(&listings).unwrap().unwrap();
        assert_eq!(listing.title, "a");
        assert_eq!(price, 500.0);
    }
}
