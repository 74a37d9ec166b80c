//! Request URL and query construction.

use oilprice_query::PageRequest;
use oilprice_types::Endpoint;

/// Builds the URL of an endpoint under `base_url`.
///
/// ```
/// use oilprice_fetch::url::prices_url;
/// use oilprice_types::Endpoint;
///
/// assert_eq!(
///     prices_url("https://api.oilpriceapi.com/", Endpoint::PastWeek),
///     "https://api.oilpriceapi.com/v1/prices/past_week"
/// );
/// ```
#[must_use]
pub fn prices_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint.path())
}

/// Query parameters for one page request.
#[must_use]
pub fn page_query(request: &PageRequest<'_>, price_type: &str) -> Vec<(&'static str, String)> {
    vec![
        ("by_code", request.commodity.to_string()),
        ("interval", request.interval.as_str().to_string()),
        ("page", request.page.to_string()),
        ("per_page", request.page_size.to_string()),
        ("by_type", price_type.to_string()),
        ("start_date", request.range.start().format("%Y-%m-%d").to_string()),
        ("end_date", request.range.end().format("%Y-%m-%d").to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use oilprice_types::{DateRange, Interval};
    use std::time::Duration;

    #[test]
    fn test_prices_url() {
        assert_eq!(
            prices_url("http://localhost:3000", Endpoint::PastYear),
            "http://localhost:3000/v1/prices/past_year"
        );
    }

    #[test]
    fn test_page_query() {
        let request = PageRequest {
            commodity: "WTI_USD",
            endpoint: Endpoint::PastMonth,
            range: DateRange::parse("2024-01-01", "2024-01-31").unwrap(),
            page: 3,
            page_size: 500,
            interval: Interval::Hourly,
            timeout: Duration::from_secs(60),
        };
        let query = page_query(&request, "spot_price");

        assert_eq!(
            query,
            vec![
                ("by_code", "WTI_USD".to_string()),
                ("interval", "hourly".to_string()),
                ("page", "3".to_string()),
                ("per_page", "500".to_string()),
                ("by_type", "spot_price".to_string()),
                ("start_date", "2024-01-01".to_string()),
                ("end_date", "2024-01-31".to_string()),
            ]
        );
    }
}
