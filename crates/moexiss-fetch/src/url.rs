//! ISS and MOEX Passport URL construction.

use moexiss_types::{HistoryQuery, ReferenceRequest};
use urlencoding::encode;

/// Base URL of the ISS REST interface.
pub const ISS_BASE_URL: &str = "http://iss.moex.com/iss";

/// MOEX Passport authentication endpoint.
pub const AUTH_URL: &str = "https://passport.moex.com/authenticate";

/// URI whose cookies are searched for the passport after authentication.
pub const REFERENCE_URI: &str = "http://moex.com";

/// Name of the passport cookie.
pub const PASSPORT_COOKIE: &str = "MicexPassportCert";

/// Server locations used by the client.
///
/// The four ISS templates are fixed; only the base they hang off can change.
///
/// | Template | Path under `iss_base` |
/// |----------|-----------------------|
/// | engines  | `/engines.xml` |
/// | markets  | `/engines/{engine}/markets.xml` |
/// | boards   | `/engines/{engine}/markets/{market}/boards.xml` |
/// | history  | `/history/engines/{engine}/markets/{market}/boards/{board}/securities.xml?date={date}&start={start}` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// ISS base URL, without a trailing slash.
    pub iss_base: String,
    /// Passport authentication URL.
    pub auth: String,
    /// URI used to select the passport cookie from the jar.
    pub reference_uri: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            iss_base: ISS_BASE_URL.to_string(),
            auth: AUTH_URL.to_string(),
            reference_uri: REFERENCE_URI.to_string(),
        }
    }
}

impl Endpoints {
    /// Builds the engine list URL.
    ///
    /// ```
    /// use moexiss_fetch::url::Endpoints;
    ///
    /// let url = Endpoints::default().engines_url();
    /// assert_eq!(url, "http://iss.moex.com/iss/engines.xml");
    /// ```
    #[must_use]
    pub fn engines_url(&self) -> String {
        format!("{}/engines.xml", self.base())
    }

    /// Builds the market list URL for an engine.
    #[must_use]
    pub fn markets_url(&self, engine: &str) -> String {
        format!("{}/engines/{}/markets.xml", self.base(), encode(engine))
    }

    /// Builds the board list URL for an engine and market.
    #[must_use]
    pub fn boards_url(&self, engine: &str, market: &str) -> String {
        format!(
            "{}/engines/{}/markets/{}/boards.xml",
            self.base(),
            encode(engine),
            encode(market)
        )
    }

    /// Builds the URL for any reference list request.
    #[must_use]
    pub fn reference_list_url(&self, request: &ReferenceRequest) -> String {
        match request {
            ReferenceRequest::Engines => self.engines_url(),
            ReferenceRequest::Markets { engine } => self.markets_url(engine),
            ReferenceRequest::Boards { engine, market } => self.boards_url(engine, market),
        }
    }

    /// Builds the URL for one page of end-of-day history, starting at row `start`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use moexiss_fetch::url::Endpoints;
    /// use moexiss_types::{HistoryQuery, IssDate};
    ///
    /// let date = IssDate::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    /// let query = HistoryQuery::new("stock", "shares", "TQBR", date);
    /// assert_eq!(
    ///     Endpoints::default().history_url(&query, 100),
    ///     "http://iss.moex.com/iss/history/engines/stock/markets/shares/boards/TQBR/securities.xml?date=2024-3-5&start=100"
    /// );
    /// ```
    #[must_use]
    pub fn history_url(&self, query: &HistoryQuery, start: usize) -> String {
        format!(
            "{}/history/engines/{}/markets/{}/boards/{}/securities.xml?date={}&start={}",
            self.base(),
            encode(&query.engine),
            encode(&query.market),
            encode(&query.board),
            encode(&query.date.to_string()),
            start
        )
    }

    fn base(&self) -> &str {
        self.iss_base.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markets_url() {
        let url = Endpoints::default().markets_url("stock");
        assert_eq!(url, "http://iss.moex.com/iss/engines/stock/markets.xml");
    }

    #[test]
    fn test_boards_url() {
        let url = Endpoints::default().boards_url("currency", "selt");
        assert_eq!(
            url,
            "http://iss.moex.com/iss/engines/currency/markets/selt/boards.xml"
        );
    }

    #[test]
    fn test_parent_identifiers_are_encoded() {
        let url = Endpoints::default().markets_url("a b/c");
        assert_eq!(url, "http://iss.moex.com/iss/engines/a%20b%2Fc/markets.xml");
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let endpoints = Endpoints {
            iss_base: "http://localhost:8080/iss/".to_string(),
            ..Endpoints::default()
        };
        assert_eq!(endpoints.engines_url(), "http://localhost:8080/iss/engines.xml");
    }

    #[test]
    fn test_reference_list_url_dispatch() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.reference_list_url(&ReferenceRequest::boards("stock", "shares")),
            endpoints.boards_url("stock", "shares")
        );
        assert_eq!(
            endpoints.reference_list_url(&ReferenceRequest::Engines),
            endpoints.engines_url()
        );
    }
}
