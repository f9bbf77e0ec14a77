//! End-of-day history rows and request parameters.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DateError;

/// One security's end-of-day result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// Security identifier (`SECID`).
    pub secid: String,
    /// Legal close price (`LEGALCLOSEPRICE`), `0.0` when the server sent no usable value.
    pub close_price: f64,
    /// Number of trades (`NUMTRADES`).
    pub num_trades: u32,
}

impl HistoryRow {
    /// Creates a new history row.
    #[must_use]
    pub fn new(secid: impl Into<String>, close_price: f64, num_trades: u32) -> Self {
        Self {
            secid: secid.into(),
            close_price,
            num_trades,
        }
    }
}

/// A trading date rendered the way ISS expects it in `?date=`.
///
/// ISS accepts dates without zero padding, so `2024-03-05` is sent as `2024-3-5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssDate(NaiveDate);

impl IssDate {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the day before `today`, the default history date.
    #[must_use]
    pub fn previous_day(today: NaiveDate) -> Self {
        Self(today.pred_opt().unwrap_or(today))
    }
}

impl From<NaiveDate> for IssDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::str::FromStr for IssDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateError::Malformed(s.to_string()))
    }
}

impl std::fmt::Display for IssDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.0.year(), self.0.month(), self.0.day())
    }
}

/// Parameters of a history request: the board to read and the trading date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryQuery {
    /// Engine code.
    pub engine: String,
    /// Market code.
    pub market: String,
    /// Board identifier.
    pub board: String,
    /// Trading date.
    pub date: IssDate,
}

impl HistoryQuery {
    /// Creates a new query.
    #[must_use]
    pub fn new(
        engine: impl Into<String>,
        market: impl Into<String>,
        board: impl Into<String>,
        date: IssDate,
    ) -> Self {
        Self {
            engine: engine.into(),
            market: market.into(),
            board: board.into(),
            date,
        }
    }
}

impl std::fmt::Display for HistoryQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{} on {}",
            self.engine, self.market, self.board, self.date
        )
    }
}
