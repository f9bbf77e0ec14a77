//! Paginated end-of-day history retrieval.

use moexiss_types::{HistoryQuery, HistoryRow, ResultSink};
use tracing::debug;

use crate::xml::{Row, find_block, parse_document};
use crate::{FetchError, IssClient};

/// `id` of the block holding history rows.
pub const HISTORY_BLOCK: &str = "history";

impl IssClient {
    /// Fetches every page of history for `query` into `sink`.
    ///
    /// The sink's history is cleared once, then pages are requested with
    /// `start` advancing by the number of rows received so far. The loop stops
    /// at the first page with no rows, so `N` non-empty pages cost `N + 1`
    /// requests. Returns the total number of rows pushed.
    ///
    /// A `LEGALCLOSEPRICE` that does not parse is recorded as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails, a reply is not valid XML, or a
    /// row's `NUMTRADES` is not an unsigned integer. Rows pushed before the
    /// error stay in the sink.
    pub async fn fetch_history<S>(
        &self,
        query: &HistoryQuery,
        sink: &mut S,
    ) -> Result<usize, FetchError>
    where
        S: ResultSink + ?Sized,
    {
        sink.reset_history();

        let mut start = 0;
        loop {
            let url = self.config().endpoints.history_url(query, start);
            let reply = self.get_reply(&url).await?;
            let page_rows = push_history_page(&reply, sink)?;

            debug!(%query, start, rows = page_rows, "history page received");
            if page_rows == 0 {
                break;
            }
            start += page_rows;
        }

        Ok(start)
    }
}

/// Pushes the rows of one history reply into `sink`, returning how many there were.
fn push_history_page<S>(reply: &str, sink: &mut S) -> Result<usize, FetchError>
where
    S: ResultSink + ?Sized,
{
    let document = parse_document(reply)?;
    let rows = find_block(&document, HISTORY_BLOCK).rows();

    let mut count = 0;
    for row in rows.iter() {
        sink.push_history(parse_history_row(row)?);
        count += 1;
    }

    Ok(count)
}

fn parse_history_row(row: Row<'_, '_>) -> Result<HistoryRow, FetchError> {
    let secid = row.attribute("SECID");

    let trades = row.attribute("NUMTRADES");
    let num_trades = trades
        .trim()
        .parse::<u32>()
        .map_err(|_| FetchError::InvalidField {
            field: "NUMTRADES",
            value: trades.to_string(),
        })?;

    // ISS always uses '.' as the decimal separator
    let close_price = row
        .attribute("LEGALCLOSEPRICE")
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0);

    Ok(HistoryRow::new(secid, close_price, num_trades))
}
