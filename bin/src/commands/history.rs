//! History command implementation.

use crate::ConnectionArgs;
use crate::commands::{ProgressSink, real_time_session, spinner};
use crate::display::{Format, emit_history};
use anyhow::{Context, Result};
use moexiss_lib::prelude::*;
use std::path::PathBuf;

/// Yesterday in local time, the default trading date.
pub(crate) fn default_date() -> IssDate {
    IssDate::previous_day(chrono::Local::now().date_naive())
}

/// Download end-of-day history for one board.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn history(
    connection: &ConnectionArgs,
    engine: &str,
    market: &str,
    board: &str,
    date: Option<&str>,
    format: Format,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let date = match date {
        Some(s) => s.parse::<IssDate>()?,
        None => default_date(),
    };
    let query = HistoryQuery::new(engine, market, board, date);

    let config = connection.client_config();
    let session = real_time_session(connection, &config).await?;
    let client = IssClient::with_session(config, &session)?;

    download(&client, &query, format, output, quiet).await
}

/// Fetch every history page for `query` and write the rows out.
pub(crate) async fn download(
    client: &IssClient,
    query: &HistoryQuery,
    format: Format,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut handler = DataHandler::new();
    let progress = spinner(quiet, query.to_string());
    let fetched = client
        .fetch_history(query, &mut ProgressSink::new(&mut handler, &progress))
        .await;
    progress.finish_and_clear();
    fetched.with_context(|| format!("Failed to fetch history for {query}"))?;

    emit_history(&handler.history, format, output.as_deref())?;

    if let (Some(path), false) = (&output, quiet) {
        eprintln!("{} rows written to: {}", handler.history.len(), path.display());
    }
    Ok(())
}
