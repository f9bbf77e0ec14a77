//! Interactive browse command.
//!
//! Walks engine, market, and board by title, keeping the code of each chosen
//! entry, then downloads history for the chosen board.

use crate::ConnectionArgs;
use crate::commands::history::{default_date, download};
use crate::commands::{ProgressSink, real_time_session, spinner};
use crate::display::Format;
use anyhow::{Context, Result, bail};
use inquire::{Select, Text};
use moexiss_lib::prelude::*;
use std::path::PathBuf;

/// Prompt for a board and date, then download its history.
pub(crate) async fn browse(
    connection: &ConnectionArgs,
    format: Format,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = connection.client_config();
    let session = real_time_session(connection, &config).await?;
    let client = IssClient::with_session(config, &session)?;
    let mut handler = DataHandler::new();

    let engine = pick(&client, &ReferenceRequest::Engines, &mut handler, quiet).await?;
    let market = pick(&client, &ReferenceRequest::markets(&engine), &mut handler, quiet).await?;
    let board = pick(
        &client,
        &ReferenceRequest::boards(&engine, &market),
        &mut handler,
        quiet,
    )
    .await?;

    let default = default_date().date().to_string();
    let date = Text::new("Trading date (YYYY-MM-DD):")
        .with_default(&default)
        .prompt()
        .context("Date entry cancelled")?
        .parse::<IssDate>()?;

    let query = HistoryQuery::new(engine, market, board, date);
    download(&client, &query, format, output, quiet).await
}

/// Fetch one list, let the user choose a title, and return its code.
async fn pick(
    client: &IssClient,
    request: &ReferenceRequest,
    handler: &mut DataHandler,
    quiet: bool,
) -> Result<String> {
    let kind = request.kind();

    let progress = spinner(quiet, kind.to_string());
    let fetched = client
        .fetch_reference_list(request, &mut ProgressSink::new(&mut *handler, &progress))
        .await;
    progress.finish_and_clear();
    fetched.with_context(|| format!("Failed to fetch {kind}"))?;

    let options = choices(handler.entries_by_title(kind));
    if options.is_empty() {
        bail!("No {kind} available");
    }

    let choice = Select::new(&format!("Select {kind}:"), options)
        .prompt()
        .with_context(|| format!("{kind} selection cancelled"))?;
    Ok(choice.entry.code)
}

/// One selectable list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Choice {
    entry: ReferenceEntry,
    /// Another entry has the same title.
    shared_title: bool,
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.shared_title {
            write!(f, "{} ({})", self.entry.title, self.entry.code)
        } else {
            write!(f, "{}", self.entry.title)
        }
    }
}

/// Wraps title-ordered entries, marking titles that appear more than once.
fn choices(entries: Vec<ReferenceEntry>) -> Vec<Choice> {
    let shared: Vec<bool> = entries
        .iter()
        .map(|entry| entries.iter().filter(|e| e.title == entry.title).count() > 1)
        .collect();

    entries
        .into_iter()
        .zip(shared)
        .map(|(entry, shared_title)| Choice {
            entry,
            shared_title,
        })
        .collect()
}
