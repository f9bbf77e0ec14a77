//! Engine, market, and board list commands.

use crate::ConnectionArgs;
use crate::commands::{ProgressSink, spinner};
use crate::display::{Format, sorted_entries, write_reference};
use anyhow::{Context, Result};
use moexiss_lib::prelude::*;
use std::io;

/// Fetch one reference list anonymously and print it.
pub(crate) async fn list(
    connection: &ConnectionArgs,
    request: &ReferenceRequest,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let client = IssClient::new(connection.client_config())?;
    let kind = request.kind();

    let mut handler = DataHandler::new();
    let progress = spinner(quiet, kind.to_string());
    let fetched = client
        .fetch_reference_list(request, &mut ProgressSink::new(&mut handler, &progress))
        .await;
    progress.finish_and_clear();
    fetched.with_context(|| format!("Failed to fetch {kind}"))?;

    let entries = sorted_entries(handler.reference(kind));
    write_reference(kind, &entries, format, io::stdout().lock())?;
    Ok(())
}
