//! Engine, market, and board list retrieval.

use moexiss_types::{ReferenceKind, ReferenceRequest, ResultSink};
use tracing::debug;

use crate::xml::{find_block, parse_document};
use crate::{FetchError, IssClient};

impl IssClient {
    /// Fetches one reference list into `sink`, returning the number of rows read.
    ///
    /// The sink's list for the request's kind is cleared before the request is
    /// sent. A reply without the expected block or rows leaves it empty and is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with an
    /// error status, or the reply is not valid XML.
    pub async fn fetch_reference_list<S>(
        &self,
        request: &ReferenceRequest,
        sink: &mut S,
    ) -> Result<usize, FetchError>
    where
        S: ResultSink + ?Sized,
    {
        let kind = request.kind();
        sink.reset_reference(kind);

        let url = self.config().endpoints.reference_list_url(request);
        let reply = self.get_reply(&url).await?;
        let count = push_reference_rows(&reply, kind, sink)?;

        debug!(%kind, rows = count, "reference list received");
        Ok(count)
    }

    /// Fetches the engine list.
    ///
    /// # Errors
    ///
    /// See [`IssClient::fetch_reference_list`].
    pub async fn fetch_engines<S>(&self, sink: &mut S) -> Result<usize, FetchError>
    where
        S: ResultSink + ?Sized,
    {
        self.fetch_reference_list(&ReferenceRequest::Engines, sink).await
    }

    /// Fetches the markets of `engine`.
    ///
    /// # Errors
    ///
    /// See [`IssClient::fetch_reference_list`].
    pub async fn fetch_markets<S>(&self, engine: &str, sink: &mut S) -> Result<usize, FetchError>
    where
        S: ResultSink + ?Sized,
    {
        self.fetch_reference_list(&ReferenceRequest::markets(engine), sink).await
    }

    /// Fetches the boards of `market` on `engine`.
    ///
    /// # Errors
    ///
    /// See [`IssClient::fetch_reference_list`].
    pub async fn fetch_boards<S>(
        &self,
        engine: &str,
        market: &str,
        sink: &mut S,
    ) -> Result<usize, FetchError>
    where
        S: ResultSink + ?Sized,
    {
        self.fetch_reference_list(&ReferenceRequest::boards(engine, market), sink).await
    }
}

/// Pushes every row of the `kind` block in `reply` into `sink`.
fn push_reference_rows<S>(
    reply: &str,
    kind: ReferenceKind,
    sink: &mut S,
) -> Result<usize, FetchError>
where
    S: ResultSink + ?Sized,
{
    let document = parse_document(reply)?;
    let rows = find_block(&document, kind.block_id()).rows();

    let mut count = 0;
    for row in rows.iter() {
        sink.push_reference(
            kind,
            row.attribute(kind.code_attribute()).to_string(),
            row.attribute(kind.title_attribute()).to_string(),
        );
        count += 1;
    }

    Ok(count)
}
