//! Accumulators for rows extracted from ISS replies.

use std::collections::HashMap;

use crate::{HistoryRow, ReferenceEntry, ReferenceKind};

/// Receiver for rows extracted by the ISS client.
///
/// Every fetch resets the collection it fills exactly once, before its first
/// request, and then appends to it.
pub trait ResultSink {
    /// Clears collected history rows.
    fn reset_history(&mut self);

    /// Clears the engine list.
    fn reset_engines(&mut self);

    /// Clears the market list.
    fn reset_markets(&mut self);

    /// Clears the board list.
    fn reset_boards(&mut self);

    /// Appends one history row.
    fn push_history(&mut self, row: HistoryRow);

    /// Inserts an engine, replacing any earlier title for the same code.
    fn push_engine(&mut self, code: String, title: String);

    /// Inserts a market, replacing any earlier title for the same code.
    fn push_market(&mut self, code: String, title: String);

    /// Inserts a board, replacing any earlier title for the same code.
    fn push_board(&mut self, code: String, title: String);

    /// Clears the list for `kind`.
    fn reset_reference(&mut self, kind: ReferenceKind) {
        match kind {
            ReferenceKind::Engines => self.reset_engines(),
            ReferenceKind::Markets => self.reset_markets(),
            ReferenceKind::Boards => self.reset_boards(),
        }
    }

    /// Inserts an entry into the list for `kind`.
    fn push_reference(&mut self, kind: ReferenceKind, code: String, title: String) {
        match kind {
            ReferenceKind::Engines => self.push_engine(code, title),
            ReferenceKind::Markets => self.push_market(code, title),
            ReferenceKind::Boards => self.push_board(code, title),
        }
    }
}

/// Plain in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct DataHandler {
    /// History rows in server order.
    pub history: Vec<HistoryRow>,
    /// Engine code to title.
    pub engines: HashMap<String, String>,
    /// Market code to title.
    pub markets: HashMap<String, String>,
    /// Board id to title.
    pub boards: HashMap<String, String>,
}

impl DataHandler {
    /// Creates an empty handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code-to-title map for `kind`.
    #[must_use]
    pub const fn reference(&self, kind: ReferenceKind) -> &HashMap<String, String> {
        match kind {
            ReferenceKind::Engines => &self.engines,
            ReferenceKind::Markets => &self.markets,
            ReferenceKind::Boards => &self.boards,
        }
    }

    /// Returns the entries for `kind` ordered by title, then code.
    ///
    /// Titles are not unique, so a selection made from this list must keep
    /// the entry's code rather than look it up by title later.
    #[must_use]
    pub fn entries_by_title(&self, kind: ReferenceKind) -> Vec<ReferenceEntry> {
        let mut entries: Vec<_> = self
            .reference(kind)
            .iter()
            .map(|(code, title)| ReferenceEntry::new(code.as_str(), title.as_str()))
            .collect();
        entries.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.code.cmp(&b.code)));
        entries
    }
}

impl ResultSink for DataHandler {
    fn reset_history(&mut self) {
        self.history.clear();
    }

    fn reset_engines(&mut self) {
        self.engines.clear();
    }

    fn reset_markets(&mut self) {
        self.markets.clear();
    }

    fn reset_boards(&mut self) {
        self.boards.clear();
    }

    fn push_history(&mut self, row: HistoryRow) {
        self.history.push(row);
    }

    fn push_engine(&mut self, code: String, title: String) {
        self.engines.insert(code, title);
    }

    fn push_market(&mut self, code: String, title: String) {
        self.markets.insert(code, title);
    }

    fn push_board(&mut self, code: String, title: String) {
        self.boards.insert(code, title);
    }
}
