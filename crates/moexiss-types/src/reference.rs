//! Engine, market, and board reference lists.

use serde::{Deserialize, Serialize};

/// The three levels of the ISS instrument hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Trading engines (e.g. `stock`, `currency`).
    Engines,
    /// Markets of one engine (e.g. `shares`, `bonds`).
    Markets,
    /// Boards of one market (e.g. `TQBR`).
    Boards,
}

impl ReferenceKind {
    /// Returns the `id` of the XML block holding this list.
    #[must_use]
    pub const fn block_id(&self) -> &'static str {
        match self {
            Self::Engines => "engines",
            Self::Markets => "markets",
            Self::Boards => "boards",
        }
    }

    /// Returns the row attribute carrying the entry code.
    #[must_use]
    pub const fn code_attribute(&self) -> &'static str {
        match self {
            Self::Engines | Self::Markets => "name",
            Self::Boards => "boardid",
        }
    }

    /// Returns the row attribute carrying the display title.
    #[must_use]
    pub const fn title_attribute(&self) -> &'static str {
        "title"
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.block_id())
    }
}

/// A request for one reference list, carrying its parent identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceRequest {
    /// All engines.
    Engines,
    /// Markets of an engine.
    Markets {
        /// Engine code.
        engine: String,
    },
    /// Boards of a market.
    Boards {
        /// Engine code.
        engine: String,
        /// Market code.
        market: String,
    },
}

impl ReferenceRequest {
    /// Markets of the given engine.
    #[must_use]
    pub fn markets(engine: impl Into<String>) -> Self {
        Self::Markets {
            engine: engine.into(),
        }
    }

    /// Boards of the given engine and market.
    #[must_use]
    pub fn boards(engine: impl Into<String>, market: impl Into<String>) -> Self {
        Self::Boards {
            engine: engine.into(),
            market: market.into(),
        }
    }

    /// Returns the kind of list this request produces.
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        match self {
            Self::Engines => ReferenceKind::Engines,
            Self::Markets { .. } => ReferenceKind::Markets,
            Self::Boards { .. } => ReferenceKind::Boards,
        }
    }
}

/// A single (code, title) pair from a reference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Code used in ISS URLs.
    pub code: String,
    /// Human-readable title.
    pub title: String,
}

impl ReferenceEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}
