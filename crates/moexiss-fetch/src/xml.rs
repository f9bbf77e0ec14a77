//! Extraction of data blocks and rows from ISS XML replies.
//!
//! An ISS reply looks like:
//!
//! ```xml
//! <document>
//!     <data id="history">
//!         <metadata>...</metadata>
//!         <rows>
//!             <row SECID="SBER" NUMTRADES="1000" LEGALCLOSEPRICE="250.5"/>
//!         </rows>
//!     </data>
//! </document>
//! ```
//!
//! None of the lookups here fail: a missing block or `rows` element yields an
//! empty value, and a missing attribute yields `""`.

pub use roxmltree::Document;
use roxmltree::Node;

/// `id` reported by the empty block returned when a lookup finds nothing.
pub const EMPTY_BLOCK_ID: &str = "none";

/// Tag name of the element holding a block's records.
pub const ROWS_TAG: &str = "rows";

/// Parses an ISS reply.
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML.
pub fn parse_document(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    Document::parse(text)
}

/// A named data block, or the canonical empty block.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a, 'input> {
    node: Option<Node<'a, 'input>>,
}

impl<'a, 'input> Block<'a, 'input> {
    /// The canonical empty block.
    #[must_use]
    pub const fn empty() -> Self {
        Self { node: None }
    }

    /// Returns the block's `id`, or [`EMPTY_BLOCK_ID`] for the empty block.
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.node
            .and_then(|node| node.attribute("id"))
            .unwrap_or(EMPTY_BLOCK_ID)
    }

    /// Returns true if this is the canonical empty block.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Returns true if the block has at least one child element.
    #[must_use]
    pub fn has_elements(&self) -> bool {
        self.node
            .is_some_and(|node| node.children().any(|child| child.is_element()))
    }

    /// Returns the block's rows; shorthand for [`find_rows`].
    #[must_use]
    pub fn rows(&self) -> Rows<'a, 'input> {
        find_rows(self)
    }
}

/// The `rows` element of a block, or the canonical empty `rows`.
#[derive(Debug, Clone, Copy)]
pub struct Rows<'a, 'input> {
    node: Option<Node<'a, 'input>>,
}

impl<'a, 'input> Rows<'a, 'input> {
    /// The canonical empty `rows`.
    #[must_use]
    pub const fn empty() -> Self {
        Self { node: None }
    }

    /// Iterates over the record elements, skipping text and comments.
    pub fn iter(self) -> impl Iterator<Item = Row<'a, 'input>> {
        self.node
            .into_iter()
            .flat_map(|node| node.children())
            .filter(|child| child.is_element())
            .map(Row)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A single record element.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, 'input>(Node<'a, 'input>);

impl<'a> Row<'a, '_> {
    /// Case-insensitive attribute lookup; see [`attribute`].
    #[must_use]
    pub fn attribute(&self, name: &str) -> &'a str {
        attribute(self.0, name)
    }

    /// Returns the row's tag name.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        self.0.tag_name().name()
    }
}

/// Finds the first direct child of the root element whose `id` is exactly `block_id`.
///
/// Returns [`Block::empty`] if there is none.
#[must_use]
pub fn find_block<'a, 'input>(document: &'a Document<'input>, block_id: &str) -> Block<'a, 'input> {
    let node = document
        .root_element()
        .children()
        .filter(|child| child.is_element())
        .find(|child| child.attribute("id") == Some(block_id));

    Block { node }
}

/// Finds the first direct child of `block` named `rows`.
///
/// Returns [`Rows::empty`] if there is none.
#[must_use]
pub fn find_rows<'a, 'input>(block: &Block<'a, 'input>) -> Rows<'a, 'input> {
    let node = block.node.and_then(|node| {
        node.children()
            .find(|child| child.is_element() && child.tag_name().name() == ROWS_TAG)
    });

    Rows { node }
}

/// Looks up an attribute by name, ignoring ASCII case.
///
/// Returns `""` if the element has no such attribute.
#[must_use]
pub fn attribute<'a>(element: Node<'a, '_>, name: &str) -> &'a str {
    element
        .attributes()
        .find(|attr| attr.name().eq_ignore_ascii_case(name))
        .map_or("", |attr| attr.value())
}
