//! The book record shared by the catalog search results and the saved library.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder used when the catalog gives a book without a title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Placeholder used when the catalog gives a book without any authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A single book with the metadata worth keeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Title of the book.
    pub title: String,
    /// Authors of the book, joined with `", "` when there is more than one.
    pub author: String,
    /// Name of the publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// ISBN (or other catalog identifier), treated as an opaque string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Publication date as the catalog reports it, e.g. `2005` or `2005-08-02`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl Book {
    /// Creates a [`Book`] from raw catalog fields.
    ///
    /// A missing or blank title is replaced by [`UNKNOWN_TITLE`] and an author list with no
    /// non-blank names by [`UNKNOWN_AUTHOR`], so a constructed book always has both.
    #[must_use]
    pub fn new(title: Option<String>, mut authors: Vec<String>) -> Self {
        let title = title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_owned());

        authors.retain(|author| !author.trim().is_empty());
        let author = if authors.is_empty() {
            UNKNOWN_AUTHOR.to_owned()
        } else {
            authors
                .iter()
                .map(|a| a.trim())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            title,
            author,
            publisher: None,
            isbn: None,
            published_date: None,
        }
    }

    /// One line `"<title> by <author>"`, used where a list of books needs to stay compact.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }

    /// Both books carry the same ISBN.
    #[must_use]
    pub fn same_edition(&self, other: &Self) -> bool {
        matches!((&self.isbn, &other.isbn), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title: {}\nAuthor: {}", self.title, self.author)?;
        if let Some(publisher) = &self.publisher {
            write!(f, "\nPublisher: {publisher}")?;
        }
        if let Some(date) = &self.published_date {
            write!(f, "\nPublished: {date}")?;
        }
        if let Some(isbn) = &self.isbn {
            write!(f, "\nISBN: {isbn}")?;
        }
        Ok(())
    }
}
