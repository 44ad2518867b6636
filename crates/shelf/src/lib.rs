#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! shelf is a library which supports searching a book catalog (the Google Books API) for
//! [`Book`]s and keeping a personal [`Library`] of them in a JSON file.
//!
//! ```no_run
//! use shelf::{Catalog, Library};
//!
//! fn main() -> Result<(), shelf::Error> {
//!     let catalog = Catalog::connect(shelf::DEFAULT_TIMEOUT)?;
//!     let library = Library::new("my_library.json");
//!
//!     if let Some(book) = catalog.search("Dune")?.into_iter().next() {
//!         library.append(book)?;
//!     }
//!     Ok(())
//! }
//! ```

mod api;
pub mod book;
mod error;
pub mod library;

pub use api::{Catalog, Client, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT};
pub use book::Book;
pub use error::{Error, ErrorKind};
pub use library::Library;
