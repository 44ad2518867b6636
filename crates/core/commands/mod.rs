use shelf::{Book, Catalog, Client, Library};

use clap::{AppSettings, Subcommand};
use eyre::eyre;
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Search the book catalog and print the matching books
    #[clap(setting(AppSettings::ArgRequiredElseHelp))]
    Search {
        /// Keywords to search for, e.g. a title or an author
        #[clap(required = true)]
        keywords: Vec<String>,
    },
    /// Print every book saved in the library
    List,
}

impl Commands {
    pub fn execute<C: Client>(self, catalog: &Catalog<C>, library: &Library) -> eyre::Result<String> {
        match self {
            Commands::Search { keywords } => {
                let keywords = keywords.join(" ");
                let keywords = keywords.trim();
                if keywords.is_empty() {
                    return Err(eyre!("Search keywords cannot be empty"));
                }
                trace!("search subcommand called with the keywords '{keywords}'");
                let books = catalog.search(keywords)?;
                if books.is_empty() {
                    Ok(format!("No books found matching '{keywords}'."))
                } else {
                    Ok(numbered(&books))
                }
            }
            Commands::List => {
                trace!("list subcommand called for '{}'", library.path().display());
                let books = library.load()?;
                if books.is_empty() {
                    Ok("Your library is empty.".to_owned())
                } else {
                    Ok(numbered(&books))
                }
            }
        }
    }
}

fn numbered(books: &[Book]) -> String {
    books
        .iter()
        .enumerate()
        .map(|(i, book)| format!("[{}]\n{book}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}
