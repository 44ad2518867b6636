use eyre::Result;
use log::{debug, info, trace};
use shelf::{Book, Catalog, Client, ErrorKind, Library};

use crate::interact::Prompt;

const MENU: [&str; 3] = ["Search books", "View my library", "Exit"];

/// Where the application is between two user interactions.
#[derive(Debug, PartialEq)]
pub enum State {
    MainMenu,
    Searching,
    ViewingResults(Vec<Book>),
    Saving(Book),
    ViewingLibrary,
    Exiting,
}

/// The interactive menu loop tying the catalog, the library and the console together.
///
/// Errors from the catalog or the library are reported to the user and the loop returns to the
/// main menu; only a failing console stops it.
pub struct App<C: Client, P: Prompt> {
    catalog: Catalog<C>,
    library: Library,
    prompt: P,
}

impl<C: Client, P: Prompt> App<C, P> {
    pub fn new(catalog: Catalog<C>, library: Library, prompt: P) -> Self {
        Self {
            catalog,
            library,
            prompt,
        }
    }

    pub fn run(mut self) -> Result<()> {
        match self.library.load() {
            Ok(books) => info!(
                "Loaded {} book(s) from '{}'",
                books.len(),
                self.library.path().display()
            ),
            Err(err) => self.report(&err),
        }

        let mut state = State::MainMenu;
        while state != State::Exiting {
            state = self.step(state)?;
        }

        self.prompt.show("Goodbye!");
        Ok(())
    }

    /// Performs the work of `state` and returns the state to move to.
    pub fn step(&mut self, state: State) -> Result<State> {
        let next = match state {
            State::MainMenu => self.main_menu()?,
            State::Searching => self.search()?,
            State::ViewingResults(books) => self.view_results(books)?,
            State::Saving(book) => self.save(book),
            State::ViewingLibrary => self.view_library(),
            State::Exiting => State::Exiting,
        };
        trace!("Moving to {next:?}");
        Ok(next)
    }

    fn main_menu(&mut self) -> Result<State> {
        let choice = self.prompt.select("What would you like to do?", &MENU)?;
        Ok(match choice {
            Some(0) => State::Searching,
            Some(1) => State::ViewingLibrary,
            _ => State::Exiting,
        })
    }

    fn search(&mut self) -> Result<State> {
        let keywords = self.prompt.input("Search keywords (title/author)")?;
        let keywords = keywords.trim();
        if keywords.is_empty() {
            self.prompt.show("Search keywords cannot be empty.");
            return Ok(State::MainMenu);
        }

        self.prompt
            .show(&format!("Searching the catalog for '{keywords}'..."));
        Ok(match self.catalog.search(keywords) {
            Ok(books) if books.is_empty() => {
                self.prompt
                    .show(&format!("No books found matching '{keywords}'."));
                State::MainMenu
            }
            Ok(books) => State::ViewingResults(books),
            Err(err) => {
                self.report(&err);
                State::MainMenu
            }
        })
    }

    fn view_results(&mut self, books: Vec<Book>) -> Result<State> {
        self.prompt.show("--- Search Results ---");
        for (i, book) in books.iter().enumerate() {
            self.prompt.show(&format!("[{}]\n{book}\n", i + 1));
        }

        let headlines = books.iter().map(Book::headline).collect::<Vec<_>>();
        let selection = self
            .prompt
            .select("Choose a book to save (Esc to cancel)", &headlines)?;

        Ok(match selection.and_then(|i| books.into_iter().nth(i)) {
            Some(book) => State::Saving(book),
            None => {
                self.prompt.show("Nothing saved.");
                State::MainMenu
            }
        })
    }

    fn save(&mut self, book: Book) -> State {
        let title = book.title.clone();
        match self.library.append(book) {
            Ok(count) => self.prompt.show(&format!(
                "Saved '{title}'. Your library now holds {count} book(s)."
            )),
            Err(err) => self.report(&err),
        }
        State::MainMenu
    }

    fn view_library(&mut self) -> State {
        match self.library.load() {
            Ok(books) if books.is_empty() => self
                .prompt
                .show("Your library is empty. Try searching for some books!"),
            Ok(books) => {
                self.prompt.show("--- Your Saved Library ---");
                for (i, book) in books.iter().enumerate() {
                    self.prompt.show(&format!("[{}]\n{book}\n", i + 1));
                }
            }
            Err(err) => self.report(&err),
        }
        State::MainMenu
    }

    fn report(&mut self, err: &shelf::Error) {
        debug!("{err}");
        let message = match err.kind() {
            ErrorKind::Network => {
                "Could not reach the book catalog. Check your connection and try again.".to_owned()
            }
            ErrorKind::Api(status) => {
                format!("The book catalog could not complete the search (HTTP {status}).")
            }
            ErrorKind::Parse => "The book catalog sent a response that could not be read.".to_owned(),
            ErrorKind::CorruptLibrary => format!(
                "Your library file '{}' could not be read and was left untouched.",
                self.library.path().display()
            ),
            ErrorKind::Storage => format!(
                "Your library could not be written to '{}'.",
                self.library.path().display()
            ),
        };
        self.prompt.show(&message);
    }
}
