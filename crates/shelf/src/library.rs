//! The saved library on the filesystem.
//!
//! The library is a single JSON file holding an array of [`Book`]s. Every operation goes to disk:
//! the whole file is read, changed in memory and written back.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{info, trace, warn};

use crate::{Book, Error, ErrorKind};

/// File name used for the library when no other path is given.
pub const DEFAULT_LIBRARY_FILE: &str = "my_library.json";

/// A handle on the library file at a given path.
///
/// No books are held in memory between calls, so the file is the only source of truth.
#[derive(Clone, Debug)]
pub struct Library {
    path: PathBuf,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_FILE)
    }
}

impl Library {
    /// Creates a handle on the library file at `path`. The file does not need to exist yet.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The path of the library file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every saved book, in the order they were saved.
    ///
    /// A library file that does not exist yet is an empty library.
    ///
    /// # Errors
    /// An [`Err`] with [`ErrorKind::CorruptLibrary`] is returned when the file exists but cannot
    /// be read or does not hold a JSON array of books. The file is left untouched.
    pub fn load(&self) -> Result<Vec<Book>, Error> {
        trace!("Loading library from '{}'", self.path.display());
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "No library file found at '{}' - starting with an empty library",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::wrap(ErrorKind::CorruptLibrary, e).context(format!(
                    "cannot read library file '{}'",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            Error::wrap(ErrorKind::CorruptLibrary, e).context(format!(
                "library file '{}' is not a list of books",
                self.path.display()
            ))
        })
    }

    /// Replaces the content of the library file with `books`.
    ///
    /// The books are written to a temporary file next to the library which is then renamed over
    /// it, so the library file is never left half written.
    ///
    /// # Errors
    /// An [`Err`] with [`ErrorKind::Storage`] is returned when the file cannot be written, e.g. the
    /// user lacks permissions or the disk is full.
    pub fn save(&self, books: &[Book]) -> Result<(), Error> {
        trace!(
            "Writing {} book(s) to '{}'",
            books.len(),
            self.path.display()
        );
        let tmp = self.tmp_path();
        let res = self.write_tmp(&tmp, books).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(|e| Error::wrap(ErrorKind::Storage, e))
        });

        if res.is_err() && tmp.exists() {
            // the library itself is untouched, only the scratch file needs removing
            let _ = fs::remove_file(&tmp);
        }

        res.map_err(|e| e.context(format!("cannot save library to '{}'", self.path.display())))
    }

    /// Adds `book` to the end of the library and returns how many books the library now holds.
    ///
    /// Saving a book that is already in the library stores it a second time.
    ///
    /// # Errors
    /// An [`Err`] is returned when the library cannot be loaded, see [`Library::load`], or saved,
    /// see [`Library::save`].
    pub fn append(&self, book: Book) -> Result<usize, Error> {
        let mut books = self.load()?;
        if books.iter().any(|saved| saved.same_edition(&book)) {
            warn!("'{}' is already in the library", book.title);
        }
        books.push(book);
        self.save(&books)?;
        info!(
            "Library '{}' now holds {} book(s)",
            self.path.display(),
            books.len()
        );
        Ok(books.len())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_tmp(&self, tmp: &Path, books: &[Book]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::wrap(ErrorKind::Storage, e))?;
        }

        let file = File::create(tmp).map_err(|e| Error::wrap(ErrorKind::Storage, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, books)
            .map_err(|e| Error::wrap(ErrorKind::Storage, e))?;
        writer
            .flush()
            .and_then(|()| writer.get_ref().sync_all())
            .map_err(|e| Error::wrap(ErrorKind::Storage, e))
    }
}
