#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process, time::Duration};

mod app;
mod commands;
mod interact;

use app::App;
use commands::Commands;
use interact::Terminal;

use shelf::{Catalog, Library};

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                file,
                max_results,
                timeout,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    trace!("Using library file '{}'", file.display());
    let library = Library::new(file);
    let catalog = Catalog::connect(Duration::from_secs(timeout))?.max_results(max_results);

    if let Some(command) = command {
        let message = command.execute(&catalog, &library)?;
        if !quiet {
            println!("{message}");
        }
        Ok(())
    } else {
        trace!("No subcommand given - starting interactive mode");
        App::new(catalog, library, Terminal::default()).run()
    }
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "shelf")]
#[clap(about = "Search a book catalog and keep a library of the books you like in the terminal")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// The library file
    #[clap(
        short,
        long,
        parse(from_os_str),
        env = "SHELF_LIBRARY",
        default_value = shelf::library::DEFAULT_LIBRARY_FILE,
        global = true
    )]
    file: PathBuf,

    /// The most books a search returns (1 to 40)
    #[clap(long, default_value_t = shelf::DEFAULT_MAX_RESULTS, global = true)]
    max_results: u8,

    /// Seconds to wait for the book catalog before giving up
    #[clap(long, default_value_t = shelf::DEFAULT_TIMEOUT.as_secs(), global = true)]
    timeout: u64,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from writing to stdout, errors will still be printed to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
