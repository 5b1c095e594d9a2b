// Bookrig CLI binary
//
// Device-state housekeeping for test runs: initialize a state root, reset
// the reader database and storage, provision fixtures, inspect state.
// UI-path operations need a live driver and are library-only.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bookrig::db::{self, schema};
use bookrig::fixtures::FixtureStore;
use bookrig::reset;

#[derive(Parser)]
#[command(name = "bookrig")]
#[command(about = "Fixture harness for e-reader integration tests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a device-state root
    Init {
        /// State root path
        path: PathBuf,
    },

    /// Drop and recreate the reader tables, sweep the import directory
    Reset {
        /// State root (defaults to current directory)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Copy a fixture into the import directory
    Provision {
        /// Fixture file name
        name: String,
        /// State root (defaults to current directory)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// Show row counts and provisioned files
    Status {
        /// State root (defaults to current directory)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },

    /// List bundled fixtures
    Fixtures {
        /// State root (defaults to current directory)
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => cmd_init(path),
        Commands::Reset { state } => cmd_reset(state),
        Commands::Provision { name, state } => cmd_provision(name, state),
        Commands::Status { state } => cmd_status(state),
        Commands::Fixtures { state } => cmd_fixtures(state),
    }
}

fn resolve_state_root(state: Option<PathBuf>) -> Result<PathBuf> {
    let root = match state {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    root.canonicalize()
        .map_err(|_| anyhow::anyhow!("State root does not exist: {}", root.display()))
}

fn cmd_init(path: PathBuf) -> Result<()> {
    db::init_state_folders(&path)?;
    let conn = db::open_db(&db::get_db_path(&path))?;
    reset::reset_database(&conn)?;

    println!("Initialized device state at {}", path.display());
    println!("Structure created:");
    println!("  .bookrig/bookrig.db - Reader database (books, bookmarks, positions)");
    println!("  imports/            - Directory the reader ingests from");
    println!("  fixtures/           - Bundled sample publications");

    Ok(())
}

fn cmd_reset(state: Option<PathBuf>) -> Result<()> {
    let root = resolve_state_root(state)?;
    db::init_state_folders(&root)?;
    let conn = db::open_db(&db::get_db_path(&root))?;

    reset::reset_database(&conn)?;
    reset::sweep_storage(&[db::get_imports_path(&root)]);

    println!("Reset complete: tables recreated, import directory swept");
    Ok(())
}

fn cmd_provision(name: String, state: Option<PathBuf>) -> Result<()> {
    let root = resolve_state_root(state)?;
    let store = FixtureStore::new(db::get_fixtures_path(&root));

    let dest = store.provision(&name, &db::get_imports_path(&root))?;
    println!("Provisioned {} -> {}", name, dest.display());

    Ok(())
}

fn cmd_status(state: Option<PathBuf>) -> Result<()> {
    let root = resolve_state_root(state)?;
    let conn = db::open_db(&db::get_db_path(&root))?;

    println!("Device state: {}", root.display());
    println!("  Books:     {}", schema::count_books(&conn)?);
    println!("  Bookmarks: {}", schema::count_bookmarks(&conn)?);
    println!("  Positions: {}", schema::count_positions(&conn)?);

    let imports = db::get_imports_path(&root);
    println!("Provisioned files:");
    let mut any = false;
    if imports.is_dir() {
        for entry in std::fs::read_dir(&imports)? {
            let entry = entry?;
            println!("  {}", entry.file_name().to_string_lossy());
            any = true;
        }
    }
    if !any {
        println!("  (none)");
    }

    Ok(())
}

fn cmd_fixtures(state: Option<PathBuf>) -> Result<()> {
    let root = resolve_state_root(state)?;
    let store = FixtureStore::new(db::get_fixtures_path(&root));

    for name in store.list()? {
        println!("{}", name);
    }

    Ok(())
}
