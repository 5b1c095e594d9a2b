// Database module

pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::constants::{BOOKRIG_FOLDER, DB_FILENAME, FIXTURES_FOLDER, IMPORTS_FOLDER};
use crate::error::Result;

/// Open or create a database at the given path.
///
/// Does not create the reader tables; `reset::reset_environment` owns the
/// drop-and-recreate cycle so tests never run against a half-migrated schema.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable foreign keys (must be done per connection)
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    Ok(conn)
}

/// Get the database path for a device-state root
pub fn get_db_path(state_root: &Path) -> PathBuf {
    state_root.join(BOOKRIG_FOLDER).join(DB_FILENAME)
}

/// Get the import directory the reader ingests from
pub fn get_imports_path(state_root: &Path) -> PathBuf {
    state_root.join(IMPORTS_FOLDER)
}

/// Get the bundled fixture store directory
pub fn get_fixtures_path(state_root: &Path) -> PathBuf {
    state_root.join(FIXTURES_FOLDER)
}

/// Initialize device-state folder structure
pub fn init_state_folders(state_root: &Path) -> Result<()> {
    std::fs::create_dir_all(state_root.join(BOOKRIG_FOLDER))?;
    std::fs::create_dir_all(state_root.join(IMPORTS_FOLDER))?;
    std::fs::create_dir_all(state_root.join(FIXTURES_FOLDER))?;

    Ok(())
}
