// Environment reset
//
// Every test starts and ends here: drop and recreate the reader tables,
// sweep the storage directories the reader imports from, and clear any
// pending permission prompt. Schema failures propagate; sweep failures are
// logged and swallowed so a stuck file cannot cascade into false failures.

use std::path::Path;

use rusqlite::Connection;
use walkdir::WalkDir;

use crate::constants::STORAGE_PERMISSION_PROMPT;
use crate::db::schema;
use crate::error::Result;
use crate::ui::UiDriver;

/// Drop and recreate the books, bookmarks and positions tables.
/// Idempotent; errors propagate because a broken schema makes every
/// subsequent test outcome meaningless.
pub fn reset_database(conn: &Connection) -> Result<()> {
    schema::drop_tables(conn)?;
    schema::create_tables(conn)?;
    Ok(())
}

/// Delete every file and subdirectory under each given root. The roots
/// themselves are kept. Missing roots and undeletable entries are logged,
/// not raised; the sweep always visits everything it can.
pub fn sweep_storage(dirs: &[impl AsRef<Path>]) {
    for dir in dirs {
        sweep_dir(dir.as_ref());
    }
}

fn sweep_dir(root: &Path) {
    if !root.exists() {
        log::debug!("Storage sweep: {} does not exist, skipping", root.display());
        return;
    }

    // contents_first so directories are empty by the time they are removed
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Storage sweep: unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };

        if entry.path() == root {
            continue;
        }

        let result = if entry.file_type().is_dir() {
            std::fs::remove_dir(entry.path())
        } else {
            std::fs::remove_file(entry.path())
        };

        if let Err(err) = result {
            log::warn!("Storage sweep: could not delete {}: {}", entry.path().display(), err);
        }
    }
}

/// Full environment reset: recreate the schema, sweep storage, and accept
/// the storage-permission prompt if one is showing. Prompt absence is the
/// normal case, not an error.
pub fn reset_environment(
    conn: &Connection,
    storage_dirs: &[impl AsRef<Path>],
    driver: &mut dyn UiDriver,
) -> Result<()> {
    reset_database(conn)?;
    sweep_storage(storage_dirs);

    if driver.prompt_present(STORAGE_PERMISSION_PROMPT) {
        driver.accept_prompt(STORAGE_PERMISSION_PROMPT)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{count_books, insert_book, NewBook};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_reset_database_empties_tables() {
        let conn = Connection::open_in_memory().unwrap();
        reset_database(&conn).unwrap();

        insert_book(
            &conn,
            &NewBook {
                filename: "sample.epub".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(count_books(&conn).unwrap(), 1);

        reset_database(&conn).unwrap();
        assert_eq!(count_books(&conn).unwrap(), 0);

        // Twice in a row leaves the same empty-schema state.
        reset_database(&conn).unwrap();
        assert_eq!(count_books(&conn).unwrap(), 0);
    }

    #[test]
    fn test_sweep_removes_nested_files_but_keeps_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("imports");
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("leftover.epub"), b"PK").unwrap();
        fs::write(root.join("nested/deeper/stale.cbz"), b"PK").unwrap();

        sweep_storage(&[&root]);

        assert!(root.exists());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn test_sweep_tolerates_missing_directory() {
        let missing = PathBuf::from("/nonexistent/bookrig-sweep-target");
        // Must not panic or error
        sweep_storage(&[&missing]);
    }
}
