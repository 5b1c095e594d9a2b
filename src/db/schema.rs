// Reader database schema types and query helpers
//
// The three tables belong to the reader application; the harness recreates
// them wholesale (never migrates) so each test starts from a known schema.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::constants::{BOOKMARKS_TABLE, BOOKS_TABLE, POSITIONS_TABLE};
use crate::error::Result;

/// Fixed column layout for each reader table, recreated on every reset.
const TABLE_SCHEMAS: &[(&str, &str)] = &[
    (
        BOOKS_TABLE,
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            filename TEXT NOT NULL,
            title TEXT,
            author TEXT,
            file_url TEXT,
            identifier TEXT,
            cover BLOB,
            cover_url TEXT,
            extension TEXT,
            creation INTEGER NOT NULL
        )",
    ),
    (
        BOOKMARKS_TABLE,
        "CREATE TABLE bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            publication_id TEXT,
            resource_index INTEGER,
            resource_href TEXT NOT NULL,
            resource_type TEXT,
            resource_title TEXT,
            location TEXT NOT NULL,
            locator_text TEXT,
            creation_date INTEGER NOT NULL
        )",
    ),
    (
        POSITIONS_TABLE,
        "CREATE TABLE positions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            synthetic_page_list TEXT
        )",
    ),
];

/// Drop every reader table that exists. Errors propagate; a failed drop
/// means every later test outcome is meaningless.
pub fn drop_tables(conn: &Connection) -> Result<()> {
    for (name, _) in TABLE_SCHEMAS {
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", name))?;
    }
    Ok(())
}

/// Create the reader tables with their fixed schemas.
pub fn create_tables(conn: &Connection) -> Result<()> {
    for (_, sql) in TABLE_SCHEMAS {
        conn.execute_batch(sql)?;
    }
    Ok(())
}

// ----- Book -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub filename: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub file_url: Option<String>,
    pub identifier: Option<String>,
    pub cover: Option<Vec<u8>>,
    pub cover_url: Option<String>,
    pub extension: Option<String>,
    pub creation: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub filename: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub file_url: Option<String>,
    pub identifier: Option<String>,
    pub cover: Option<Vec<u8>>,
    pub cover_url: Option<String>,
    pub extension: Option<String>,
}

pub fn insert_book(conn: &Connection, book: &NewBook) -> Result<i64> {
    conn.execute(
        "INSERT INTO books (filename, title, author, file_url, identifier, cover, cover_url, extension, creation)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            book.filename,
            book.title,
            book.author,
            book.file_url,
            book.identifier,
            book.cover,
            book.cover_url,
            book.extension,
            Utc::now().timestamp_millis(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_book(conn: &Connection, id: i64) -> Result<Option<Book>> {
    let result = conn
        .query_row(
            "SELECT id, filename, title, author, file_url, identifier, cover, cover_url, extension, creation
             FROM books WHERE id = ?1",
            params![id],
            map_book,
        )
        .optional()?;
    Ok(result)
}

pub fn list_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare(
        "SELECT id, filename, title, author, file_url, identifier, cover, cover_url, extension, creation
         FROM books ORDER BY creation DESC, id DESC",
    )?;

    let books = stmt
        .query_map([], map_book)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(books)
}

pub fn count_books(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
    Ok(count)
}

fn map_book(row: &rusqlite::Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        filename: row.get(1)?,
        title: row.get(2)?,
        author: row.get(3)?,
        file_url: row.get(4)?,
        identifier: row.get(5)?,
        cover: row.get(6)?,
        cover_url: row.get(7)?,
        extension: row.get(8)?,
        creation: row.get(9)?,
    })
}

// ----- Bookmark -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub book_id: i64,
    pub publication_id: Option<String>,
    pub resource_index: Option<i64>,
    pub resource_href: String,
    pub resource_type: Option<String>,
    pub resource_title: Option<String>,
    pub location: String,
    pub locator_text: Option<String>,
    pub creation_date: i64,
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub book_id: i64,
    pub publication_id: Option<String>,
    pub resource_index: Option<i64>,
    pub resource_href: String,
    pub resource_type: Option<String>,
    pub resource_title: Option<String>,
    pub location: String,
    pub locator_text: Option<String>,
}

/// Insert a bookmark, deduplicating by logical location. Bookmarking the
/// same (book, resource, location) twice returns the existing row id.
pub fn insert_bookmark(conn: &Connection, bookmark: &NewBookmark) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM bookmarks WHERE book_id = ?1 AND resource_href = ?2 AND location = ?3",
            params![bookmark.book_id, bookmark.resource_href, bookmark.location],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO bookmarks (book_id, publication_id, resource_index, resource_href,
                                resource_type, resource_title, location, locator_text, creation_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            bookmark.book_id,
            bookmark.publication_id,
            bookmark.resource_index,
            bookmark.resource_href,
            bookmark.resource_type,
            bookmark.resource_title,
            bookmark.location,
            bookmark.locator_text,
            Utc::now().timestamp_millis(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_bookmarks(conn: &Connection, book_id: i64) -> Result<Vec<Bookmark>> {
    let mut stmt = conn.prepare(
        "SELECT id, book_id, publication_id, resource_index, resource_href, resource_type,
                resource_title, location, locator_text, creation_date
         FROM bookmarks WHERE book_id = ?1 ORDER BY creation_date ASC, id ASC",
    )?;

    let bookmarks = stmt
        .query_map(params![book_id], |row| {
            Ok(Bookmark {
                id: row.get(0)?,
                book_id: row.get(1)?,
                publication_id: row.get(2)?,
                resource_index: row.get(3)?,
                resource_href: row.get(4)?,
                resource_type: row.get(5)?,
                resource_title: row.get(6)?,
                location: row.get(7)?,
                locator_text: row.get(8)?,
                creation_date: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(bookmarks)
}

pub fn count_bookmarks(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
    Ok(count)
}

pub fn delete_bookmark(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
    Ok(())
}

// ----- Position -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub book_id: i64,
    pub synthetic_page_list: Option<String>,
}

pub fn upsert_position(conn: &Connection, book_id: i64, page_list: &serde_json::Value) -> Result<i64> {
    let serialized = serde_json::to_string(page_list)?;

    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM positions WHERE book_id = ?1",
            params![book_id],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        conn.execute(
            "UPDATE positions SET synthetic_page_list = ?1 WHERE id = ?2",
            params![serialized, id],
        )?;
        return Ok(id);
    }

    conn.execute(
        "INSERT INTO positions (book_id, synthetic_page_list) VALUES (?1, ?2)",
        params![book_id, serialized],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_position(conn: &Connection, book_id: i64) -> Result<Option<Position>> {
    let result = conn
        .query_row(
            "SELECT id, book_id, synthetic_page_list FROM positions WHERE book_id = ?1",
            params![book_id],
            |row| {
                Ok(Position {
                    id: row.get(0)?,
                    book_id: row.get(1)?,
                    synthetic_page_list: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

pub fn count_positions(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM positions", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn sample_book(filename: &str) -> NewBook {
        NewBook {
            filename: filename.to_string(),
            title: Some("Feuilles d'automne".to_string()),
            extension: Some("epub".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_list_books() {
        let conn = fresh_conn();
        let id = insert_book(&conn, &sample_book("sample.epub")).unwrap();
        assert!(id > 0);

        let books = list_books(&conn).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].filename, "sample.epub");
        assert!(books[0].creation > 0);
    }

    #[test]
    fn test_drop_create_is_idempotent() {
        let conn = fresh_conn();
        insert_book(&conn, &sample_book("sample.epub")).unwrap();

        drop_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        drop_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        assert_eq!(count_books(&conn).unwrap(), 0);
        assert_eq!(count_bookmarks(&conn).unwrap(), 0);
        assert_eq!(count_positions(&conn).unwrap(), 0);
    }

    #[test]
    fn test_drop_tables_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        // No tables exist yet; DROP TABLE IF EXISTS must not error.
        drop_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_bookmark_dedup_by_location() {
        let conn = fresh_conn();
        let book_id = insert_book(&conn, &sample_book("sample.epub")).unwrap();

        let bookmark = NewBookmark {
            book_id,
            publication_id: Some("urn:uuid:feedface".to_string()),
            resource_index: Some(1),
            resource_href: "/ch1.xhtml".to_string(),
            resource_type: Some("application/xhtml+xml".to_string()),
            resource_title: Some("Chapitre I".to_string()),
            location: r#"{"progression":0.25}"#.to_string(),
            locator_text: None,
        };

        let first = insert_bookmark(&conn, &bookmark).unwrap();
        let second = insert_bookmark(&conn, &bookmark).unwrap();
        assert_eq!(first, second);
        assert_eq!(count_bookmarks(&conn).unwrap(), 1);

        // A different location on the same resource is a new bookmark.
        let other = NewBookmark {
            location: r#"{"progression":0.75}"#.to_string(),
            ..bookmark
        };
        let third = insert_bookmark(&conn, &other).unwrap();
        assert_ne!(first, third);
        assert_eq!(count_bookmarks(&conn).unwrap(), 2);
    }

    #[test]
    fn test_position_upsert() {
        let conn = fresh_conn();
        let book_id = insert_book(&conn, &sample_book("sample.epub")).unwrap();

        let first = upsert_position(&conn, book_id, &serde_json::json!([1, 2, 3])).unwrap();
        let second = upsert_position(&conn, book_id, &serde_json::json!([1, 2, 3, 4])).unwrap();
        assert_eq!(first, second);
        assert_eq!(count_positions(&conn).unwrap(), 1);

        let pos = get_position(&conn, book_id).unwrap().unwrap();
        assert_eq!(pos.synthetic_page_list.as_deref(), Some("[1,2,3,4]"));
    }
}
