// Bookrig constants
// Table names and column layouts mirror what the reader application reads.
// Do not change without updating the reader's database contract.

// Database
pub const DB_FILENAME: &str = "bookrig.db";
pub const BOOKS_TABLE: &str = "books";
pub const BOOKMARKS_TABLE: &str = "bookmarks";
pub const POSITIONS_TABLE: &str = "positions";

// Device-state layout
pub const BOOKRIG_FOLDER: &str = ".bookrig";
pub const IMPORTS_FOLDER: &str = "imports";
pub const FIXTURES_FOLDER: &str = "fixtures";

// Provisioning
pub const COPY_CHUNK_SIZE: usize = 65_536; // 64KB

// Polling
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;
pub const IMPORT_SETTLE_TIMEOUT_MS: u64 = 10_000;

// Platform prompts
pub const STORAGE_PERMISSION_PROMPT: &str = "Allow";
