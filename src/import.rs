// Reader import entry point
//
// The reader application exposes ingestion to the harness through this
// trait, a deliberate test-only API. The harness never reaches into the
// reader's internals; it hands over the fixture stream and observes the
// outcome.

use std::io::Read;
use std::path::PathBuf;

use crate::error::Result;

/// Everything the reader needs to ingest one publication.
pub struct ImportRequest {
    /// Fixture file name as provisioned into the import directory.
    pub fixture_name: String,
    /// Unique identifier generated per import attempt.
    pub identifier: String,
    /// Where the reader should place its ingested copy.
    pub destination: PathBuf,
    /// The fixture byte stream.
    pub source: Box<dyn Read>,
}

/// What the reader did with the publication. A rejected import is an
/// expected, observable outcome, not a harness failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Added { book_id: i64 },
    Rejected { reason: String },
}

impl ImportOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, ImportOutcome::Added { .. })
    }
}

/// Implemented by the application under test (or a scripted stand-in).
pub trait ReaderImport {
    fn import_publication(&mut self, request: ImportRequest) -> Result<ImportOutcome>;
}
