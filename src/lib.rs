// Bookrig - fixture harness for e-reader integration tests

pub mod constants;
pub mod error;
pub mod db;
pub mod fixtures;
pub mod import;
pub mod reset;
pub mod sync;
pub mod ui;
pub mod harness;

pub use error::{BookrigError, Result};
pub use fixtures::FixtureStore;
pub use harness::TestHarness;
pub use import::{ImportOutcome, ImportRequest, ReaderImport};
pub use ui::map::{DeviceProfile, NavStep, UiMap};
pub use ui::{ElementId, StringKey, StringResources, UiDriver};
