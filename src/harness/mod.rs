// Test harness facade
//
// Ties the pieces together for a scenario test: reset, provision, import
// (UI path or direct path), then assert against the database and screen.


use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use uuid::Uuid;

use crate::constants::IMPORT_SETTLE_TIMEOUT_MS;
use crate::db::{self, schema};
use crate::error::{BookrigError, Result};
use crate::fixtures::FixtureStore;
use crate::import::{ImportOutcome, ImportRequest, ReaderImport};
use crate::reset;
use crate::sync;
use crate::ui::map::UiMap;
use crate::ui::{ElementId, StringKey, StringResources, UiDriver};

pub struct TestHarness {
    conn: Connection,
    imports_dir: PathBuf,
    storage_dirs: Vec<PathBuf>,
    fixtures: FixtureStore,
    ui_map: UiMap,
    ui_version: u32,
    settle_timeout: Duration,
    driver: Box<dyn UiDriver>,
    resources: Box<dyn StringResources>,
    importer: Box<dyn ReaderImport>,
}

impl TestHarness {
    /// Build a harness over a device-state root. Creates the folder layout
    /// and opens the reader database; call `reset` before the first test.
    pub fn new(
        state_root: &Path,
        driver: Box<dyn UiDriver>,
        resources: Box<dyn StringResources>,
        importer: Box<dyn ReaderImport>,
    ) -> Result<Self> {
        db::init_state_folders(state_root)?;

        let conn = db::open_db(&db::get_db_path(state_root))?;
        let imports_dir = db::get_imports_path(state_root);
        let fixtures = FixtureStore::new(db::get_fixtures_path(state_root));

        Ok(TestHarness {
            conn,
            storage_dirs: vec![imports_dir.clone()],
            imports_dir,
            fixtures,
            ui_map: UiMap::default(),
            ui_version: 23,
            settle_timeout: Duration::from_millis(IMPORT_SETTLE_TIMEOUT_MS),
            driver,
            resources,
            importer,
        })
    }

    pub fn with_ui_map(mut self, ui_map: UiMap) -> Self {
        self.ui_map = ui_map;
        self
    }

    pub fn with_ui_version(mut self, version: u32) -> Self {
        self.ui_version = version;
        self
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Register an extra storage root to sweep on reset, e.g. the reader
    /// package's own external files directory.
    pub fn register_storage_dir(&mut self, dir: impl Into<PathBuf>) {
        self.storage_dirs.push(dir.into());
    }

    // ----- Environment -----

    /// Symmetric reset, run before and after every scenario.
    pub fn reset(&mut self) -> Result<()> {
        reset::reset_environment(&self.conn, &self.storage_dirs, self.driver.as_mut())
    }

    /// Copy a fixture into the reader's import directory.
    pub fn provision_fixture(&self, name: &str) -> Result<PathBuf> {
        self.fixtures.provision(name, &self.imports_dir)
    }

    // ----- Import paths -----

    /// Drive the reader's visible import flow: add-book button, device
    /// picker, the versioned folder navigation, then a bounded wait for the
    /// cover view. An unsupported picker layout fails before any click.
    pub fn import_via_ui(&mut self, name: &str) -> Result<ImportOutcome> {
        if self.ui_map.profile(self.ui_version).is_none() {
            return Err(BookrigError::UnsupportedUiVersion(self.ui_version));
        }

        self.provision_fixture(name)?;

        let add_book = self.resources.require(StringKey::AddBookTag)?;
        self.driver.click_text(&add_book)?;
        let add_device_book = self.resources.require(StringKey::AddDeviceBookTag)?;
        self.driver.click_text(&add_device_book)?;

        self.ui_map.navigate(
            self.driver.as_mut(),
            self.resources.as_ref(),
            self.ui_version,
            name,
        )?;

        if sync::element_appears(
            self.driver.as_ref(),
            ElementId::CoverImageView,
            self.settle_timeout,
        ) {
            let book_id = schema::list_books(&self.conn)?
                .first()
                .map(|book| book.id)
                .ok_or_else(|| {
                    BookrigError::Other("cover view shown but no library record".to_string())
                })?;
            Ok(ImportOutcome::Added { book_id })
        } else {
            Ok(ImportOutcome::Rejected {
                reason: format!("cover view did not appear for {}", name),
            })
        }
    }

    /// Bypass the UI and hand the fixture straight to the reader's import
    /// entry point. Used when only the post-import state matters.
    pub fn import_direct(&mut self, name: &str) -> Result<ImportOutcome> {
        self.provision_fixture(name)?;

        let identifier = Uuid::new_v4().to_string();
        let destination = self.imports_dir.join(&identifier);
        let source = Box::new(self.fixtures.open(name)?);

        self.importer.import_publication(ImportRequest {
            fixture_name: name.to_string(),
            identifier,
            destination,
            source,
        })
    }

    // ----- Seeding and assertions -----

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn imports_dir(&self) -> &Path {
        &self.imports_dir
    }

    pub fn fixtures(&self) -> &FixtureStore {
        &self.fixtures
    }

    pub fn count_books(&self) -> Result<i64> {
        schema::count_books(&self.conn)
    }

    pub fn count_bookmarks(&self) -> Result<i64> {
        schema::count_bookmarks(&self.conn)
    }

    pub fn count_positions(&self) -> Result<i64> {
        schema::count_positions(&self.conn)
    }

    pub fn list_books(&self) -> Result<Vec<schema::Book>> {
        schema::list_books(&self.conn)
    }

    pub fn add_bookmark(&self, bookmark: &schema::NewBookmark) -> Result<i64> {
        schema::insert_bookmark(&self.conn, bookmark)
    }

    pub fn element_present(&self, element: ElementId) -> bool {
        self.driver.element_present(element)
    }

    /// Bounded wait for an on-screen element, using the harness settle
    /// timeout.
    pub fn wait_for_element(&self, element: ElementId) -> Result<()> {
        sync::wait_for_element(self.driver.as_ref(), element, self.settle_timeout)
    }
}
