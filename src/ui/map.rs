// Versioned UI navigation map
//
// The file-picker layout differs per device and OS version. Instead of
// branching inside test logic, each supported layout declares its step
// sequence here; an unknown version fails before any click is attempted.

use serde::{Deserialize, Serialize};

use crate::error::{BookrigError, Result};
use crate::ui::{StringKey, StringResources, UiDriver};

/// One navigation step in the reader's "import from device" picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavStep {
    /// Click the view labeled with the resolved string.
    Click(StringKey),
    /// Scroll until the resolved string is visible, then click it.
    ScrollToAndClick(StringKey),
    /// Click the entry named after the fixture being imported.
    ClickFixture,
}

/// Navigation steps for one device/OS layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub version: u32,
    pub name: String,
    pub steps: Vec<NavStep>,
}

/// All picker layouts the harness knows how to drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiMap {
    profiles: Vec<DeviceProfile>,
}

impl UiMap {
    pub fn new() -> Self {
        UiMap { profiles: Vec::new() }
    }

    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn profile(&self, version: u32) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.version == version)
    }

    pub fn supported_versions(&self) -> Vec<u32> {
        self.profiles.iter().map(|p| p.version).collect()
    }

    /// Execute the step sequence for the given layout version, ending on the
    /// fixture entry itself. Fails with `UnsupportedUiVersion` before any
    /// interaction when the version has no profile.
    pub fn navigate(
        &self,
        driver: &mut dyn UiDriver,
        resources: &dyn StringResources,
        version: u32,
        fixture_name: &str,
    ) -> Result<()> {
        let profile = self
            .profile(version)
            .ok_or(BookrigError::UnsupportedUiVersion(version))?;

        log::debug!("Navigating picker layout '{}' (version {})", profile.name, version);

        for step in &profile.steps {
            match step {
                NavStep::Click(key) => {
                    driver.click_text(&resources.require(*key)?)?;
                }
                NavStep::ScrollToAndClick(key) => {
                    driver.scroll_to_text(&resources.require(*key)?)?;
                }
                NavStep::ClickFixture => {
                    driver.click_text(fixture_name)?;
                }
            }
        }

        Ok(())
    }
}

impl Default for UiMap {
    /// The layouts the stock harness supports. Currently the SDK 23 tablet
    /// picker; new device layouts register additional profiles.
    fn default() -> Self {
        UiMap::new().with_profile(DeviceProfile {
            version: 23,
            name: "android-6-tablet".to_string(),
            steps: vec![
                NavStep::Click(StringKey::InternalStorage),
                NavStep::ScrollToAndClick(StringKey::Folder1),
                NavStep::Click(StringKey::Folder2),
                NavStep::ScrollToAndClick(StringKey::Folder3),
                NavStep::Click(StringKey::Folder4),
                NavStep::ClickFixture,
            ],
        })
    }
}
