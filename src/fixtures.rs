// Fixture store and provisioning copy

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::constants::COPY_CHUNK_SIZE;
use crate::error::{BookrigError, Result};

/// A directory of immutable sample publications bundled with the test
/// package. Fixtures are copied, never mutated.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FixtureStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    /// List fixture names in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Open the byte stream of a bundled fixture.
    pub fn open(&self, name: &str) -> Result<fs::File> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(BookrigError::FixtureNotFound(name.to_string()));
        }
        Ok(fs::File::open(path)?)
    }

    /// Copy the named fixture into `dest_dir`, preserving length and content
    /// exactly. Returns the destination path.
    pub fn provision(&self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let source_path = self.root.join(name);
        if !source_path.is_file() {
            return Err(BookrigError::FixtureNotFound(name.to_string()));
        }

        fs::create_dir_all(dest_dir)?;
        let dest_path = dest_dir.join(name);

        copy_with_verify(&source_path, &dest_path)?;

        log::info!("Provisioned fixture {} -> {}", name, dest_path.display());
        Ok(dest_path)
    }
}

/// Chunked copy with read-back verification. A single read does not drain
/// the source; the loop runs until end-of-stream.
fn copy_with_verify(source: &Path, dest: &Path) -> Result<()> {
    let mut source_file = fs::File::open(source)?;
    let mut dest_file = fs::File::create(dest)?;
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];

    loop {
        let bytes_read = source_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        dest_file.write_all(&buffer[..bytes_read])?;
    }
    dest_file.sync_all()?;
    drop(dest_file);

    // Verify by size, then by content hash
    let source_size = fs::metadata(source)?.len();
    let dest_size = fs::metadata(dest)?.len();

    if source_size != dest_size {
        let _ = fs::remove_file(dest);
        return Err(BookrigError::CopyVerify(format!(
            "size mismatch ({} vs {})",
            source_size, dest_size
        )));
    }

    let source_hash = hash_file(source)?;
    let dest_hash = hash_file(dest)?;
    if source_hash != dest_hash {
        let _ = fs::remove_file(dest);
        return Err(BookrigError::CopyVerify(format!(
            "content hash mismatch for {}",
            dest.display()
        )));
    }

    // Preserve modification time
    if let Ok(source_meta) = fs::metadata(source) {
        if let Ok(modified) = source_meta.modified() {
            let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(modified));
        }
    }

    Ok(())
}

/// Full BLAKE3 hash of a file, chunked.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &[u8])]) -> (TempDir, FixtureStore) {
        let tmp = TempDir::new().unwrap();
        let fixtures = tmp.path().join("fixtures");
        fs::create_dir_all(&fixtures).unwrap();
        for (name, content) in files {
            fs::write(fixtures.join(name), content).unwrap();
        }
        let store = FixtureStore::new(&fixtures);
        (tmp, store)
    }

    #[test]
    fn test_provision_preserves_bytes_exactly() {
        let content = b"PK\x03\x04 epub-ish bytes".as_slice();
        let (tmp, store) = store_with(&[("sample.epub", content)]);
        let imports = tmp.path().join("imports");

        let dest = store.provision("sample.epub", &imports).unwrap();

        assert_eq!(dest, imports.join("sample.epub"));
        assert_eq!(fs::read(&dest).unwrap(), content);
    }

    #[test]
    fn test_provision_multi_chunk_content() {
        // Larger than one copy buffer so the read loop must iterate.
        let mut content = Vec::with_capacity(COPY_CHUNK_SIZE * 3 + 17);
        for i in 0..(COPY_CHUNK_SIZE * 3 + 17) {
            content.push((i % 251) as u8);
        }
        let (tmp, store) = store_with(&[("big.cbz", &content)]);
        let imports = tmp.path().join("imports");

        let dest = store.provision("big.cbz", &imports).unwrap();

        let copied = fs::read(&dest).unwrap();
        assert_eq!(copied.len(), content.len());
        assert_eq!(copied, content);
    }

    #[test]
    fn test_provision_unknown_fixture() {
        let (tmp, store) = store_with(&[]);
        let err = store
            .provision("missing.epub", &tmp.path().join("imports"))
            .unwrap_err();
        assert!(matches!(err, BookrigError::FixtureNotFound(name) if name == "missing.epub"));
    }

    #[test]
    fn test_list_and_contains() {
        let (_tmp, store) = store_with(&[("b.epub", b"PK"), ("a.cbz", b"PK")]);
        assert_eq!(store.list().unwrap(), vec!["a.cbz", "b.epub"]);
        assert!(store.contains("a.cbz"));
        assert!(!store.contains("c.audiobook"));
    }

    #[test]
    fn test_reprovision_overwrites_previous_copy() {
        let (tmp, store) = store_with(&[("sample.epub", b"PK new bytes")]);
        let imports = tmp.path().join("imports");
        fs::create_dir_all(&imports).unwrap();
        fs::write(imports.join("sample.epub"), b"stale leftover").unwrap();

        store.provision("sample.epub", &imports).unwrap();

        assert_eq!(fs::read(imports.join("sample.epub")).unwrap(), b"PK new bytes");
    }
}
