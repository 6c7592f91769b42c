//! Scratch directory and ZIP packaging.
//!
//! Fragments are written to a [`tempfile::TempDir`] first, then zipped in the
//! order they were added. The `mimetype` entry always comes first and is
//! stored uncompressed; InDesign sniffs it at a fixed offset.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::xml::IDML_MIMETYPE;
use crate::error::Result;

const MIMETYPE_ENTRY: &str = "mimetype";

/// Returns `true` if `name` is a relative path that stays below its root.
///
/// Backslashes count as separators. Empty names, absolute paths and any
/// `..` component are rejected.
pub fn is_contained_path(name: &str) -> bool {
    let name = name.replace('\\', "/");
    let path = Path::new(&name);
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Package entries materialized on disk.
///
/// The directory is removed when the value is dropped, on success and on
/// error alike.
pub struct Scratch {
    dir: TempDir,
    entries: Vec<String>,
}

impl Scratch {
    /// Creates an empty scratch directory holding only the `mimetype` entry.
    pub fn new() -> Result<Self> {
        let mut scratch = Self {
            dir: tempfile::tempdir()?,
            entries: Vec::new(),
        };
        scratch.write(MIMETYPE_ENTRY, IDML_MIMETYPE)?;
        Ok(scratch)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Entry names in packaging order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn target(&mut self, name: &str) -> Result<PathBuf> {
        if !is_contained_path(name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("package entry {name:?} escapes the scratch directory"),
            )
            .into());
        }
        let target = self.dir.path().join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if !self.entries.iter().any(|e| e == name) {
            self.entries.push(name.to_string());
        }
        Ok(target)
    }

    /// Writes `contents` as entry `name`.
    pub fn write(&mut self, name: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let target = self.target(name)?;
        fs::write(target, contents)?;
        Ok(())
    }

    /// Copies the file at `source` as entry `name`.
    pub fn copy(&mut self, name: &str, source: &Path) -> Result<()> {
        let target = self.target(name)?;
        fs::copy(source, target)?;
        Ok(())
    }

    /// Zips all entries into `output`.
    pub fn zip_into(&self, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(output)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for name in &self.entries {
            let options = if name == MIMETYPE_ENTRY { stored } else { deflated };
            zip.start_file(name.as_str(), options)?;
            let mut source = File::open(self.dir.path().join(name))?;
            io::copy(&mut source, &mut zip)?;
        }

        zip.finish()?.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_mimetype_first_and_stored() {
        let mut scratch = Scratch::new().unwrap();
        scratch.write("designmap.xml", "<Document/>").unwrap();
        scratch.write("Stories/Story_u1.xml", "<Story/>").unwrap();

        let out = tempfile::tempdir().unwrap();
        let path = out.path().join("nested/doc.idml");
        scratch.zip_into(&path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, IDML_MIMETYPE);
        drop(first);

        assert_eq!(
            archive.by_index(2).unwrap().compression(),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_duplicate_entries_written_once() {
        let mut scratch = Scratch::new().unwrap();
        let src = scratch.path().join("src.bin");
        fs::write(&src, b"abc").unwrap();
        scratch.copy("Links/a.jpg", &src).unwrap();
        scratch.copy("Links/a.jpg", &src).unwrap();
        assert_eq!(scratch.entries(), ["mimetype", "Links/a.jpg"]);
    }

    #[test]
    fn test_contained_paths() {
        assert!(is_contained_path("Links/chan/media/1.jpg"));
        assert!(is_contained_path("./a.png"));
        assert!(!is_contained_path(""));
        assert!(!is_contained_path("../a.png"));
        assert!(!is_contained_path("chan/../../a.png"));
        assert!(!is_contained_path("/etc/passwd"));
        assert!(!is_contained_path("..\\..\\a.png"));
    }

    #[test]
    fn test_entry_outside_scratch_rejected() {
        let mut scratch = Scratch::new().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let src = outside.path().join("photo.png");
        fs::write(&src, b"original").unwrap();

        let err = scratch.write("Links/../../evil.xml", "<x/>").unwrap_err();
        assert!(err.is_io());
        assert!(scratch.copy("/tmp/evil.png", &src).is_err());

        assert_eq!(scratch.entries(), ["mimetype"]);
        assert_eq!(fs::read(&src).unwrap(), b"original");
    }

    #[test]
    fn test_scratch_removed_on_drop() {
        let scratch = Scratch::new().unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        drop(scratch);
        assert!(!path.exists());
    }
}
