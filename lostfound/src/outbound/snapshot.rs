//! Profile snapshot persisted as a JSON file.
//!
//! The snapshot lives in a single directory opened once through `cap_std`,
//! so every later read and write is confined to it. Saves are staged under a
//! temporary name and renamed into place.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::Profile;
use crate::domain::ports::{ProfileSnapshotError, ProfileSnapshotStore};

/// File name of the stored snapshot inside the snapshot directory.
pub const SNAPSHOT_FILENAME: &str = "profile.json";

fn io_error(path: &Path, error: io::Error) -> ProfileSnapshotError {
    ProfileSnapshotError::io(format!("{}: {error}", path.display()))
}

/// [`ProfileSnapshotStore`] writing `profile.json` under one directory.
#[derive(Debug)]
pub struct FileProfileSnapshotStore {
    dir: Dir,
    root: PathBuf,
}

impl FileProfileSnapshotStore {
    /// Open `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ProfileSnapshotError> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .map_err(|error| io_error(&root, error))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .map_err(|error| io_error(&root, error))?;
        Ok(Self { dir, root })
    }

    /// Full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILENAME)
    }
}

impl ProfileSnapshotStore for FileProfileSnapshotStore {
    fn load(&self) -> Result<Option<Profile>, ProfileSnapshotError> {
        let raw = match self.dir.read_to_string(SNAPSHOT_FILENAME) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&self.path(), error)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|error| ProfileSnapshotError::corrupt(error.to_string()))
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileSnapshotError> {
        let encoded = serde_json::to_vec_pretty(profile)
            .map_err(|error| ProfileSnapshotError::corrupt(error.to_string()))?;
        let staged = format!(".{SNAPSHOT_FILENAME}.tmp-{}", Uuid::new_v4().simple());
        self.dir
            .write(&staged, encoded)
            .map_err(|error| io_error(&self.root.join(&staged), error))?;
        if let Err(error) = self.dir.rename(&staged, &self.dir, SNAPSHOT_FILENAME) {
            let _cleanup_result = self.dir.remove_file(&staged);
            return Err(io_error(&self.path(), error));
        }
        debug!(path = %self.path().display(), "profile snapshot saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ProfileSnapshotError> {
        match self.dir.remove_file(SNAPSHOT_FILENAME) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.path(), error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn tempdir() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn ada() -> Profile {
        Profile {
            name: "Ada Lovelace".to_owned(),
            email: "ada@campus.edu".to_owned(),
            student_id: "S-1815".to_owned(),
            year: "2".to_owned(),
            ..Profile::default()
        }
    }

    #[rstest]
    fn load_without_snapshot_returns_none(tempdir: TempDir) {
        let store = FileProfileSnapshotStore::open(tempdir.path()).expect("open");
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn save_then_load_returns_profile(tempdir: TempDir) {
        let store = FileProfileSnapshotStore::open(tempdir.path().join("nested")).expect("open");
        store.save(&ada()).expect("save");
        assert!(store.path().exists());
        assert_eq!(store.load().expect("load"), Some(ada()));
    }

    #[rstest]
    fn save_overwrites_previous_snapshot(tempdir: TempDir) {
        let store = FileProfileSnapshotStore::open(tempdir.path()).expect("open");
        store.save(&ada()).expect("save");
        let renamed = Profile {
            name: "Ada King".to_owned(),
            ..ada()
        };
        store.save(&renamed).expect("save");
        assert_eq!(store.load().expect("load"), Some(renamed));
    }

    #[rstest]
    fn clear_is_idempotent(tempdir: TempDir) {
        let store = FileProfileSnapshotStore::open(tempdir.path()).expect("open");
        store.save(&ada()).expect("save");
        store.clear().expect("clear");
        store.clear().expect("clear twice");
        assert_eq!(store.load().expect("load"), None);
    }

    #[rstest]
    fn corrupt_snapshot_is_reported(tempdir: TempDir) {
        std::fs::write(tempdir.path().join(SNAPSHOT_FILENAME), "{not json").expect("write");
        let store = FileProfileSnapshotStore::open(tempdir.path()).expect("open");
        let err = store.load().expect_err("corrupt");
        assert!(matches!(err, ProfileSnapshotError::Corrupt { .. }));
    }
}
