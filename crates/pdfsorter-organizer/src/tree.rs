//! Output tree: the only place where the output directory is mutated

use crate::config::{CollisionNaming, PlacementMode};
use crate::error::OrganizerError;
use pdfsorter_domain::taxonomy::is_safe_folder_name;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = ".pdfsorter-";

/// Narrow filesystem interface used by the organizer
pub trait OutputTree: Send + Sync {
    /// Root of the output tree
    fn root(&self) -> &Path;

    /// Create the root directory if needed
    fn ensure_root(&self) -> Result<(), OrganizerError>;

    /// Create `root/<folder>` if needed and return its path (idempotent)
    fn ensure_folder(&self, folder: &str) -> Result<PathBuf, OrganizerError>;

    /// Place `source` into `folder` under `file_name` or a disambiguated
    /// variant, never overwriting an existing file. Returns the destination.
    fn place_file(
        &self,
        source: &Path,
        folder: &Path,
        file_name: &str,
        mode: PlacementMode,
        naming: &CollisionNaming,
    ) -> Result<PathBuf, OrganizerError>;

    /// Replace `root/<name>` atomically with `contents`
    fn write_artifact(&self, name: &str, contents: &[u8]) -> Result<PathBuf, OrganizerError>;
}

/// [`OutputTree`] backed by the local filesystem
#[derive(Debug, Clone)]
pub struct FsOutputTree {
    root: PathBuf,
}

impl FsOutputTree {
    /// Create a tree rooted at `root` (nothing is created yet)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copy `source` to a hidden temporary file inside `folder`
    fn stage_copy(source: &Path, folder: &Path) -> Result<NamedTempFile, OrganizerError> {
        let mut input = File::open(source).map_err(|e| OrganizerError::io(source, e))?;
        let mut temp = Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(folder)
            .map_err(|e| OrganizerError::io(folder, e))?;
        io::copy(&mut input, temp.as_file_mut()).map_err(|e| OrganizerError::io(source, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| OrganizerError::io(temp.path(), e))?;

        if let Ok(metadata) = input.metadata() {
            // Best effort
            let _ = fs::set_permissions(temp.path(), metadata.permissions());
        }
        Ok(temp)
    }

    /// Rename a staged temporary file to the first free candidate name
    fn commit(
        mut temp: NamedTempFile,
        folder: &Path,
        file_name: &str,
        naming: &CollisionNaming,
    ) -> Result<PathBuf, OrganizerError> {
        for n in 0..=naming.max_attempts {
            let destination = folder.join(naming.candidate(file_name, n));
            match temp.persist_noclobber(&destination) {
                Ok(_) => return Ok(destination),
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => temp = e.file,
                Err(e) => return Err(OrganizerError::io(&destination, e.error)),
            }
        }
        Err(OrganizerError::CollisionLimit {
            file_name: file_name.to_string(),
            attempts: naming.max_attempts + 1,
        })
    }

    fn copy_into(
        source: &Path,
        folder: &Path,
        file_name: &str,
        naming: &CollisionNaming,
    ) -> Result<PathBuf, OrganizerError> {
        let temp = Self::stage_copy(source, folder)?;
        Self::commit(temp, folder, file_name, naming)
    }

    /// Link `source` under the first free candidate name, then unlink the
    /// source. `hard_link` fails on an existing target, so nothing is replaced.
    fn move_into(
        source: &Path,
        folder: &Path,
        file_name: &str,
        naming: &CollisionNaming,
    ) -> Result<PathBuf, OrganizerError> {
        if !source.exists() {
            return Err(OrganizerError::io(
                source,
                io::Error::new(ErrorKind::NotFound, "source file not found"),
            ));
        }

        for n in 0..=naming.max_attempts {
            let destination = folder.join(naming.candidate(file_name, n));
            match fs::hard_link(source, &destination) {
                Ok(()) => {
                    Self::remove_source(source, &destination)?;
                    return Ok(destination);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    // Typically a cross-device move: copy, then remove the source
                    debug!("hard link {:?} failed ({}), falling back to copy", source, e);
                    let placed = Self::copy_into(source, folder, file_name, naming)?;
                    Self::remove_source(source, &placed)?;
                    return Ok(placed);
                }
            }
        }
        Err(OrganizerError::CollisionLimit {
            file_name: file_name.to_string(),
            attempts: naming.max_attempts + 1,
        })
    }

    /// Remove the source of a move, undoing the placement if that fails
    fn remove_source(source: &Path, placed: &Path) -> Result<(), OrganizerError> {
        if let Err(e) = fs::remove_file(source) {
            warn!("Could not remove {:?} after placing it, rolling back", source);
            if let Err(rollback) = fs::remove_file(placed) {
                warn!("Rollback of {:?} failed: {}", placed, rollback);
            }
            return Err(OrganizerError::io(source, e));
        }
        Ok(())
    }
}

impl OutputTree for FsOutputTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), OrganizerError> {
        fs::create_dir_all(&self.root).map_err(|e| OrganizerError::io(&self.root, e))
    }

    fn ensure_folder(&self, folder: &str) -> Result<PathBuf, OrganizerError> {
        if !is_safe_folder_name(folder) {
            return Err(OrganizerError::InvalidFolder(folder.to_string()));
        }
        let path = self.root.join(folder);
        fs::create_dir_all(&path).map_err(|e| OrganizerError::io(&path, e))?;
        Ok(path)
    }

    fn place_file(
        &self,
        source: &Path,
        folder: &Path,
        file_name: &str,
        mode: PlacementMode,
        naming: &CollisionNaming,
    ) -> Result<PathBuf, OrganizerError> {
        match mode {
            PlacementMode::Copy => Self::copy_into(source, folder, file_name, naming),
            PlacementMode::Move => Self::move_into(source, folder, file_name, naming),
        }
    }

    fn write_artifact(&self, name: &str, contents: &[u8]) -> Result<PathBuf, OrganizerError> {
        let destination = self.root.join(name);
        let mut temp = Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|e| OrganizerError::io(&self.root, e))?;
        temp.write_all(contents)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| OrganizerError::io(&destination, e))?;
        temp.persist(&destination)
            .map_err(|e| OrganizerError::io(&destination, e.error))?;
        Ok(destination)
    }
}
