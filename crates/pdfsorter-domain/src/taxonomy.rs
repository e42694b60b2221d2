//! Taxonomy module - the folder names resolved for one run

use crate::error::DomainError;
use std::collections::HashSet;
use std::path::PathBuf;

/// One resolved folder and the raw topics it absorbed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyFolder {
    /// Filesystem-safe folder name
    pub name: String,

    /// Raw topic strings merged into this folder, first-seen order, no duplicates
    pub raw_topics: Vec<String>,
}

/// Deduplicated folder set for one run
///
/// Built once by the resolver and read-only afterwards: there are no mutating
/// methods. Construction validates that every name is filesystem-safe and
/// unique case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    folders: Vec<TaxonomyFolder>,
}

impl Taxonomy {
    /// Build a taxonomy from resolved folders, keeping their order
    ///
    /// # Errors
    ///
    /// Returns an error if a name is unsafe or two names collide ignoring case.
    pub fn from_folders(folders: Vec<TaxonomyFolder>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for folder in &folders {
            if !is_safe_folder_name(&folder.name) {
                return Err(DomainError::InvalidFolderName(folder.name.clone()));
            }
            if !seen.insert(folder.name.to_lowercase()) {
                return Err(DomainError::DuplicateFolder(folder.name.clone()));
            }
        }
        Ok(Self { folders })
    }

    /// Folders in first-seen order
    pub fn folders(&self) -> &[TaxonomyFolder] {
        &self.folders
    }

    /// Folder names in first-seen order
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(|f| f.name.as_str())
    }

    /// Look up a folder by exact name
    pub fn get(&self, name: &str) -> Option<&TaxonomyFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Whether a folder with this name exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.folders.iter().any(|f| f.name.to_lowercase() == wanted)
    }

    /// Number of folders
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether the taxonomy has no folders
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Check that a folder name can be used as a single path component
///
/// Rejects empty names, `.`/`..`, path separators and control characters.
pub fn is_safe_folder_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}

/// Pairs one document with exactly one taxonomy folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Source path of the document
    pub source_path: PathBuf,

    /// Folder name from the run's taxonomy
    pub folder: String,
}
