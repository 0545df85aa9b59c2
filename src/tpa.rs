//! Trusted platform assembly (TPA) list construction.
//!
//! A directory is scanned once per extension, most preferred first, so that a
//! native image (`Foo.ni.dll`) shadows its IL counterpart (`Foo.dll`). Each
//! base name is accepted at most once across every directory added to a list.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::path::AbsolutePath;

/// Extension priority used for the runtime's own directory.
pub const TPA_EXTENSIONS: &[&str] = &[".ni.dll", ".dll", ".ni.exe", ".exe"];

pub const PATH_LIST_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyCandidate {
    pub base_name: String,
    pub path: String,
    pub extension: String,
}

impl AssemblyCandidate {
    /// Builds a candidate for a known file. The extension is the first entry
    /// of `TPA_EXTENSIONS` the name ends with, or empty.
    fn from_path(path: &AbsolutePath) -> AssemblyCandidate {
        let file_name = path
            .as_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_else(|| path.as_str());
        let (base_name, extension) = match matching_extension(file_name, TPA_EXTENSIONS) {
            Some(ext) => (&file_name[..file_name.len() - ext.len()], ext),
            None => (file_name, ""),
        };

        AssemblyCandidate {
            base_name: base_name.to_string(),
            path: path.as_str().to_string(),
            extension: extension.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TrustedAssemblyList {
    entries: Vec<AssemblyCandidate>,
    seen: HashSet<String>,
}

impl TrustedAssemblyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AssemblyCandidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_base_name(&self, base_name: &str) -> bool {
        self.seen.contains(base_name)
    }

    /// Scans `directory` and adds every regular file matching one of
    /// `extension_priority`. A missing or unreadable directory adds nothing.
    pub fn add_directory<P: AsRef<Path>>(&mut self, directory: P, extension_priority: &[&str]) {
        let directory = directory.as_ref();
        let files = match regular_file_names(directory) {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %directory.display(), "TPA directory does not exist");
                return;
            }
            Err(e) => {
                warn!(dir = %directory.display(), error = %e, "cannot read TPA directory");
                return;
            }
        };

        let before = self.entries.len();
        for ext in extension_priority {
            for name in &files {
                // A file belongs to the first extension it matches, so that
                // `Foo.ni.dll` is not picked up again as `Foo.ni` + `.dll`.
                if matching_extension(name, extension_priority) != Some(*ext) {
                    continue;
                }

                let base_name = &name[..name.len() - ext.len()];
                if self.seen.contains(base_name) {
                    continue;
                }

                self.seen.insert(base_name.to_string());
                self.entries.push(AssemblyCandidate {
                    base_name: base_name.to_string(),
                    path: directory.join(name).display().to_string(),
                    extension: ext.to_string(),
                });
            }
        }

        debug!(
            dir = %directory.display(),
            added = self.entries.len() - before,
            "scanned TPA directory"
        );
    }

    /// Appends an explicitly known assembly that is not found by scanning.
    /// An assembly whose base name is already listed is skipped.
    pub fn append_path(&mut self, path: &AbsolutePath) {
        let candidate = AssemblyCandidate::from_path(path);
        if !self.seen.insert(candidate.base_name.clone()) {
            debug!(path = %path, "assembly already in TPA list, not appending");
            return;
        }
        self.entries.push(candidate);
    }

    /// The list as a single separator-joined property value.
    pub fn to_property_value(&self) -> String {
        let sep = PATH_LIST_SEPARATOR.to_string();
        self.entries
            .iter()
            .map(|c| c.path.as_str())
            .collect::<Vec<_>>()
            .join(&sep)
    }
}

pub fn build_trusted_list<P: AsRef<Path>>(
    directory: P,
    extension_priority: &[&str],
) -> TrustedAssemblyList {
    let mut list = TrustedAssemblyList::new();
    list.add_directory(directory, extension_priority);
    list
}

pub fn append_path(list: &mut TrustedAssemblyList, path: &AbsolutePath) {
    list.append_path(path);
}

/// First extension of `extensions` that `name` ends with, leaving a non-empty
/// base name.
fn matching_extension<'a>(name: &str, extensions: &[&'a str]) -> Option<&'a str> {
    extensions
        .iter()
        .copied()
        .find(|ext| name.len() > ext.len() && name.ends_with(ext))
}

/// Names of the regular files in `directory`, in enumeration order. Symlinks
/// are followed; entries whose type cannot be determined are stat'ed.
fn regular_file_names(directory: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %directory.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let is_file = match entry.file_type() {
            Ok(ft) if ft.is_file() => true,
            Ok(ft) if ft.is_dir() => false,
            _ => fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false),
        };
        if !is_file {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => {
                debug!(?name, "skipping non UTF-8 file name");
            }
        }
    }

    Ok(names)
}
