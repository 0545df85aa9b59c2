//! Canonical absolute paths for everything handed to the runtime.

use std::fmt;
use std::path::Path;

use crate::error::{HostError, HostResult};

/// A canonical, symlink-free, UTF-8 path without a trailing separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsolutePath(String);

impl AbsolutePath {
    #[cfg(test)]
    pub(crate) fn from_canonical<S: Into<String>>(path: S) -> AbsolutePath {
        AbsolutePath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Appends a single file name; the result is not re-canonicalized.
    pub fn join(&self, name: &str) -> AbsolutePath {
        if self.0.ends_with('/') {
            AbsolutePath(format!("{}{}", self.0, name))
        } else {
            AbsolutePath(format!("{}/{}", self.0, name))
        }
    }
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

pub fn resolve_absolute<P: AsRef<Path>>(path: P) -> HostResult<AbsolutePath> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let canonical = std::fs::canonicalize(path).map_err(|e| HostError::PathResolution {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let canonical = canonical
        .into_os_string()
        .into_string()
        .map_err(|_| HostError::PathResolution {
            path: display.clone(),
            reason: "canonical path is not valid UTF-8".to_string(),
        })?;

    if canonical.is_empty() {
        return Err(HostError::PathResolution {
            path: display,
            reason: "canonical path is empty".to_string(),
        });
    }

    Ok(AbsolutePath(canonical))
}

/// Parent directory of an already-absolute path.
pub fn containing_directory(path: &AbsolutePath) -> HostResult<AbsolutePath> {
    match path.0.rfind('/') {
        Some(0) => Ok(AbsolutePath("/".to_string())),
        Some(idx) => Ok(AbsolutePath(path.0[..idx].to_string())),
        None => Err(HostError::PathResolution {
            path: path.0.clone(),
            reason: "path has no directory component".to_string(),
        }),
    }
}

/// Reads `variable` and canonicalizes its value. An unset or empty variable
/// fails before touching the filesystem.
pub fn resolve_from_environment(variable: &str) -> HostResult<AbsolutePath> {
    let value = match std::env::var_os(variable) {
        None => {
            return Err(HostError::Configuration {
                variable: variable.to_string(),
                reason: "is not set",
            })
        }
        Some(v) if v.is_empty() => {
            return Err(HostError::Configuration {
                variable: variable.to_string(),
                reason: "is empty",
            })
        }
        Some(v) => v,
    };

    resolve_absolute(value)
}
