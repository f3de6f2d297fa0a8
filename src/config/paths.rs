//! Path resolution for studyctl configuration and data files.
//!
//! All studyctl data is stored in `~/.studyctl/`:
//! - `config.yaml` - Main configuration file
//! - `exports/` - Default location for exported preferences

use std::path::PathBuf;

use crate::error::StudyError;

/// Paths to studyctl configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.studyctl/`
    pub root: PathBuf,
    /// Config file: `~/.studyctl/config.yaml`
    pub config_file: PathBuf,
    /// Exports directory: `~/.studyctl/exports/`
    pub exports: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StudyError> {
        let home = std::env::var("HOME")
            .map_err(|_| StudyError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".studyctl")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            exports: root.join("exports"),
            root,
        }
    }

    /// Default file for `prefs export` when no path is given.
    #[must_use]
    pub fn preferences_export(&self) -> PathBuf {
        self.exports.join("preferences.json")
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), StudyError> {
        for dir in [&self.root, &self.exports] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    StudyError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_root(PathBuf::from(".studyctl")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-studyctl");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.exports, root.join("exports"));
        assert_eq!(
            paths.preferences_export(),
            root.join("exports").join("preferences.json")
        );
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
        assert!(paths.exports.exists());
    }
}
