/*!
 * Directory enumeration
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Result;
use crate::types::FileEntry;

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Enumerate every file to bundle, in document order
    ///
    /// Entries named like an ignored directory are pruned, along with the
    /// output file and, unless `include_self` is set, the running executable.
    pub fn scan(&self) -> Result<Vec<FileEntry>> {
        let root = fs::canonicalize(&self.config.target_dir)?;
        let output = resolve_output(&self.config.output_file);
        let own_exe = if self.config.include_self {
            None
        } else {
            env::current_exe().and_then(fs::canonicalize).ok()
        };

        log::info!("Walking directory: {}", root.display());

        let mut entries = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_ignore(e));

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !is_file(&entry) {
                continue;
            }

            let resolved =
                fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if output.as_deref() == Some(resolved.as_path()) {
                log::debug!("Skipping output file {}", resolved.display());
                continue;
            }
            if own_exe.as_deref() == Some(resolved.as_path()) {
                log::debug!("Skipping own executable {}", resolved.display());
                continue;
            }

            entries.push(FileEntry::new(entry.into_path(), &root));
        }

        entries.sort_by_key(FileEntry::sort_key);
        log::debug!("Found {} files under {}", entries.len(), root.display());
        Ok(entries)
    }

    /// Check if an entry's name is in the ignored directory set
    pub fn should_ignore(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.config.rules.ignored_dirs.contains(name.as_ref())
    }
}

/// Regular files, plus symlinks that point at one
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Absolute form of the output path, resolving its parent when it exists
fn resolve_output(output: &Path) -> Option<PathBuf> {
    let absolute = if output.is_absolute() {
        output.to_path_buf()
    } else {
        env::current_dir().ok()?.join(output)
    };
    if let Ok(resolved) = fs::canonicalize(&absolute) {
        return Some(resolved);
    }
    let parent = absolute.parent()?;
    let name = absolute.file_name()?;
    Some(
        fs::canonicalize(parent)
            .unwrap_or_else(|_| parent.to_path_buf())
            .join(name),
    )
}
