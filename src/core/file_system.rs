use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * This module enumerates candidate files for a search. It defines the errors
 * specific to opening a search root, a trait `FileEnumeratorOperations` that
 * abstracts the traversal, and the concrete `CoreFileEnumerator`.
 *
 * A walk is lazy: directories are read as the sequence is consumed, so a
 * caller can stop between any two steps. Entries that cannot be read while
 * walking are skipped and logged; only a root that cannot be opened fails the
 * walk as a whole.
 */

/*
 * Errors raised when a walk cannot begin. Per-entry problems found during the
 * walk never surface here; they are absorbed by the iterator.
 */
#[derive(Debug)]
pub enum FileSystemError {
    DirectoryAccess { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemError::DirectoryAccess { path, source } => {
                write!(f, "Error accessing directory {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileSystemError::DirectoryAccess { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/*
 * Tunes which entries a walk visits. By default the whole tree is visited,
 * hidden entries (names starting with '.') included, and ignore files are not
 * consulted. Both filters are opt-in.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /* Honor .gitignore / .ignore files found in the tree. */
    pub respect_ignore_files: bool,
    /* Visit dot-files and descend into dot-directories. */
    pub include_hidden: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            respect_ignore_files: false,
            include_hidden: true,
        }
    }
}

/*
 * A lazy, single-use sequence of absolute paths to regular files. Each call to
 * `FileEnumeratorOperations::walk` produces a fresh traversal.
 */
pub struct FileWalk {
    inner: Box<dyn Iterator<Item = PathBuf>>,
}

impl FileWalk {
    pub(crate) fn new(inner: impl Iterator<Item = PathBuf> + 'static) -> Self {
        FileWalk {
            inner: Box::new(inner),
        }
    }
}

impl Iterator for FileWalk {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.inner.next()
    }
}

/*
 * Defines the traversal used to produce search candidates.
 * Implementations must yield only regular files, skip entries they cannot
 * read, and fail up front with `FileSystemError::DirectoryAccess` when the root
 * itself cannot be opened.
 */
pub trait FileEnumeratorOperations: Send + Sync {
    fn walk(&self, root_path: &Path) -> Result<FileWalk>;
}

pub struct CoreFileEnumerator {
    options: WalkOptions,
}

impl CoreFileEnumerator {
    pub fn new(options: WalkOptions) -> Self {
        CoreFileEnumerator { options }
    }
}

impl Default for CoreFileEnumerator {
    fn default() -> Self {
        Self::new(WalkOptions::default())
    }
}

impl FileEnumeratorOperations for CoreFileEnumerator {
    fn walk(&self, root_path: &Path) -> Result<FileWalk> {
        let root = std::path::absolute(root_path).map_err(|source| {
            FileSystemError::DirectoryAccess {
                path: root_path.to_path_buf(),
                source,
            }
        })?;

        // Opening the root explicitly distinguishes "cannot search here" from an empty tree.
        if let Err(source) = fs::read_dir(&root) {
            log::debug!("FileEnumerator: Cannot open root {root:?}: {source}");
            return Err(FileSystemError::DirectoryAccess { path: root, source });
        }

        log::debug!(
            "FileEnumerator: Walking {root:?} (ignore files: {}, hidden: {}).",
            self.options.respect_ignore_files,
            self.options.include_hidden
        );

        if self.options.respect_ignore_files {
            Ok(walk_with_ignore_rules(root, self.options.include_hidden))
        } else {
            Ok(walk_plain(root, self.options.include_hidden))
        }
    }
}

fn walk_plain(root: PathBuf, include_hidden: bool) -> FileWalk {
    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| {
            include_hidden || entry.depth() == 0 || !is_hidden_name(entry.file_name())
        })
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => regular_file_path(entry.path(), entry.file_type()),
            Err(err) => {
                log::debug!("FileEnumerator: Skipping unreadable entry: {err}");
                None
            }
        });
    FileWalk::new(entries)
}

fn walk_with_ignore_rules(root: PathBuf, include_hidden: bool) -> FileWalk {
    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(true)
        .hidden(!include_hidden)
        .parents(true)
        .git_global(false) // Keep results independent of the user's global git config.
        .require_git(false) // Apply .gitignore even outside a repository.
        .follow_links(false);

    let entries = builder
        .build()
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => entry
                .file_type()
                .and_then(|file_type| regular_file_path(entry.path(), file_type)),
            Err(err) => {
                log::debug!("FileEnumerator: Skipping unreadable entry: {err}");
                None
            }
        });
    FileWalk::new(entries)
}

/*
 * Returns the path if it denotes a regular file. A symlink qualifies only when
 * its target is a regular file; dangling links and links to directories or
 * special files are dropped.
 */
fn regular_file_path(path: &Path, file_type: fs::FileType) -> Option<PathBuf> {
    if file_type.is_file() {
        return Some(path.to_path_buf());
    }
    if file_type.is_symlink() {
        return match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Some(path.to_path_buf()),
            Ok(_) => None,
            Err(err) => {
                log::trace!("FileEnumerator: Skipping dangling link {path:?}: {err}");
                None
            }
        };
    }
    None
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
