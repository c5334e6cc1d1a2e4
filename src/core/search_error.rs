/*
 * Defines the errors that can end or prevent a search session. Only whole-session
 * failures are represented here; problems with individual entries are handled
 * inside the search backends and never reach the controller.
 */
use super::file_system::FileSystemError;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SearchError {
    /* The query was blank. Raised before any session starts. */
    EmptyQuery,
    /* The root directory could not be opened. */
    DirectoryAccess { path: PathBuf, source: io::Error },
    /* The worker observed the cancellation signal and stopped. */
    Cancelled,
    /* The operating system refused to start the worker thread. */
    WorkerSpawn(io::Error),
    /* An external engine failed for a reason of its own. */
    Engine(String),
    /* The worker thread panicked before it could report an outcome. */
    WorkerPanicked,
}

impl From<FileSystemError> for SearchError {
    fn from(err: FileSystemError) -> Self {
        match err {
            FileSystemError::DirectoryAccess { path, source } => {
                SearchError::DirectoryAccess { path, source }
            }
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyQuery => write!(f, "Please enter a search query"),
            SearchError::DirectoryAccess { path, source } => {
                write!(f, "Error accessing directory {}: {source}", path.display())
            }
            SearchError::Cancelled => write!(f, "Search cancelled"),
            SearchError::WorkerSpawn(e) => write!(f, "Could not start search worker: {e}"),
            SearchError::Engine(message) => write!(f, "Search engine error: {message}"),
            SearchError::WorkerPanicked => write!(f, "The search stopped unexpectedly"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::DirectoryAccess { source, .. } => Some(source),
            SearchError::WorkerSpawn(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
