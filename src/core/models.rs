use std::fmt;
use std::path::{Path, PathBuf};

/*
 * Describes one search as submitted by the user: a query matched against file
 * names, the directory to search under, and an optional extension filter.
 * A request is immutable once built; the extension filter is normalized at
 * construction so that "txt", ".txt" and " .TXT " all behave the same.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    root_directory: PathBuf,
    extension_filter: Option<String>,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        root_directory: impl Into<PathBuf>,
        extension_filter: Option<&str>,
    ) -> Self {
        SearchRequest {
            query: query.into(),
            root_directory: root_directory.into(),
            extension_filter: extension_filter.and_then(normalize_extension_filter),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn extension_filter(&self) -> Option<&str> {
        self.extension_filter.as_deref()
    }

    // Whitespace-only queries are treated as empty.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/*
 * Normalizes a user-entered extension filter. Surrounding whitespace is removed,
 * an empty filter means "no filter", and a missing leading '.' is added.
 */
pub fn normalize_extension_filter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(trimmed.to_string())
    } else {
        Some(format!(".{trimmed}"))
    }
}

// A single matching file. Paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub path: PathBuf,
}

impl SearchResult {
    pub fn new(path: PathBuf) -> Self {
        SearchResult { path }
    }
}

// Results in walk order; never sorted globally.
pub type ResultSet = Vec<SearchResult>;

/*
 * The lifecycle state of the controller's current session. `CancelRequested`
 * is only observable between the cancellation signal being raised and the
 * worker being joined.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    CancelRequested,
    Completed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionState::Idle => "Idle",
            SessionState::Running => "Running",
            SessionState::CancelRequested => "Cancelling",
            SessionState::Completed => "Completed",
            SessionState::Failed => "Failed",
        };
        f.write_str(text)
    }
}

/*
 * Identifies one session. Ids are handed out by the controller in strictly
 * increasing order and tag every message a worker sends, so output from a
 * retired session can be recognized and dropped.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
