/*
 * The unit of work that runs on a session's worker thread. A backend turns a
 * `SearchRequest` into a `ResultSet`, polling a cancellation check and
 * reporting fractional progress as it goes. It defines the
 * `SearchBackendOperations` trait and the built-in `CoreSearchBackend`, which
 * materializes every candidate from a `FileEnumeratorOperations` first (so the
 * total is known) and then applies the matcher to each candidate in walk order.
 */
use super::file_system::FileEnumeratorOperations;
use super::matcher::FileNameMatcher;
use super::models::{ResultSet, SearchRequest, SearchResult};
use super::search_error::{Result, SearchError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/*
 * Contract for anything that can execute a search on a worker thread.
 *
 * `cancel_check` is polled before every traversal step and before every
 * candidate; once it returns true the backend must stop and return
 * `SearchError::Cancelled`. `on_progress` receives non-decreasing fractions in
 * `[0.0, 1.0]` and must see exactly `1.0` on normal completion. A root that
 * cannot be opened yields `SearchError::DirectoryAccess`; failures of single
 * entries count as "no match" and never abort the run.
 */
pub trait SearchBackendOperations: Send + Sync {
    fn run(
        &self,
        request: &SearchRequest,
        cancel_check: &(dyn Fn() -> bool + Sync),
        on_progress: &mut (dyn FnMut(f64) + Send),
    ) -> Result<ResultSet>;
}

pub struct CoreSearchBackend {
    enumerator: Arc<dyn FileEnumeratorOperations>,
}

impl CoreSearchBackend {
    pub fn new(enumerator: Arc<dyn FileEnumeratorOperations>) -> Self {
        CoreSearchBackend { enumerator }
    }
}

impl SearchBackendOperations for CoreSearchBackend {
    fn run(
        &self,
        request: &SearchRequest,
        cancel_check: &(dyn Fn() -> bool + Sync),
        on_progress: &mut (dyn FnMut(f64) + Send),
    ) -> Result<ResultSet> {
        let matcher = FileNameMatcher::for_request(request);
        let mut walk = self.enumerator.walk(request.root_directory())?;

        let mut candidates: Vec<PathBuf> = Vec::new();
        loop {
            if cancel_check() {
                log::debug!(
                    "CoreSearchBackend: Cancelled while enumerating after {} candidates.",
                    candidates.len()
                );
                return Err(SearchError::Cancelled);
            }
            match walk.next() {
                Some(path) => candidates.push(path),
                None => break,
            }
        }

        let total = candidates.len();
        log::debug!(
            "CoreSearchBackend: {total} candidates under {:?}.",
            request.root_directory()
        );
        if total == 0 {
            on_progress(1.0);
            return Ok(ResultSet::new());
        }

        let mut results = ResultSet::new();
        for (index, path) in candidates.into_iter().enumerate() {
            if cancel_check() {
                log::debug!("CoreSearchBackend: Cancelled after {index} of {total} candidates.");
                return Err(SearchError::Cancelled);
            }
            if evaluate_candidate(&matcher, &path) {
                log::trace!("CoreSearchBackend: Match {path:?}");
                results.push(SearchResult::new(path));
            }
            on_progress((index + 1) as f64 / total as f64);
        }

        log::debug!("CoreSearchBackend: {} matches.", results.len());
        Ok(results)
    }
}

/*
 * Applies the matcher to one candidate and confirms the file still exists as a
 * regular file. Any failure to stat the entry (it vanished, permissions
 * changed) is treated as "no match".
 */
pub(crate) fn evaluate_candidate(matcher: &FileNameMatcher, path: &Path) -> bool {
    if !matcher.is_path_match(path) {
        return false;
    }
    match fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(err) => {
            log::trace!("SearchBackend: Dropping candidate {path:?}: {err}");
            false
        }
    }
}
