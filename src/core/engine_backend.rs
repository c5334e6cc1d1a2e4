/*
 * Support for delegating a whole search to an external engine instead of the
 * built-in enumerate-then-match loop.
 *
 * An `ExternalSearchEngine` receives a single query string and reports progress
 * through a callback; the callback's return value is the only way to ask the
 * engine to stop. Engines that have no structured extension filter receive it
 * folded into the query as a trailing `extension:<ext>` token (see
 * `encode_engine_query`). `EngineSearchBackend` adapts any such engine to
 * `SearchBackendOperations`, and `ParallelSearchEngine` is a concrete engine
 * that matches candidates on several scoped threads.
 */
use super::file_system::{FileEnumeratorOperations, FileSystemError};
use super::matcher::FileNameMatcher;
use super::models::{ResultSet, SearchRequest, SearchResult, normalize_extension_filter};
use super::search_backend::{SearchBackendOperations, evaluate_candidate};
use super::search_error::{self, SearchError};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

const EXTENSION_TOKEN: &str = " extension:";

// Number of enumerated entries between two progress estimates while counting.
const ENUMERATION_REPORT_INTERVAL: usize = 256;

#[derive(Debug)]
pub enum EngineError {
    DirectoryAccess { path: PathBuf, source: io::Error },
    /* The progress callback asked the engine to stop. */
    Interrupted,
    Spawn(io::Error),
}

impl From<FileSystemError> for EngineError {
    fn from(err: FileSystemError) -> Self {
        match err {
            FileSystemError::DirectoryAccess { path, source } => {
                EngineError::DirectoryAccess { path, source }
            }
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::DirectoryAccess { path, source } => {
                write!(f, "Could not access directory {}: {source}", path.display())
            }
            EngineError::Interrupted => write!(f, "Search interrupted"),
            EngineError::Spawn(e) => write!(f, "Could not start matcher thread: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::DirectoryAccess { source, .. } => Some(source),
            EngineError::Spawn(e) => Some(e),
            EngineError::Interrupted => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/*
 * Boundary to a search engine that owns enumeration and matching. `progress`
 * receives fractions in `[0.0, 1.0]`; when it returns `false` the engine must
 * stop and return `EngineError::Interrupted`. Returned paths are absolute and
 * in the engine's traversal order.
 */
pub trait ExternalSearchEngine: Send + Sync {
    fn search(
        &self,
        query: &str,
        directory: &Path,
        progress: &(dyn Fn(f64) -> bool + Sync),
    ) -> Result<Vec<PathBuf>>;
}

pub fn encode_engine_query(query: &str, extension_filter: Option<&str>) -> String {
    match extension_filter.and_then(normalize_extension_filter) {
        Some(ext) => format!("{query}{EXTENSION_TOKEN}{ext}"),
        None => query.to_string(),
    }
}

/* Splits an encoded query back into the query text and normalized filter. */
pub fn decode_engine_query(encoded: &str) -> (String, Option<String>) {
    match encoded.split_once(EXTENSION_TOKEN) {
        Some((query, ext)) => (query.to_string(), normalize_extension_filter(ext)),
        None => (encoded.to_string(), None),
    }
}

/*
 * Runs a `SearchRequest` through an `ExternalSearchEngine`. Engine progress is
 * clamped and filtered so the session never sees a regression; `1.0` is held
 * back and reported once, after the engine has returned successfully.
 */
pub struct EngineSearchBackend {
    engine: Arc<dyn ExternalSearchEngine>,
}

impl EngineSearchBackend {
    pub fn new(engine: Arc<dyn ExternalSearchEngine>) -> Self {
        EngineSearchBackend { engine }
    }
}

struct ForwardedProgress<'a> {
    sink: &'a mut (dyn FnMut(f64) + Send),
    last: f64,
}

impl SearchBackendOperations for EngineSearchBackend {
    fn run(
        &self,
        request: &SearchRequest,
        cancel_check: &(dyn Fn() -> bool + Sync),
        on_progress: &mut (dyn FnMut(f64) + Send),
    ) -> search_error::Result<ResultSet> {
        let encoded = encode_engine_query(request.query(), request.extension_filter());
        log::debug!(
            "EngineSearchBackend: Delegating '{encoded}' under {:?}.",
            request.root_directory()
        );

        let forwarded = Mutex::new(ForwardedProgress {
            sink: on_progress,
            last: 0.0,
        });
        let progress = |fraction: f64| -> bool {
            if cancel_check() {
                return false;
            }
            let fraction = fraction.clamp(0.0, 1.0);
            let mut state = forwarded.lock().unwrap_or_else(PoisonError::into_inner);
            if fraction > state.last && fraction < 1.0 {
                state.last = fraction;
                (state.sink)(fraction);
            }
            true
        };

        let outcome = self
            .engine
            .search(&encoded, request.root_directory(), &progress);

        let paths = match outcome {
            Ok(paths) => paths,
            Err(EngineError::Interrupted) => return Err(SearchError::Cancelled),
            Err(EngineError::DirectoryAccess { path, source }) => {
                return Err(SearchError::DirectoryAccess { path, source });
            }
            Err(other) => return Err(SearchError::Engine(other.to_string())),
        };
        if cancel_check() {
            return Err(SearchError::Cancelled);
        }

        let state = forwarded.into_inner().unwrap_or_else(PoisonError::into_inner);
        (state.sink)(1.0);
        log::debug!("EngineSearchBackend: Engine returned {} paths.", paths.len());
        Ok(paths.into_iter().map(SearchResult::new).collect())
    }
}

/*
 * Enumerates every candidate first, reporting progress in `[0.0, 0.5)`, then
 * splits the candidates into contiguous chunks matched on scoped threads.
 * Matching progress runs from `0.5` to `1.0`. Chunk results are concatenated in
 * chunk order so the output keeps traversal order.
 */
pub struct ParallelSearchEngine {
    enumerator: Arc<dyn FileEnumeratorOperations>,
    worker_count: usize,
}

impl ParallelSearchEngine {
    // One thread is left for the session worker itself.
    pub fn new(enumerator: Arc<dyn FileEnumeratorOperations>) -> Self {
        let available = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_worker_count(enumerator, available.saturating_sub(1))
    }

    pub fn with_worker_count(
        enumerator: Arc<dyn FileEnumeratorOperations>,
        worker_count: usize,
    ) -> Self {
        ParallelSearchEngine {
            enumerator,
            worker_count: worker_count.max(1),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl ExternalSearchEngine for ParallelSearchEngine {
    fn search(
        &self,
        query: &str,
        directory: &Path,
        progress: &(dyn Fn(f64) -> bool + Sync),
    ) -> Result<Vec<PathBuf>> {
        let (needle, extension) = decode_engine_query(query);
        let matcher = FileNameMatcher::new(&needle, extension.as_deref());

        let mut candidates = Vec::new();
        let mut walk = self.enumerator.walk(directory)?;
        let mut fraction = 0.0;
        loop {
            // Asked before every pull; the estimate itself only moves every interval.
            if !progress(fraction) {
                return Err(EngineError::Interrupted);
            }
            let Some(path) = walk.next() else {
                break;
            };
            candidates.push(path);
            let counted = candidates.len();
            if counted % ENUMERATION_REPORT_INTERVAL == 0 {
                fraction = 0.5 * counted as f64 / (counted + ENUMERATION_REPORT_INTERVAL) as f64;
            }
        }

        let total = candidates.len();
        if total == 0 {
            progress(1.0);
            return Ok(Vec::new());
        }
        if !progress(0.5) {
            return Err(EngineError::Interrupted);
        }

        let chunk_size = total.div_ceil(self.worker_count);
        log::debug!(
            "ParallelSearchEngine: Matching {total} candidates in chunks of {chunk_size}."
        );

        let processed = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let matcher = &matcher;

        let chunk_results: Vec<Vec<PathBuf>> = thread::scope(|scope| {
            let mut handles = Vec::new();
            for (index, chunk) in candidates.chunks(chunk_size).enumerate() {
                let processed = &processed;
                let stop = &stop;
                let spawned = thread::Builder::new()
                    .name(format!("orion-match-{index}"))
                    .spawn_scoped(scope, move || {
                        let mut found = Vec::new();
                        for path in chunk {
                            if stop.load(Ordering::Relaxed) {
                                break;
                            }
                            let done = processed.load(Ordering::Relaxed);
                            if !progress(0.5 + 0.5 * done as f64 / total as f64) {
                                stop.store(true, Ordering::Relaxed);
                                break;
                            }
                            if evaluate_candidate(matcher, path) {
                                found.push(path.clone());
                            }
                            processed.fetch_add(1, Ordering::Relaxed);
                        }
                        found
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        log::error!("ParallelSearchEngine: Failed to spawn matcher thread: {e}");
                        stop.store(true, Ordering::Relaxed);
                        return Err(EngineError::Spawn(e));
                    }
                }
            }
            let mut merged = Vec::with_capacity(handles.len());
            for handle in handles {
                match handle.join() {
                    Ok(found) => merged.push(found),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            Ok(merged)
        })?;

        if stop.load(Ordering::Relaxed) {
            return Err(EngineError::Interrupted);
        }
        progress(1.0);
        Ok(chunk_results.into_iter().flatten().collect())
    }
}
