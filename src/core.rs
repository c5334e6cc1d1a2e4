/*
 * This module consolidates the core, platform-agnostic logic of the application:
 * the search data model and matching rule, file enumeration, the search
 * backends (sequential and engine-backed), the cancelable session controller,
 * and the supporting configuration, path and file-reveal utilities.
 */
pub mod config;
pub mod engine_backend;
pub mod file_reveal;
pub mod file_system;
pub mod matcher;
pub mod models;
pub mod path_utils;
pub mod search_backend;
pub mod search_error;
pub mod search_session;

// Re-export key structures and enums
pub use models::{ResultSet, SearchRequest, SessionState};

#[cfg(test)]
pub use models::SearchResult;

pub use file_system::{CoreFileEnumerator, FileEnumeratorOperations, WalkOptions};

pub use search_backend::{CoreSearchBackend, SearchBackendOperations};
pub use engine_backend::{EngineSearchBackend, ParallelSearchEngine};
pub use search_error::SearchError;

pub use search_session::{SearchController, SearchEvent, UiWaker};

pub use config::{AppSettings, BackendKind, ConfigManagerOperations, CoreConfigManager};

#[cfg(test)]
pub use config::ConfigError;

pub use file_reveal::{CoreFileRevealer, FileRevealOperations};
