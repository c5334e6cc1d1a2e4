/*
 * This module defines the MainWindowUiState struct.
 * MainWindowUiState holds what the presenter knows about the main window: the
 * text currently in the search form, the results on display and the root they
 * were found under, and the last session state it was told about. It turns that
 * into a `SearchRequest` and into the strings the window shows.
 */
use crate::core::path_utils;
use crate::core::{ResultSet, SearchRequest, SessionState};
use crate::platform_layer::WindowId;
use std::path::{Path, PathBuf};

pub(crate) const APP_TITLE: &str = "Orion Search";

#[derive(Debug)]
pub struct MainWindowUiState {
    pub window_id: WindowId,
    pub query_text: String,
    pub directory_text: String,
    pub extension_text: String,
    /* Results of the last completed session, in walk order. */
    pub results: ResultSet,
    /* Root of the most recently started session; result rows are shown relative to it. */
    pub last_search_root: Option<PathBuf>,
    pub session_state: SessionState,
}

impl MainWindowUiState {
    pub fn new(window_id: WindowId, initial_directory: &Path) -> Self {
        log::debug!("MainWindowUiState::new called for window_id: {window_id:?}");
        MainWindowUiState {
            window_id,
            query_text: String::new(),
            directory_text: initial_directory.display().to_string(),
            extension_text: String::new(),
            results: Vec::new(),
            last_search_root: None,
            session_state: SessionState::Idle,
        }
    }

    /*
     * Builds a request from the form. The directory text is resolved against
     * `current_dir`; the query is passed through untouched so the controller
     * can reject a blank one.
     */
    pub fn build_search_request(&self, current_dir: &Path) -> SearchRequest {
        let root = path_utils::resolve_search_root(&self.directory_text, current_dir);
        let extension = self.extension_text.trim();
        SearchRequest::new(
            self.query_text.clone(),
            root,
            (!extension.is_empty()).then_some(extension),
        )
    }

    pub fn compose_window_title(&self) -> String {
        match self.session_state {
            SessionState::Running | SessionState::CancelRequested => {
                format!("{APP_TITLE} - [Searching '{}']", self.query_text.trim())
            }
            SessionState::Completed => {
                format!("{APP_TITLE} - [{}]", describe_count(self.results.len()))
            }
            SessionState::Failed => format!("{APP_TITLE} - [Failed]"),
            SessionState::Idle => APP_TITLE.to_string(),
        }
    }

    // One display row per result, relative to the search root where possible.
    pub fn format_result_rows(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|result| {
                let shown = self
                    .last_search_root
                    .as_deref()
                    .and_then(|root| result.path.strip_prefix(root).ok())
                    .unwrap_or(&result.path);
                shown.display().to_string()
            })
            .collect()
    }

    pub fn result_path(&self, index: usize) -> Option<&Path> {
        self.results.get(index).map(|result| result.path.as_path())
    }
}

pub(crate) fn describe_count(count: usize) -> String {
    match count {
        0 => "no matches".to_string(),
        1 => "1 match".to_string(),
        n => format!("{n} matches"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SearchResult;

    fn ui_state_with_results(root: &str, paths: &[&str]) -> MainWindowUiState {
        let mut ui_state = MainWindowUiState::new(WindowId(1), Path::new(root));
        ui_state.last_search_root = Some(PathBuf::from(root));
        ui_state.results = paths
            .iter()
            .map(|p| SearchResult::new(PathBuf::from(p)))
            .collect();
        ui_state
    }

    #[test]
    fn test_main_window_ui_state_new() {
        // Arrange
        crate::initialize_logging();
        let test_window_id = WindowId(42);

        // Act
        let ui_state = MainWindowUiState::new(test_window_id, Path::new("/data"));

        // Assert
        assert_eq!(ui_state.window_id, test_window_id);
        assert_eq!(ui_state.directory_text, "/data");
        assert!(ui_state.query_text.is_empty());
        assert!(ui_state.results.is_empty());
        assert!(ui_state.last_search_root.is_none());
        assert_eq!(ui_state.session_state, SessionState::Idle);
    }

    #[test]
    fn test_build_search_request_resolves_form_text() {
        // Arrange
        let mut ui_state = MainWindowUiState::new(WindowId(1), Path::new(""));
        ui_state.query_text = "report".to_string();
        ui_state.directory_text = "docs".to_string();
        ui_state.extension_text = " txt ".to_string();

        // Act
        let request = ui_state.build_search_request(Path::new("/home/me"));

        // Assert
        assert_eq!(request.query(), "report");
        assert_eq!(request.root_directory(), Path::new("/home/me/docs"));
        assert_eq!(request.extension_filter(), Some(".txt"));
    }

    #[test]
    fn test_build_search_request_without_extension() {
        let ui_state = MainWindowUiState::new(WindowId(1), Path::new("/srv"));

        let request = ui_state.build_search_request(Path::new("/elsewhere"));

        assert_eq!(request.root_directory(), Path::new("/srv"));
        assert_eq!(request.extension_filter(), None);
        assert!(!request.has_query());
    }

    #[test]
    fn test_compose_window_title_follows_session_state() {
        let mut ui_state = ui_state_with_results("/r", &["/r/a.txt", "/r/b.txt"]);
        ui_state.query_text = " a ".to_string();

        assert_eq!(ui_state.compose_window_title(), "Orion Search");

        ui_state.session_state = SessionState::Running;
        assert_eq!(ui_state.compose_window_title(), "Orion Search - [Searching 'a']");

        ui_state.session_state = SessionState::Completed;
        assert_eq!(ui_state.compose_window_title(), "Orion Search - [2 matches]");

        ui_state.session_state = SessionState::Failed;
        assert_eq!(ui_state.compose_window_title(), "Orion Search - [Failed]");
    }

    #[test]
    fn test_format_result_rows_relative_to_root() {
        let ui_state = ui_state_with_results("/r", &["/r/a.txt", "/r/sub/Abcd.txt", "/other/x.txt"]);

        let rows = ui_state.format_result_rows();

        assert_eq!(
            rows,
            vec![
                "a.txt".to_string(),
                Path::new("sub").join("Abcd.txt").display().to_string(),
                "/other/x.txt".to_string(),
            ]
        );
        assert_eq!(ui_state.result_path(1), Some(Path::new("/r/sub/Abcd.txt")));
        assert_eq!(ui_state.result_path(3), None);
    }

    #[test]
    fn test_describe_count() {
        assert_eq!(describe_count(0), "no matches");
        assert_eq!(describe_count(1), "1 match");
        assert_eq!(describe_count(7), "7 matches");
    }
}
