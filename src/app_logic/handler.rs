use super::main_window_ui_state::{MainWindowUiState, describe_count};
use super::ui_constants;
use crate::core::{
    AppSettings, ConfigManagerOperations, FileRevealOperations, SearchController, SearchError,
    SearchEvent, SessionState,
};
use crate::platform_layer::{
    AppEvent, MessageSeverity, PlatformCommand, PlatformEventHandler, WindowId,
    types::{ControlId, MenuAction},
};
use crate::ui_description_layer::theme;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const APP_NAME: &str = "OrionSearch";

/*
 * Manages the application state and UI logic in a platform-agnostic manner.
 * It processes UI events received from the platform layer, drives the
 * `SearchController`, and queues commands that update the UI. Search events are
 * pulled from the controller whenever the platform reports
 * `AppEvent::SearchUpdatesPending` and right after each start or cancel, so
 * everything the window shows is produced on the UI thread.
 */
pub struct MyAppLogic {
    pub(crate) controller: SearchController,
    config_manager: Arc<dyn ConfigManagerOperations>,
    file_revealer: Arc<dyn FileRevealOperations>,
    pub(crate) settings: AppSettings,
    // Base for relative directory text and the directory shown at startup.
    initial_directory: PathBuf,
    pub(crate) ui_state: Option<MainWindowUiState>,
    synchronous_command_queue: VecDeque<PlatformCommand>,
}

impl MyAppLogic {
    pub fn new(
        controller: SearchController,
        config_manager: Arc<dyn ConfigManagerOperations>,
        file_revealer: Arc<dyn FileRevealOperations>,
        settings: AppSettings,
        initial_directory: PathBuf,
    ) -> Self {
        MyAppLogic {
            controller,
            config_manager,
            file_revealer,
            settings,
            initial_directory,
            ui_state: None,
            synchronous_command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.synchronous_command_queue.push_back(command);
    }

    fn set_label(
        &mut self,
        window_id: WindowId,
        control_id: ControlId,
        text: impl Into<String>,
        severity: MessageSeverity,
    ) {
        self.enqueue_command(PlatformCommand::UpdateLabelText {
            window_id,
            control_id,
            text: text.into(),
            severity,
        });
    }

    fn set_status(&mut self, window_id: WindowId, text: impl Into<String>, severity: MessageSeverity) {
        self.set_label(window_id, ui_constants::STATUS_LABEL_ID, text, severity);
    }

    fn set_error(&mut self, window_id: WindowId, text: impl Into<String>, severity: MessageSeverity) {
        self.set_label(window_id, ui_constants::ERROR_LABEL_ID, text, severity);
    }

    fn set_cancel_enabled(&mut self, window_id: WindowId, enabled: bool) {
        self.enqueue_command(PlatformCommand::SetControlEnabled {
            window_id,
            control_id: ui_constants::CANCEL_BUTTON_ID,
            enabled,
        });
    }

    fn on_main_window_setup_complete(&mut self, window_id: WindowId) {
        log::debug!("AppLogic: Main window {window_id:?} is ready.");
        let ui_state = MainWindowUiState::new(window_id, &self.initial_directory);
        let directory_text = ui_state.directory_text.clone();
        let title = ui_state.compose_window_title();
        self.ui_state = Some(ui_state);

        for command in theme::define_theme(self.settings.dark_mode) {
            self.enqueue_command(command);
        }
        self.enqueue_command(PlatformCommand::SetInputText {
            window_id,
            control_id: ui_constants::DIRECTORY_INPUT_ID,
            text: directory_text,
        });
        self.enqueue_command(PlatformCommand::SetWindowTitle { window_id, title });
    }

    fn on_input_text_changed(&mut self, control_id: ControlId, text: String) {
        let Some(ui_state) = self.ui_state.as_mut() else {
            log::warn!("AppLogic: Input changed before the window was set up.");
            return;
        };
        match control_id {
            ui_constants::QUERY_INPUT_ID => ui_state.query_text = text,
            ui_constants::DIRECTORY_INPUT_ID => ui_state.directory_text = text,
            ui_constants::EXTENSION_INPUT_ID => ui_state.extension_text = text,
            other => log::debug!("AppLogic: Ignoring text from unknown input {other:?}."),
        }
    }

    /*
     * Starts a search with whatever the form holds. A blank query is reported in
     * the error label and leaves a running search alone; anything else replaces
     * the running search, if there is one.
     */
    fn on_start_search(&mut self) {
        let Some(ui_state) = self.ui_state.as_ref() else {
            log::warn!("AppLogic: Search requested before the window was set up.");
            return;
        };
        let window_id = ui_state.window_id;
        let request = ui_state.build_search_request(&self.initial_directory);
        let root = request.root_directory().to_path_buf();

        match self.controller.start(request) {
            Ok(session) => {
                log::debug!("AppLogic: Session {session} started under {root:?}.");
                if let Some(ui_state) = self.ui_state.as_mut() {
                    ui_state.last_search_root = Some(root);
                }
            }
            Err(SearchError::EmptyQuery) => {
                log::debug!("AppLogic: Not starting a search without a query.");
                self.set_error(
                    window_id,
                    SearchError::EmptyQuery.to_string(),
                    MessageSeverity::Warning,
                );
            }
            // The controller has already queued an error event for this.
            Err(e) => log::error!("AppLogic: Failed to start search: {e}"),
        }
        self.drain_search_events();
    }

    fn on_cancel_search(&mut self) {
        if !self.controller.cancel() {
            log::debug!("AppLogic: Nothing to cancel.");
        }
        self.drain_search_events();
    }

    fn on_result_activated(&mut self, window_id: WindowId, index: usize) {
        let Some(path) = self
            .ui_state
            .as_ref()
            .and_then(|ui_state| ui_state.result_path(index))
            .map(Path::to_path_buf)
        else {
            self.set_error(
                window_id,
                format!("There is no result number {}", index + 1),
                MessageSeverity::Warning,
            );
            return;
        };

        match self.file_revealer.reveal(&path) {
            Ok(()) => {
                log::debug!("AppLogic: Revealed {path:?}.");
                self.set_error(window_id, "", MessageSeverity::None);
            }
            Err(e) => {
                log::warn!("AppLogic: Could not reveal {path:?}: {e}");
                self.set_error(window_id, e.to_string(), MessageSeverity::Warning);
            }
        }
    }

    fn on_toggle_dark_mode(&mut self) {
        self.settings.dark_mode = !self.settings.dark_mode;
        log::debug!("AppLogic: Dark mode is now {}.", self.settings.dark_mode);
        if let Err(e) = self.config_manager.save_settings(APP_NAME, &self.settings) {
            log::error!("AppLogic: Failed to save settings: {e}");
            if let Some(window_id) = self.ui_state.as_ref().map(|s| s.window_id) {
                self.set_error(
                    window_id,
                    format!("Could not save settings: {e}"),
                    MessageSeverity::Warning,
                );
            }
        }
        for command in theme::define_theme(self.settings.dark_mode) {
            self.enqueue_command(command);
        }
    }

    /* Pulls everything the controller has queued and renders it in order. */
    fn drain_search_events(&mut self) {
        while let Some(event) = self.controller.try_dequeue_event() {
            self.apply_search_event(event);
        }
    }

    fn apply_search_event(&mut self, event: SearchEvent) {
        let Some(window_id) = self.ui_state.as_ref().map(|s| s.window_id) else {
            log::debug!("AppLogic: Dropping {event:?}, no window.");
            return;
        };
        match event {
            SearchEvent::StateChanged(state) => self.apply_state_change(window_id, state),
            SearchEvent::Progress(fraction) => {
                self.enqueue_command(PlatformCommand::UpdateProgress {
                    window_id,
                    control_id: ui_constants::PROGRESS_BAR_ID,
                    fraction,
                });
            }
            SearchEvent::Results { results, elapsed } => {
                let (rows, status) = match self.ui_state.as_mut() {
                    Some(ui_state) => {
                        ui_state.results = results;
                        let root = ui_state
                            .last_search_root
                            .as_ref()
                            .map(|root| root.display().to_string())
                            .unwrap_or_default();
                        let status = format!(
                            "Found {} in {root} ({})",
                            describe_count(ui_state.results.len()),
                            format_elapsed(elapsed)
                        );
                        (ui_state.format_result_rows(), status)
                    }
                    None => return,
                };
                self.enqueue_command(PlatformCommand::PopulateResultList {
                    window_id,
                    control_id: ui_constants::RESULTS_LIST_ID,
                    items: rows,
                });
                self.set_status(window_id, status, MessageSeverity::Information);
            }
            SearchEvent::Error(message) => {
                self.set_error(window_id, message, MessageSeverity::Error);
            }
        }
    }

    fn apply_state_change(&mut self, window_id: WindowId, state: SessionState) {
        let Some(ui_state) = self.ui_state.as_mut() else {
            return;
        };
        let previous = ui_state.session_state;
        ui_state.session_state = state;
        if state == SessionState::Running {
            ui_state.results.clear();
        }
        let query = ui_state.query_text.trim().to_string();
        let title = ui_state.compose_window_title();
        log::debug!("AppLogic: Search state {previous} -> {state}.");
        if state.is_terminal() {
            log::info!("AppLogic: Search for '{query}' ended: {state}.");
        }

        match state {
            SessionState::Running => {
                self.set_cancel_enabled(window_id, true);
                self.set_error(window_id, "", MessageSeverity::None);
                self.enqueue_command(PlatformCommand::PopulateResultList {
                    window_id,
                    control_id: ui_constants::RESULTS_LIST_ID,
                    items: Vec::new(),
                });
                self.set_status(
                    window_id,
                    format!("Searching for '{query}'..."),
                    MessageSeverity::Information,
                );
            }
            SessionState::CancelRequested => {
                self.set_cancel_enabled(window_id, false);
                self.set_status(window_id, "Cancelling...", MessageSeverity::Information);
            }
            SessionState::Idle => {
                self.set_cancel_enabled(window_id, false);
                let text = match previous {
                    SessionState::Running | SessionState::CancelRequested => "Search cancelled",
                    _ => "Ready",
                };
                self.set_status(window_id, text, MessageSeverity::Information);
            }
            // The status line was already set from the results.
            SessionState::Completed => self.set_cancel_enabled(window_id, false),
            SessionState::Failed => {
                self.set_cancel_enabled(window_id, false);
                self.set_status(window_id, "Search failed", MessageSeverity::Error);
            }
        }
        self.enqueue_command(PlatformCommand::SetWindowTitle { window_id, title });
    }

    fn on_window_close_requested(&mut self, window_id: WindowId) {
        log::debug!("AppLogic: Close requested for {window_id:?}.");
        // No worker may outlive the window.
        self.controller.shutdown();
        self.enqueue_command(PlatformCommand::CloseWindow { window_id });
    }

    fn on_window_destroyed(&mut self, window_id: WindowId) {
        log::debug!("AppLogic: Window {window_id:?} destroyed.");
        if self.ui_state.as_ref().map(|s| s.window_id) == Some(window_id) {
            self.ui_state = None;
        }
        self.enqueue_command(PlatformCommand::QuitApplication);
    }
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{} ms", elapsed.as_millis())
    } else {
        format!("{:.2} s", elapsed.as_secs_f64())
    }
}

impl PlatformEventHandler for MyAppLogic {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: Handling {event:?}");
        match event {
            AppEvent::MainWindowUISetupComplete { window_id } => {
                self.on_main_window_setup_complete(window_id);
            }
            AppEvent::InputTextChanged {
                control_id, text, ..
            } => self.on_input_text_changed(control_id, text),
            AppEvent::ButtonClicked { control_id, .. } => match control_id {
                ui_constants::SEARCH_BUTTON_ID => self.on_start_search(),
                ui_constants::CANCEL_BUTTON_ID => self.on_cancel_search(),
                other => log::debug!("AppLogic: Ignoring click on unknown button {other:?}."),
            },
            AppEvent::ResultActivated { window_id, index } => {
                self.on_result_activated(window_id, index);
            }
            AppEvent::MenuActionClicked { action } => match action {
                MenuAction::StartSearch => self.on_start_search(),
                MenuAction::CancelSearch => self.on_cancel_search(),
                MenuAction::ToggleDarkMode => self.on_toggle_dark_mode(),
            },
            AppEvent::SearchUpdatesPending => {
                let handled = self.controller.pump();
                log::trace!("AppLogic: Pumped {handled} worker messages.");
                self.drain_search_events();
            }
            AppEvent::WindowCloseRequestedByUser { window_id } => {
                self.on_window_close_requested(window_id);
            }
            AppEvent::WindowDestroyed { window_id } => self.on_window_destroyed(window_id),
        }
    }

    fn on_quit(&mut self) {
        if self.controller.has_active_worker() {
            log::debug!("AppLogic: Stopping the search still running at quit.");
        }
        self.controller.shutdown();
        log::debug!("AppLogic: Quit, last search state {}.", self.controller.state());
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.synchronous_command_queue.pop_front()
    }
}
