/*
 * This module provides the application logic layer, centered around
 * `MyAppLogic`, which acts as the Presenter: it owns the search controller and
 * translates between platform events, search events and platform commands.
 * `MainWindowUiState` holds the UI-specific state of the main window.
 * Unit tests for `MyAppLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod main_window_ui_state;
pub mod ui_constants;


pub use handler::{APP_NAME, MyAppLogic};
