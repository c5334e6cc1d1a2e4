/*
 * This module is responsible for defining the static structure of the UI.
 * It generates a series of `PlatformCommand`s that describe the menu and
 * controls of the main window: the search form, the progress bar, the result
 * list and the status labels. Dynamic behavior (enabling, progress, results)
 * is left to the presenter.
 */
pub mod theme;

use crate::app_logic::ui_constants;
use crate::platform_layer::types::{MenuAction, MenuItemConfig, PlatformCommand, WindowId};

fn menu_item(action: MenuAction, text: &str) -> MenuItemConfig {
    MenuItemConfig {
        action: Some(action),
        text: text.to_string(),
        children: Vec::new(),
    }
}

/*
 * Generates the commands that build the main window. Intended to be called
 * once per window, before the platform starts dispatching events. The last
 * command signals that setup is complete.
 */
pub fn build_main_window_static_layout(window_id: WindowId) -> Vec<PlatformCommand> {
    log::debug!("ui_description_layer: build_main_window_static_layout called.");

    let mut commands = vec![PlatformCommand::CreateMainMenu {
        window_id,
        menu_items: vec![
            MenuItemConfig {
                action: None,
                text: "&Search".to_string(),
                children: vec![
                    menu_item(MenuAction::StartSearch, "&Start"),
                    menu_item(MenuAction::CancelSearch, "&Cancel"),
                ],
            },
            MenuItemConfig {
                action: None,
                text: "&View".to_string(),
                children: vec![menu_item(MenuAction::ToggleDarkMode, "&Dark Mode")],
            },
        ],
    }];

    for (control_id, label) in [
        (ui_constants::QUERY_INPUT_ID, "Query"),
        (ui_constants::DIRECTORY_INPUT_ID, "Directory"),
        (ui_constants::EXTENSION_INPUT_ID, "Extension"),
    ] {
        commands.push(PlatformCommand::CreateInput {
            window_id,
            control_id,
            label: label.to_string(),
            initial_text: String::new(),
        });
    }

    commands.push(PlatformCommand::CreateButton {
        window_id,
        control_id: ui_constants::SEARCH_BUTTON_ID,
        text: "Search".to_string(),
    });
    commands.push(PlatformCommand::CreateButton {
        window_id,
        control_id: ui_constants::CANCEL_BUTTON_ID,
        text: "Cancel".to_string(),
    });
    commands.push(PlatformCommand::CreateProgressBar {
        window_id,
        control_id: ui_constants::PROGRESS_BAR_ID,
    });
    commands.push(PlatformCommand::CreateListBox {
        window_id,
        control_id: ui_constants::RESULTS_LIST_ID,
    });
    commands.push(PlatformCommand::CreateLabel {
        window_id,
        control_id: ui_constants::STATUS_LABEL_ID,
        initial_text: "Ready".to_string(),
    });
    commands.push(PlatformCommand::CreateLabel {
        window_id,
        control_id: ui_constants::ERROR_LABEL_ID,
        initial_text: String::new(),
    });

    // Nothing to cancel until a search runs.
    commands.push(PlatformCommand::SetControlEnabled {
        window_id,
        control_id: ui_constants::CANCEL_BUTTON_ID,
        enabled: false,
    });

    commands.push(PlatformCommand::SignalMainWindowUISetupComplete { window_id });
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_ends_with_setup_complete_signal() {
        let window_id = WindowId(7);

        let commands = build_main_window_static_layout(window_id);

        assert_eq!(
            commands.last(),
            Some(&PlatformCommand::SignalMainWindowUISetupComplete { window_id })
        );
    }

    #[test]
    fn test_layout_creates_every_search_control_once() {
        let commands = build_main_window_static_layout(WindowId(1));

        let created: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                PlatformCommand::CreateInput { control_id, .. }
                | PlatformCommand::CreateButton { control_id, .. }
                | PlatformCommand::CreateLabel { control_id, .. }
                | PlatformCommand::CreateProgressBar { control_id, .. }
                | PlatformCommand::CreateListBox { control_id, .. } => Some(*control_id),
                _ => None,
            })
            .collect();

        for expected in [
            ui_constants::QUERY_INPUT_ID,
            ui_constants::DIRECTORY_INPUT_ID,
            ui_constants::EXTENSION_INPUT_ID,
            ui_constants::SEARCH_BUTTON_ID,
            ui_constants::CANCEL_BUTTON_ID,
            ui_constants::PROGRESS_BAR_ID,
            ui_constants::RESULTS_LIST_ID,
            ui_constants::STATUS_LABEL_ID,
            ui_constants::ERROR_LABEL_ID,
        ] {
            assert_eq!(
                created.iter().filter(|id| **id == expected).count(),
                1,
                "{expected:?} should be created exactly once"
            );
        }
    }

    #[test]
    fn test_cancel_starts_disabled() {
        let commands = build_main_window_static_layout(WindowId(1));

        assert!(commands.contains(&PlatformCommand::SetControlEnabled {
            window_id: WindowId(1),
            control_id: ui_constants::CANCEL_BUTTON_ID,
            enabled: false,
        }));
    }
}
