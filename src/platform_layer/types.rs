/*
 * This module defines the data types exchanged between the application logic
 * and the platform layer: identifiers for windows and controls, descriptions of
 * menus and styles, the platform-agnostic events the platform reports
 * (`AppEvent`), the commands it executes (`PlatformCommand`), and the
 * `PlatformEventHandler` trait the application logic implements.
 */

// An opaque identifier for a window, managed by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

/*
 * A logical identifier for a control. The values are defined by the
 * application (see `app_logic::ui_constants`) and mapped by the platform layer
 * to whatever it uses natively.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(i32);

impl ControlId {
    pub const fn new(raw: i32) -> Self {
        ControlId(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

/*
 * Logical menu actions. Menus are described with these so that the
 * application never sees native menu item identifiers.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    StartSearch,
    CancelSearch,
    ToggleDarkMode,
}

#[derive(Debug, Clone)]
pub struct WindowConfig<'a> {
    pub title: &'a str,
    pub width: i32,
    pub height: i32,
}

/*
 * One entry of `PlatformCommand::CreateMainMenu`. Popup entries (those that
 * only open a submenu) have `action: None`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemConfig {
    pub action: Option<MenuAction>,
    pub text: String,
    pub children: Vec<MenuItemConfig>,
}

// --- Styling ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// Named styles the application can define; controls pick one by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    DefaultText,
    StatusInformation,
    StatusWarning,
    StatusError,
    ProgressBar,
    ResultRow,
}

// --- Events from Platform to App Logic ---

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // The static layout has been built and the window is ready.
    MainWindowUISetupComplete {
        window_id: WindowId,
    },
    InputTextChanged {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    ButtonClicked {
        window_id: WindowId,
        control_id: ControlId,
    },
    // The user activated (double-clicked, chose) a row of the result list.
    ResultActivated {
        window_id: WindowId,
        index: usize,
    },
    MenuActionClicked {
        action: MenuAction,
    },
    /*
     * Posted by the platform on its own thread after a search worker called
     * `UiWaker::wake`. The application answers by pumping its controller.
     */
    SearchUpdatesPending,
    WindowCloseRequestedByUser {
        window_id: WindowId,
    },
    // The window is gone; `window_id` must not be used again.
    WindowDestroyed {
        window_id: WindowId,
    },
}

// Severity of a message shown in a label. `None` clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    None,
    Information,
    Warning,
    Error,
}

// Commands the application logic sends to the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCommand {
    SetWindowTitle {
        window_id: WindowId,
        title: String,
    },
    CloseWindow {
        window_id: WindowId,
    },
    QuitApplication,
    CreateMainMenu {
        window_id: WindowId,
        menu_items: Vec<MenuItemConfig>,
    },
    CreateInput {
        window_id: WindowId,
        control_id: ControlId,
        label: String,
        initial_text: String,
    },
    CreateButton {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    CreateLabel {
        window_id: WindowId,
        control_id: ControlId,
        initial_text: String,
    },
    CreateProgressBar {
        window_id: WindowId,
        control_id: ControlId,
    },
    CreateListBox {
        window_id: WindowId,
        control_id: ControlId,
    },
    // All static layout commands for the window have been sent.
    SignalMainWindowUISetupComplete {
        window_id: WindowId,
    },
    SetInputText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    },
    SetControlEnabled {
        window_id: WindowId,
        control_id: ControlId,
        enabled: bool,
    },
    UpdateLabelText {
        window_id: WindowId,
        control_id: ControlId,
        text: String,
        severity: MessageSeverity,
    },
    UpdateProgress {
        window_id: WindowId,
        control_id: ControlId,
        fraction: f64,
    },
    // Replaces the whole content of a list box.
    PopulateResultList {
        window_id: WindowId,
        control_id: ControlId,
        items: Vec<String>,
    },
    DefineStyle {
        style_id: StyleId,
        color: Color,
    },
    // Forgets every defined style; the platform falls back to its defaults.
    ResetStyles,
}

// --- Trait for App Logic to Handle Events ---

/*
 * Implemented by the application logic. The platform layer calls
 * `handle_event` on its UI thread for every `AppEvent`, then drains the
 * commands the handler queued with `try_dequeue_command`.
 */
pub trait PlatformEventHandler {
    fn handle_event(&mut self, event: AppEvent);

    // Called once when the platform leaves its main loop.
    fn on_quit(&mut self) {}

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}
