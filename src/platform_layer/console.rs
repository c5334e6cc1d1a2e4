/*
 * A terminal implementation of the platform layer. The "window" is the
 * terminal: controls are registered from the layout commands, typed lines are
 * translated into `AppEvent`s, and commands from the application are rendered
 * as text.
 *
 * Everything runs on one thread (the UI thread) except a reader thread that
 * forwards stdin lines into the loop's channel. Search workers reach the loop
 * through `ConsoleWaker`, which posts a wake message into the same channel; the
 * loop answers it with `AppEvent::SearchUpdatesPending`.
 */
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{
    AppEvent, Color, ControlId, MenuAction, MenuItemConfig, MessageSeverity, PlatformCommand,
    PlatformEventHandler, StyleId, WindowConfig, WindowId,
};
use crate::core::UiWaker;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

const PROGRESS_BAR_WIDTH: usize = 20;

const HELP_TEXT: &str = "\
Commands:
  query <text>     set the search query
  dir <path>       set the directory to search
  ext <extension>  set the extension filter (empty clears it)
  search [text]    start a search, optionally setting the query first
  cancel           cancel the running search
  results          list the last results
  open <n>         show result <n> in the file manager
  theme            toggle dark mode
  help             show this text
  quit             exit";

#[derive(Debug)]
enum LoopMessage {
    Line(String),
    EndOfInput,
    Wake,
}

/* What a single typed line asks for. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Nothing,
    // `field` is the typed prefix of an input's label ("dir", "ext", "query").
    SetInput { field: String, text: String },
    Search(Option<String>),
    Cancel,
    ShowResults,
    // Zero-based index into the result list.
    Open(usize),
    ToggleTheme,
    Help,
    Quit,
}

pub fn parse_console_line(line: &str) -> Result<ConsoleCommand, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ConsoleCommand::Nothing);
    }
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    match verb.to_lowercase().as_str() {
        "query" | "dir" | "ext" => Ok(ConsoleCommand::SetInput {
            field: verb.to_lowercase(),
            text: rest.to_string(),
        }),
        "search" => Ok(ConsoleCommand::Search(argument)),
        "cancel" => Ok(ConsoleCommand::Cancel),
        "results" => Ok(ConsoleCommand::ShowResults),
        "open" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(ConsoleCommand::Open(n - 1)),
            _ => Err(format!("'open' needs a result number, got '{rest}'")),
        },
        "theme" => Ok(ConsoleCommand::ToggleTheme),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        _ => Err(format!("Unknown command '{verb}'. Type 'help' for a list.")),
    }
}

// Posts a wake message into the console loop from any thread.
pub struct ConsoleWaker {
    sender: Sender<LoopMessage>,
}

impl UiWaker for ConsoleWaker {
    fn wake(&self) {
        if self.sender.send(LoopMessage::Wake).is_err() {
            log::trace!("ConsoleWaker: Loop is gone, wake dropped.");
        }
    }
}

#[derive(Debug)]
struct ConsoleInput {
    control_id: ControlId,
    label: String,
    text: String,
}

#[derive(Debug)]
struct ConsoleButton {
    control_id: ControlId,
    text: String,
    enabled: bool,
}

#[derive(Debug, Default)]
struct ConsoleWindow {
    title: String,
    menu: Vec<MenuItemConfig>,
    inputs: Vec<ConsoleInput>,
    buttons: Vec<ConsoleButton>,
    labels: HashMap<ControlId, String>,
    // Last rendered tenth of each progress bar.
    progress: HashMap<ControlId, Option<usize>>,
    lists: HashMap<ControlId, Vec<String>>,
}

pub struct ConsolePlatform {
    input: Option<Box<dyn BufRead + Send>>,
    output: Box<dyn Write>,
    loop_sender: Sender<LoopMessage>,
    loop_receiver: Receiver<LoopMessage>,
    window_id: Option<WindowId>,
    window: ConsoleWindow,
    styles: HashMap<StyleId, Color>,
    pending_events: VecDeque<AppEvent>,
    quit_requested: bool,
}

impl ConsolePlatform {
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write>) -> Self {
        let (loop_sender, loop_receiver) = mpsc::channel();
        ConsolePlatform {
            input: Some(input),
            output,
            loop_sender,
            loop_receiver,
            window_id: None,
            window: ConsoleWindow::default(),
            styles: HashMap::new(),
            pending_events: VecDeque::new(),
            quit_requested: false,
        }
    }

    pub fn with_stdio() -> Self {
        Self::new(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn waker(&self) -> ConsoleWaker {
        ConsoleWaker {
            sender: self.loop_sender.clone(),
        }
    }

    // The console has room for exactly one window.
    pub fn create_window(&mut self, config: &WindowConfig) -> PlatformResult<WindowId> {
        if self.window_id.is_some() {
            return Err(PlatformError::OperationFailed(
                "The console supports a single window".to_string(),
            ));
        }
        let window_id = WindowId(1);
        self.window_id = Some(window_id);
        self.window = ConsoleWindow {
            title: config.title.to_string(),
            ..ConsoleWindow::default()
        };
        log::debug!(
            "ConsolePlatform: Created window {window_id:?} '{}' ({}x{} requested).",
            config.title,
            config.width,
            config.height
        );
        Ok(window_id)
    }

    pub fn execute_commands(&mut self, commands: Vec<PlatformCommand>) {
        for command in commands {
            if let Err(e) = self.execute_command(command) {
                log::error!("ConsolePlatform: Command failed: {e}");
            }
        }
    }

    /*
     * Runs the UI loop until the application asks to quit. Queued events are
     * dispatched first; then the loop blocks on the next typed line, end of
     * input, or wake from a search worker.
     */
    pub fn run(&mut self, handler: &mut dyn PlatformEventHandler) -> PlatformResult<()> {
        let input = self.input.take().ok_or_else(|| {
            PlatformError::OperationFailed("The console loop can only run once".to_string())
        })?;
        let reader_sender = self.loop_sender.clone();
        thread::Builder::new()
            .name("orion-console-input".to_string())
            .spawn(move || forward_input_lines(input, reader_sender))?;

        loop {
            while let Some(event) = self.pending_events.pop_front() {
                self.dispatch(handler, event);
                if self.quit_requested {
                    break;
                }
            }
            if self.quit_requested {
                break;
            }
            self.output.flush()?;

            let Ok(message) = self.loop_receiver.recv() else {
                break;
            };
            match message {
                LoopMessage::Wake => {
                    if !self.pending_events.contains(&AppEvent::SearchUpdatesPending) {
                        self.pending_events.push_back(AppEvent::SearchUpdatesPending);
                    }
                }
                LoopMessage::Line(line) => self.handle_line(&line)?,
                LoopMessage::EndOfInput => {
                    log::debug!("ConsolePlatform: End of input.");
                    match self.window_id {
                        Some(window_id) => self
                            .pending_events
                            .push_back(AppEvent::WindowCloseRequestedByUser { window_id }),
                        None => self.quit_requested = true,
                    }
                }
            }
        }

        log::debug!("ConsolePlatform: Leaving main loop.");
        handler.on_quit();
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, handler: &mut dyn PlatformEventHandler, event: AppEvent) {
        log::trace!("ConsolePlatform: Dispatching {event:?}");
        handler.handle_event(event);
        while let Some(command) = handler.try_dequeue_command() {
            if let Err(e) = self.execute_command(command) {
                log::error!("ConsolePlatform: Command failed: {e}");
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> PlatformResult<()> {
        let Some(window_id) = self.window_id else {
            return Ok(());
        };
        let command = match parse_console_line(line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(self.output, "{message}")?;
                return Ok(());
            }
        };

        match command {
            ConsoleCommand::Nothing => {}
            ConsoleCommand::SetInput { field, text } => {
                self.queue_input_change(window_id, &field, text)?;
            }
            ConsoleCommand::Search(query) => {
                if let Some(text) = query {
                    self.queue_input_change(window_id, "query", text)?;
                }
                self.queue_button_click(window_id, "search")?;
            }
            ConsoleCommand::Cancel => self.queue_button_click(window_id, "cancel")?,
            ConsoleCommand::ShowResults => self.print_results()?,
            ConsoleCommand::Open(index) => self
                .pending_events
                .push_back(AppEvent::ResultActivated { window_id, index }),
            ConsoleCommand::ToggleTheme => self.pending_events.push_back(AppEvent::MenuActionClicked {
                action: MenuAction::ToggleDarkMode,
            }),
            ConsoleCommand::Help => self.print_help()?,
            ConsoleCommand::Quit => self
                .pending_events
                .push_back(AppEvent::WindowCloseRequestedByUser { window_id }),
        }
        Ok(())
    }

    fn queue_input_change(
        &mut self,
        window_id: WindowId,
        field: &str,
        text: String,
    ) -> PlatformResult<()> {
        let Some(input) = self
            .window
            .inputs
            .iter_mut()
            .find(|input| input.label.to_lowercase().starts_with(field))
        else {
            writeln!(self.output, "There is no '{field}' field.")?;
            return Ok(());
        };
        input.text = text.clone();
        self.pending_events.push_back(AppEvent::InputTextChanged {
            window_id,
            control_id: input.control_id,
            text,
        });
        Ok(())
    }

    fn queue_button_click(&mut self, window_id: WindowId, text: &str) -> PlatformResult<()> {
        let Some(button) = self
            .window
            .buttons
            .iter()
            .find(|button| button.text.eq_ignore_ascii_case(text))
        else {
            writeln!(self.output, "There is no '{text}' button.")?;
            return Ok(());
        };
        if !button.enabled {
            writeln!(self.output, "'{}' is not available right now.", button.text)?;
            return Ok(());
        }
        self.pending_events.push_back(AppEvent::ButtonClicked {
            window_id,
            control_id: button.control_id,
        });
        Ok(())
    }

    fn check_window(&self, window_id: WindowId) -> PlatformResult<()> {
        if self.window_id == Some(window_id) {
            Ok(())
        } else {
            Err(PlatformError::InvalidHandle(format!("Unknown window {window_id:?}")))
        }
    }

    pub(crate) fn execute_command(&mut self, command: PlatformCommand) -> PlatformResult<()> {
        match command {
            PlatformCommand::SetWindowTitle { window_id, title } => {
                self.check_window(window_id)?;
                if self.window.title != title {
                    writeln!(self.output, "== {title} ==")?;
                    self.window.title = title;
                }
            }
            PlatformCommand::CloseWindow { window_id } => {
                self.check_window(window_id)?;
                log::debug!("ConsolePlatform: Closing window {window_id:?}.");
                self.pending_events
                    .push_back(AppEvent::WindowDestroyed { window_id });
            }
            PlatformCommand::QuitApplication => {
                self.quit_requested = true;
            }
            PlatformCommand::CreateMainMenu {
                window_id,
                menu_items,
            } => {
                self.check_window(window_id)?;
                self.window.menu = menu_items;
            }
            PlatformCommand::CreateInput {
                window_id,
                control_id,
                label,
                initial_text,
            } => {
                self.check_window(window_id)?;
                self.window.inputs.push(ConsoleInput {
                    control_id,
                    label,
                    text: initial_text,
                });
            }
            PlatformCommand::CreateButton {
                window_id,
                control_id,
                text,
            } => {
                self.check_window(window_id)?;
                self.window.buttons.push(ConsoleButton {
                    control_id,
                    text,
                    enabled: true,
                });
            }
            PlatformCommand::CreateLabel {
                window_id,
                control_id,
                initial_text,
            } => {
                self.check_window(window_id)?;
                self.window.labels.insert(control_id, initial_text);
            }
            PlatformCommand::CreateProgressBar {
                window_id,
                control_id,
            } => {
                self.check_window(window_id)?;
                self.window.progress.insert(control_id, None);
            }
            PlatformCommand::CreateListBox {
                window_id,
                control_id,
            } => {
                self.check_window(window_id)?;
                self.window.lists.insert(control_id, Vec::new());
            }
            PlatformCommand::SignalMainWindowUISetupComplete { window_id } => {
                self.check_window(window_id)?;
                writeln!(self.output, "== {} ==", self.window.title)?;
                writeln!(self.output, "Type 'help' for a list of commands.")?;
                self.pending_events
                    .push_back(AppEvent::MainWindowUISetupComplete { window_id });
            }
            PlatformCommand::SetInputText {
                window_id,
                control_id,
                text,
            } => {
                self.check_window(window_id)?;
                let input = self
                    .window
                    .inputs
                    .iter_mut()
                    .find(|input| input.control_id == control_id)
                    .ok_or_else(|| unknown_control(control_id))?;
                input.text = text;
            }
            PlatformCommand::SetControlEnabled {
                window_id,
                control_id,
                enabled,
            } => {
                self.check_window(window_id)?;
                // Inputs stay editable on a terminal; only buttons can be disabled.
                if let Some(button) = self
                    .window
                    .buttons
                    .iter_mut()
                    .find(|button| button.control_id == control_id)
                {
                    button.enabled = enabled;
                }
            }
            PlatformCommand::UpdateLabelText {
                window_id,
                control_id,
                text,
                severity,
            } => {
                self.check_window(window_id)?;
                let label = self
                    .window
                    .labels
                    .get_mut(&control_id)
                    .ok_or_else(|| unknown_control(control_id))?;
                if *label != text {
                    label.clone_from(&text);
                    if !text.is_empty() {
                        let line = render_label(&text, severity);
                        let styled = self.styled(style_for_severity(severity), &line);
                        writeln!(self.output, "{styled}")?;
                    }
                }
            }
            PlatformCommand::UpdateProgress {
                window_id,
                control_id,
                fraction,
            } => {
                self.check_window(window_id)?;
                let last = self
                    .window
                    .progress
                    .get_mut(&control_id)
                    .ok_or_else(|| unknown_control(control_id))?;
                let tenth = progress_tenth(fraction);
                if *last != Some(tenth) {
                    *last = Some(tenth);
                    let bar = render_progress_bar(fraction);
                    let styled = self.styled(StyleId::ProgressBar, &bar);
                    writeln!(self.output, "{styled}")?;
                }
            }
            PlatformCommand::PopulateResultList {
                window_id,
                control_id,
                items,
            } => {
                self.check_window(window_id)?;
                let list = self
                    .window
                    .lists
                    .get_mut(&control_id)
                    .ok_or_else(|| unknown_control(control_id))?;
                *list = items;
                if !list.is_empty() {
                    self.print_results()?;
                }
            }
            PlatformCommand::DefineStyle { style_id, color } => {
                self.styles.insert(style_id, color);
            }
            PlatformCommand::ResetStyles => {
                self.styles.clear();
            }
        }
        Ok(())
    }

    fn styled(&self, style_id: StyleId, text: &str) -> String {
        match self.styles.get(&style_id) {
            Some(Color { r, g, b }) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            None => text.to_string(),
        }
    }

    fn print_results(&mut self) -> PlatformResult<()> {
        let rows: Vec<String> = self.window.lists.values().flatten().cloned().collect();
        if rows.is_empty() {
            writeln!(self.output, "No results.")?;
            return Ok(());
        }
        for (index, row) in rows.iter().enumerate() {
            let line = format!("{:>4}. {row}", index + 1);
            let styled = self.styled(StyleId::ResultRow, &line);
            writeln!(self.output, "{styled}")?;
        }
        Ok(())
    }

    fn print_help(&mut self) -> PlatformResult<()> {
        writeln!(self.output, "{HELP_TEXT}")?;
        for input in &self.window.inputs {
            writeln!(self.output, "  [{}] {}", input.label, input.text)?;
        }
        let menu_entries = flatten_menu(&self.window.menu);
        if !menu_entries.is_empty() {
            writeln!(self.output, "Menu: {}", menu_entries.join(", "))?;
        }
        Ok(())
    }
}

fn forward_input_lines(input: Box<dyn BufRead + Send>, sender: Sender<LoopMessage>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if sender.send(LoopMessage::Line(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                log::warn!("ConsolePlatform: Reading input failed: {e}");
                break;
            }
        }
    }
    let _ = sender.send(LoopMessage::EndOfInput);
}

fn unknown_control(control_id: ControlId) -> PlatformError {
    PlatformError::InvalidHandle(format!("Unknown control {}", control_id.raw()))
}

fn flatten_menu(items: &[MenuItemConfig]) -> Vec<String> {
    let mut names = Vec::new();
    for item in items {
        if item.action.is_some() {
            names.push(item.text.replace('&', ""));
        }
        names.extend(flatten_menu(&item.children));
    }
    names
}

fn style_for_severity(severity: MessageSeverity) -> StyleId {
    match severity {
        MessageSeverity::None => StyleId::DefaultText,
        MessageSeverity::Information => StyleId::StatusInformation,
        MessageSeverity::Warning => StyleId::StatusWarning,
        MessageSeverity::Error => StyleId::StatusError,
    }
}

fn render_label(text: &str, severity: MessageSeverity) -> String {
    match severity {
        MessageSeverity::Warning => format!("warning: {text}"),
        MessageSeverity::Error => format!("error: {text}"),
        MessageSeverity::None | MessageSeverity::Information => text.to_string(),
    }
}

fn progress_tenth(fraction: f64) -> usize {
    (fraction.clamp(0.0, 1.0) * 10.0).floor() as usize
}

pub(crate) fn render_progress_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * PROGRESS_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_logic::ui_constants;
    use crate::ui_description_layer::build_main_window_static_layout;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // Records events; closes and quits like the real presenter.
    #[derive(Default)]
    struct RecordingHandler {
        events: Vec<AppEvent>,
        commands: VecDeque<PlatformCommand>,
        quit_called: bool,
    }

    impl PlatformEventHandler for RecordingHandler {
        fn handle_event(&mut self, event: AppEvent) {
            match &event {
                AppEvent::WindowCloseRequestedByUser { window_id } => self
                    .commands
                    .push_back(PlatformCommand::CloseWindow { window_id: *window_id }),
                AppEvent::WindowDestroyed { .. } => {
                    self.commands.push_back(PlatformCommand::QuitApplication)
                }
                _ => {}
            }
            self.events.push(event);
        }

        fn on_quit(&mut self) {
            self.quit_called = true;
        }

        fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
            self.commands.pop_front()
        }
    }

    fn platform_with_input(input: &str) -> (ConsolePlatform, SharedBuffer, WindowId) {
        let output = SharedBuffer::default();
        let mut platform = ConsolePlatform::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(output.clone()),
        );
        let window_id = platform
            .create_window(&WindowConfig {
                title: "Orion",
                width: 800,
                height: 600,
            })
            .unwrap();
        platform.execute_commands(build_main_window_static_layout(window_id));
        (platform, output, window_id)
    }

    #[test]
    fn test_parse_console_line_verbs() {
        assert_eq!(parse_console_line("   "), Ok(ConsoleCommand::Nothing));
        assert_eq!(
            parse_console_line("query annual report"),
            Ok(ConsoleCommand::SetInput {
                field: "query".to_string(),
                text: "annual report".to_string()
            })
        );
        assert_eq!(
            parse_console_line("ext"),
            Ok(ConsoleCommand::SetInput {
                field: "ext".to_string(),
                text: String::new()
            })
        );
        assert_eq!(parse_console_line("search"), Ok(ConsoleCommand::Search(None)));
        assert_eq!(
            parse_console_line("SEARCH notes"),
            Ok(ConsoleCommand::Search(Some("notes".to_string())))
        );
        assert_eq!(parse_console_line("open 3"), Ok(ConsoleCommand::Open(2)));
        assert_eq!(parse_console_line("exit"), Ok(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_console_line_rejects_bad_input() {
        assert!(parse_console_line("open 0").is_err());
        assert!(parse_console_line("open x").is_err());
        assert!(parse_console_line("frobnicate").is_err());
    }

    #[test]
    fn test_typed_lines_become_events_until_quit() {
        // Arrange
        crate::initialize_logging();
        let (mut platform, output, window_id) =
            platform_with_input("query report\nsearch\nopen 2\nbogus\ncancel\nquit\n");
        let mut handler = RecordingHandler::default();

        // Act
        platform.run(&mut handler).unwrap();

        // Assert
        assert_eq!(
            handler.events,
            vec![
                AppEvent::MainWindowUISetupComplete { window_id },
                AppEvent::InputTextChanged {
                    window_id,
                    control_id: ui_constants::QUERY_INPUT_ID,
                    text: "report".to_string(),
                },
                AppEvent::ButtonClicked {
                    window_id,
                    control_id: ui_constants::SEARCH_BUTTON_ID,
                },
                AppEvent::ResultActivated { window_id, index: 1 },
                AppEvent::WindowCloseRequestedByUser { window_id },
                AppEvent::WindowDestroyed { window_id },
            ]
        );
        assert!(handler.quit_called);
        let text = output.contents();
        assert!(text.contains("Unknown command 'bogus'"), "Output was: {text}");
        assert!(text.contains("'Cancel' is not available right now."));
    }

    #[test]
    fn test_end_of_input_closes_the_window() {
        let (mut platform, _output, window_id) = platform_with_input("");
        let mut handler = RecordingHandler::default();

        platform.run(&mut handler).unwrap();

        assert_eq!(
            handler.events.last(),
            Some(&AppEvent::WindowDestroyed { window_id })
        );
        assert!(handler.events.contains(&AppEvent::WindowCloseRequestedByUser { window_id }));
    }

    #[test]
    fn test_progress_is_rendered_per_tenth() {
        let (mut platform, output, window_id) = platform_with_input("");

        for fraction in [0.0, 0.01, 0.05, 0.5, 0.55, 1.0] {
            platform
                .execute_command(PlatformCommand::UpdateProgress {
                    window_id,
                    control_id: ui_constants::PROGRESS_BAR_ID,
                    fraction,
                })
                .unwrap();
        }

        let bars: Vec<String> = output
            .contents()
            .lines()
            .filter(|line| line.starts_with('['))
            .map(str::to_string)
            .collect();
        assert_eq!(bars.len(), 3, "Bars: {bars:?}");
        assert!(bars[2].ends_with("100%"));
    }

    #[test]
    fn test_result_list_is_numbered() {
        let (mut platform, output, window_id) = platform_with_input("");

        platform
            .execute_command(PlatformCommand::PopulateResultList {
                window_id,
                control_id: ui_constants::RESULTS_LIST_ID,
                items: vec!["a.txt".to_string(), "sub/Abcd.txt".to_string()],
            })
            .unwrap();

        let text = output.contents();
        assert!(text.contains("   1. a.txt"));
        assert!(text.contains("   2. sub/Abcd.txt"));
    }

    #[test]
    fn test_dark_style_colors_error_labels() {
        let (mut platform, output, window_id) = platform_with_input("");
        platform.execute_commands(crate::ui_description_layer::theme::define_theme(true));

        platform
            .execute_command(PlatformCommand::UpdateLabelText {
                window_id,
                control_id: ui_constants::ERROR_LABEL_ID,
                text: "boom".to_string(),
                severity: MessageSeverity::Error,
            })
            .unwrap();

        assert!(output.contents().contains("\x1b[38;2;255;100;100merror: boom\x1b[0m"));
    }

    #[test]
    fn test_unknown_window_is_invalid_handle() {
        let (mut platform, _output, _window_id) = platform_with_input("");

        let outcome = platform.execute_command(PlatformCommand::SetWindowTitle {
            window_id: WindowId(99),
            title: "x".to_string(),
        });

        assert!(matches!(outcome, Err(PlatformError::InvalidHandle(_))));
    }

    #[test]
    fn test_waker_posts_into_the_loop() {
        let (platform, _output, _window_id) = platform_with_input("");

        platform.waker().wake();

        assert!(matches!(
            platform.loop_receiver.try_recv(),
            Ok(LoopMessage::Wake)
        ));
    }

    #[test]
    fn test_progress_bar_rendering() {
        assert_eq!(render_progress_bar(0.0), format!("[{}]   0%", "-".repeat(20)));
        assert_eq!(render_progress_bar(0.5), format!("[{}{}]  50%", "#".repeat(10), "-".repeat(10)));
    }
}
