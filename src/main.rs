mod app_logic;
mod core;
mod platform_layer;
mod ui_description_layer;

use crate::app_logic::main_window_ui_state::APP_TITLE;
use crate::app_logic::{APP_NAME, MyAppLogic};
use crate::core::config::{default_settings_path, load_settings_or_default};
use crate::core::path_utils;
use crate::core::{
    BackendKind, ConfigManagerOperations, CoreConfigManager, CoreFileEnumerator,
    CoreFileRevealer, CoreSearchBackend, EngineSearchBackend, FileEnumeratorOperations,
    ParallelSearchEngine, SearchBackendOperations, SearchController, WalkOptions,
};
use crate::platform_layer::{ConsolePlatform, PlatformResult, WindowConfig};
use crate::ui_description_layer::build_main_window_static_layout;
use simplelog::LevelFilter;
use std::process::ExitCode;
use std::sync::{Arc, Once};

const USAGE: &str = "\
Usage: orion_search [--dir <path>] [--verbose]

  --dir <path>   directory to search initially (default: current directory)
  --verbose      log debug output to stderr
  --help         show this text";

static LOGGING_INIT: Once = Once::new();

/*
 * Installs the global logger once per process. Tests get simplelog's
 * `TestLogger`, so output is captured per test; the application logs to stderr
 * because stdout belongs to the console front end.
 */
pub(crate) fn initialize_logging_with_level(level: LevelFilter) {
    LOGGING_INIT.call_once(|| {
        let config = simplelog::ConfigBuilder::new()
            .set_thread_level(LevelFilter::Debug)
            .build();

        #[cfg(test)]
        let result = simplelog::TestLogger::init(level.max(LevelFilter::Debug), config);
        #[cfg(not(test))]
        let result = simplelog::TermLogger::init(
            level,
            config,
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        );

        if let Err(e) = result {
            eprintln!("Failed to initialize logger: {e}");
        }
    });
}

#[cfg(test)]
pub(crate) fn initialize_logging() {
    initialize_logging_with_level(LevelFilter::Debug);
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LaunchOptions {
    verbose: bool,
    directory: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum LaunchCommand {
    Run(LaunchOptions),
    ShowHelp,
}

fn parse_launch_args(args: impl IntoIterator<Item = String>) -> Result<LaunchCommand, String> {
    let mut options = LaunchOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(LaunchCommand::ShowHelp),
            "--verbose" | "-v" => options.verbose = true,
            "--dir" => match args.next() {
                Some(dir) => options.directory = Some(dir),
                None => return Err("--dir needs a path".to_string()),
            },
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(LaunchCommand::Run(options))
}

fn build_search_backend(
    backend: BackendKind,
    enumerator: Arc<dyn FileEnumeratorOperations>,
) -> Arc<dyn SearchBackendOperations> {
    match backend {
        BackendKind::Sequential => Arc::new(CoreSearchBackend::new(enumerator)),
        BackendKind::Parallel => {
            let engine = ParallelSearchEngine::new(enumerator);
            log::debug!(
                "Main: Using the parallel engine with {} matcher threads.",
                engine.worker_count()
            );
            Arc::new(EngineSearchBackend::new(Arc::new(engine)))
        }
    }
}

fn run_app(options: LaunchOptions) -> PlatformResult<()> {
    let current_dir = std::env::current_dir()?;
    let initial_directory = match options.directory.as_deref() {
        Some(dir) => path_utils::resolve_search_root(dir, &current_dir),
        None => current_dir,
    };

    let config_manager: Arc<dyn ConfigManagerOperations> = Arc::new(CoreConfigManager::new());
    let settings = load_settings_or_default(config_manager.as_ref(), APP_NAME);
    if let Some(path) = default_settings_path(APP_NAME) {
        log::debug!("Main: Settings file is {path:?}.");
    }
    log::debug!("Main: Starting with {settings:?} in {initial_directory:?}.");

    let enumerator: Arc<dyn FileEnumeratorOperations> =
        Arc::new(CoreFileEnumerator::new(WalkOptions {
            respect_ignore_files: settings.respect_ignore_files,
            include_hidden: settings.include_hidden,
        }));
    let backend = build_search_backend(settings.backend, enumerator);

    let mut platform = ConsolePlatform::with_stdio();
    let controller = SearchController::new(
        backend,
        Arc::new(platform.waker()),
        settings.progress_step,
    );
    let mut app_logic = MyAppLogic::new(
        controller,
        config_manager,
        Arc::new(CoreFileRevealer::new()),
        settings,
        initial_directory,
    );

    let window_id = platform.create_window(&WindowConfig {
        title: APP_TITLE,
        width: 800,
        height: 600,
    })?;
    platform.execute_commands(build_main_window_static_layout(window_id));
    platform.run(&mut app_logic)
}

fn main() -> ExitCode {
    let options = match parse_launch_args(std::env::args().skip(1)) {
        Ok(LaunchCommand::Run(options)) => options,
        Ok(LaunchCommand::ShowHelp) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    initialize_logging_with_level(level);

    match run_app(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Main: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initialize_logging_installs_the_test_logger_once() {
        initialize_logging();
        initialize_logging_with_level(LevelFilter::Info);

        assert!(LOGGING_INIT.is_completed());
        assert_eq!(log::max_level(), LevelFilter::Debug);
        log::debug!("Main: Test logger is active.");
    }

    #[test]
    fn test_parse_launch_args_defaults() {
        assert_eq!(
            parse_launch_args(args(&[])),
            Ok(LaunchCommand::Run(LaunchOptions::default()))
        );
    }

    #[test]
    fn test_parse_launch_args_dir_and_verbose() {
        assert_eq!(
            parse_launch_args(args(&["--verbose", "--dir", "~/notes"])),
            Ok(LaunchCommand::Run(LaunchOptions {
                verbose: true,
                directory: Some("~/notes".to_string()),
            }))
        );
    }

    #[test]
    fn test_parse_launch_args_help_wins() {
        assert_eq!(
            parse_launch_args(args(&["--verbose", "--help", "--bogus"])),
            Ok(LaunchCommand::ShowHelp)
        );
    }

    #[test]
    fn test_parse_launch_args_rejects_bad_input() {
        assert!(parse_launch_args(args(&["--dir"])).is_err());
        assert!(parse_launch_args(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn test_build_search_backend_parallel_runs_a_search() {
        // Arrange
        initialize_logging();
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("Report.TXT")).unwrap();
        std::fs::File::create(dir.path().join("notes.md")).unwrap();
        let backend = build_search_backend(
            BackendKind::Parallel,
            Arc::new(CoreFileEnumerator::default()),
        );
        let request = crate::core::SearchRequest::new("report", dir.path(), Some("txt"));

        // Act
        let results = backend
            .run(&request, &|| false, &mut |_: f64| {})
            .unwrap();

        // Assert
        assert_eq!(results.len(), 1);
        assert!(results[0].path.ends_with("Report.TXT"));
    }
}
