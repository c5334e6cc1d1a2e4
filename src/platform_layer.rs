/*
 * The platform layer owns the front end: it turns user input into `AppEvent`s
 * and executes the `PlatformCommand`s the application logic queues. The only
 * implementation is a terminal front end (`console`).
 */
pub mod console;
pub mod error;
pub mod types;

pub use console::ConsolePlatform;
pub use error::Result as PlatformResult;
pub use types::{
    AppEvent, MessageSeverity, PlatformCommand, PlatformEventHandler, WindowConfig, WindowId,
};
