/*
 * Shows a search result in the platform's file manager. The presenter calls
 * this when the user activates a result row; failures are reported back as a
 * status message and never affect the search session.
 */
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug)]
pub enum RevealError {
    NotFound(PathBuf),
    Io(io::Error),
}

impl From<io::Error> for RevealError {
    fn from(err: io::Error) -> Self {
        RevealError::Io(err)
    }
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealError::NotFound(path) => write!(f, "File no longer exists: {}", path.display()),
            RevealError::Io(e) => write!(f, "Could not open file manager: {e}"),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::Io(e) => Some(e),
            RevealError::NotFound(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RevealError>;

pub trait FileRevealOperations: Send + Sync {
    fn reveal(&self, path: &Path) -> Result<()>;
}

pub struct CoreFileRevealer {}

impl CoreFileRevealer {
    pub fn new() -> Self {
        CoreFileRevealer {}
    }
}

impl Default for CoreFileRevealer {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Builds the command that selects `path` in the file manager. On platforms
 * without a "select" verb the parent directory is opened instead.
 */
pub fn reveal_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("explorer");
        command.arg("/select,").arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg("-R").arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path.parent().unwrap_or(path));
        command
    }
}

impl FileRevealOperations for CoreFileRevealer {
    fn reveal(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            log::debug!("CoreFileRevealer: {path:?} is gone.");
            return Err(RevealError::NotFound(path.to_path_buf()));
        }
        let mut command = reveal_command(path);
        log::debug!("CoreFileRevealer: Running {command:?}");
        // The file manager outlives us; the child is not waited on.
        command.spawn()?;
        Ok(())
    }
}
