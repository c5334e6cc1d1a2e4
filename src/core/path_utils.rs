/*
 * Path helpers shared by the configuration layer and the presenter: locating
 * the per-user configuration directory and turning user-typed directory text
 * into a path the search can start from.
 */
use directories::{BaseDirs, ProjectDirs};
use std::fs;
use std::path::{Path, PathBuf};

/*
 * Retrieves the application's local (non-roaming) configuration directory,
 * creating it if needed. The path is derived without an organization
 * qualifier.
 *
 * Returns `None` if the platform offers no such directory or it could not be
 * created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config local dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: Failed to create config directory {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config directory {config_path:?}");
    }
    Some(config_path.to_path_buf())
}

/* Replaces a leading `~` with the user's home directory, when one is known. */
pub fn expand_user_path(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };
    match BaseDirs::new() {
        Some(base) => base
            .home_dir()
            .join(rest.trim_start_matches(['/', '\\'])),
        None => {
            log::debug!("PathUtils: No home directory known; keeping '{raw}' as typed.");
            PathBuf::from(raw)
        }
    }
}

/*
 * Interprets directory text entered by the user. Blank input means
 * `current_dir`; relative paths are taken relative to it. The result is not
 * checked for existence, which is the search's job.
 */
pub fn resolve_search_root(raw: &str, current_dir: &Path) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return current_dir.to_path_buf();
    }
    let expanded = expand_user_path(trimmed);
    if expanded.is_absolute() {
        expanded
    } else {
        current_dir.join(expanded)
    }
}
