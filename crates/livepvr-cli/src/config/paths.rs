//! Where `livepvr` looks for its config file.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the user config base.
const APP_DIR: &str = "livepvr";

/// Returns the config file path.
///
/// An explicit `--dir` wins. Otherwise the file lives in
/// `$XDG_CONFIG_HOME/livepvr/`, or `$HOME/.config/livepvr/` when
/// `XDG_CONFIG_HOME` is unset or empty.
///
/// # Errors
///
/// Returns an error if no `--dir` was given and neither variable is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.join(CONFIG_FILE)),
        None => config_base(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"))
            .map(|base| base.join(APP_DIR).join(CONFIG_FILE)),
    }
}

/// Picks the user config base directory from the environment values.
fn config_base(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg));
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(Path::new(&home).join(".config")),
        None => bail!("cannot locate the config file: set HOME or XDG_CONFIG_HOME, or pass --dir"),
    }
}
