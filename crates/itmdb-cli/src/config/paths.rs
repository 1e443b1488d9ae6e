//! Config file location.
//!
//! Follows the XDG base directory layout: `$XDG_CONFIG_HOME/itmdb` when set
//! to an absolute path, otherwise `$HOME/.config/itmdb`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory name under the config base.
const APP_DIR: &str = "itmdb";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// `--dir` wins; otherwise the XDG location is derived from the environment.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable (when
/// `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    config_path_from_env(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// Derives the config path from `XDG_CONFIG_HOME` and `HOME` values.
///
/// A relative or empty `XDG_CONFIG_HOME` is ignored, as the XDG spec
/// requires.
fn config_path_from_env(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    let xdg = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute());
    let base = match (xdg, home.filter(|h| !h.is_empty())) {
        (Some(xdg), _) => xdg,
        (None, Some(home)) => Path::new(&home).join(".config"),
        (None, None) => bail!("neither XDG_CONFIG_HOME nor HOME is set"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}
