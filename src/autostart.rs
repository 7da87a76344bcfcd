//! XDG autostart entry for launching the daemon at login.

use log::{debug, info};
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "hyprmover.desktop";

/// Error from writing the autostart entry.
#[derive(Debug, thiserror::Error)]
#[error("autostart error: {0}")]
pub struct AutostartError(String);

/// `$XDG_CONFIG_HOME/autostart`, falling back to `$HOME/.config/autostart`.
pub fn autostart_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("autostart")
}

fn desktop_entry(exec: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=hyprmover\n\
         Comment=Keyboard-driven window mover and resizer\n\
         Exec={}\n\
         Terminal=false\n\
         X-GNOME-Autostart-enabled=true\n",
        exec.display()
    )
}

/// Write `hyprmover.desktop` into `dir` so that `exec` starts at login.
///
/// The file is only rewritten when its content would change. Returns the
/// path of the entry.
pub fn install(dir: &Path, exec: &Path) -> Result<PathBuf, AutostartError> {
    let path = dir.join(FILE_NAME);
    let entry = desktop_entry(exec);

    if std::fs::read_to_string(&path).is_ok_and(|current| current == entry) {
        debug!("autostart entry {} is up to date", path.display());
        return Ok(path);
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| AutostartError(format!("create {}: {}", dir.display(), e)))?;
    std::fs::write(&path, entry)
        .map_err(|e| AutostartError(format!("write {}: {}", path.display(), e)))?;
    info!("installed autostart entry {}", path.display());
    Ok(path)
}
