use std::path::PathBuf;

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::constants::{APP_DIR_NAME, CAPTURES_DIR_NAME};

/// App-writable directory that capture filenames are resolved against.
///
/// - macOS: `~/Library/Application Support/AR Capture/captures/`
/// - Linux: `$XDG_DATA_HOME/AR Capture/captures/` or `~/.local/share/AR Capture/captures/`
/// - Windows: `%APPDATA%/AR Capture/captures/`
pub fn default_output_dir() -> Result<PathBuf, CaptureError> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME).join(CAPTURES_DIR_NAME))
        .ok_or(CaptureError::NoDataDir)
}
