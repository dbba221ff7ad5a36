// Spacemarks platform abstraction
// Resolves per-OS configuration and data directories.
//
// Uses `cfg(target_os)` to select the implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod linux;

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/spacemarks` (or `$XDG_CONFIG_HOME/spacemarks`)
/// - **macOS**: `~/Library/Application Support/Spacemarks`
/// - **Windows**: `%APPDATA%/Spacemarks`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        linux::get_config_dir()
    }
}

/// Returns the platform-specific data directory, where the database lives.
///
/// - **Linux**: `~/.local/share/spacemarks` (or `$XDG_DATA_HOME/spacemarks`)
/// - **macOS**: `~/Library/Application Support/Spacemarks`
/// - **Windows**: `%APPDATA%/Spacemarks`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        linux::get_data_dir()
    }
}
