// Spacemarks platform paths for Linux
// Config: ~/.config/spacemarks
// Data:   ~/.local/share/spacemarks

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "spacemarks";

fn resolve(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    match xdg.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir).join(APP_DIR),
        None => {
            let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
            for part in fallback {
                path.push(part);
            }
            path.join(APP_DIR)
        }
    }
}

/// `$XDG_CONFIG_HOME/spacemarks` if set, otherwise `~/.config/spacemarks`.
pub fn get_config_dir() -> PathBuf {
    resolve(
        env::var("XDG_CONFIG_HOME").ok(),
        env::var("HOME").ok(),
        &[".config"],
    )
}

/// `$XDG_DATA_HOME/spacemarks` if set, otherwise `~/.local/share/spacemarks`.
pub fn get_data_dir() -> PathBuf {
    resolve(
        env::var("XDG_DATA_HOME").ok(),
        env::var("HOME").ok(),
        &[".local", "share"],
    )
}
