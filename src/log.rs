//! File-based logging for debugging
//!
//! The `log!` macro forwards to `tracing`; `init` installs a subscriber that
//! writes to a file next to the executable.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

#[doc(hidden)]
pub use tracing;

/// Log a formatted message
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::tracing::debug!($($arg)*)
    };
}

/// Get the directory where the executable is located
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .unwrap_or_else(|_| PathBuf::from("explorerbar"))
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Initialize logging to a file next to the executable
pub fn init() -> bool {
    init_with_path(&exe_dir().join("explorerbar.log"))
}

/// Initialize logging to the given file.
///
/// Returns false if the file could not be opened or a global subscriber is
/// already installed.
pub fn init_with_path(path: &Path) -> bool {
    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        Ok(file) => file,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        log!("=== Explorerbar Log Started ===");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exe_dir_is_a_directory_path() {
        let dir = exe_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_init_writes_banner_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorerbar.log");

        assert!(init_with_path(&path));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Explorerbar Log Started"));

        // A subscriber is already installed
        assert!(!init_with_path(&dir.path().join("second.log")));
    }

    #[test]
    fn test_init_with_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a log file
        assert!(!init_with_path(dir.path()));
    }
}
