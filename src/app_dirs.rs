use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Well-known location of the persisted session
    pub fn session_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("termquiz")
                .join("session.json")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "termquiz") {
            proj_dirs.data_local_dir().join("session.json")
        } else {
            PathBuf::from("session.json")
        }
    }
}
