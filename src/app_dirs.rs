use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for log files, under `$HOME/.local/state/trainclock` when
    /// HOME is set
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("trainclock"),
            )
        } else {
            ProjectDirs::from("", "", "trainclock")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
