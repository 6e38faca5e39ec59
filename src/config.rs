use std::path::{Path, PathBuf};

use crate::labels::Locale;
use crate::ordering::ReorderScope;
use crate::settings::PREFS_NAMESPACE;

/// Runtime configuration for [`crate::AnjezServerHandler`]
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Task data file; `None` keeps everything in memory
    pub data_file: Option<PathBuf>,
    /// Preferences file; defaults to `anjez_prefs.toml` next to the data file
    pub prefs_file: Option<PathBuf>,
    /// Commit every save when the data file is inside a git work tree
    pub sync_git: bool,
    pub locale: Locale,
    pub reorder_scope: ReorderScope,
}

impl AppConfig {
    pub fn new(data_file: impl AsRef<Path>) -> Self {
        Self {
            data_file: Some(data_file.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Explicit preferences path, or the namespace file beside the data file
    pub fn prefs_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.prefs_file {
            return Some(path.clone());
        }
        self.data_file
            .as_ref()
            .map(|data| data.with_file_name(format!("{}.toml", PREFS_NAMESPACE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_path_defaults_next_to_data_file() {
        let config = AppConfig::new("/tmp/anjez/tasks.toml");
        assert_eq!(
            config.prefs_path(),
            Some(PathBuf::from("/tmp/anjez/anjez_prefs.toml"))
        );
        assert_eq!(AppConfig::in_memory().prefs_path(), None);

        let explicit = AppConfig {
            prefs_file: Some(PathBuf::from("/etc/prefs.toml")),
            ..AppConfig::new("tasks.toml")
        };
        assert_eq!(explicit.prefs_path(), Some(PathBuf::from("/etc/prefs.toml")));
    }
}
