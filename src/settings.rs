//! App-lock preference and the biometric capability it guards with
//!
//! The lock is only an entry guard for a user interface; nothing in the
//! store or repository consults it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::storage::write_atomically;

/// Fixed namespace the preferences are stored under
pub const PREFS_NAMESPACE: &str = "anjez_prefs";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub app_lock_enabled: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PreferencesFile {
    #[serde(rename = "anjez_prefs")]
    prefs: Preferences,
}

/// Biometric (or device credential) authentication
pub trait BiometricAuth: Send + Sync {
    fn is_available(&self) -> bool;

    /// Prompt the user; `true` on successful authentication
    fn request_auth(&self) -> bool;
}

/// Headless environments have no biometric hardware
pub struct NoBiometrics;

impl BiometricAuth for NoBiometrics {
    fn is_available(&self) -> bool {
        false
    }

    fn request_auth(&self) -> bool {
        false
    }
}

/// Preferences persisted as a small TOML file
pub struct PreferenceStore {
    path: Option<PathBuf>,
    cached: Mutex<Option<Preferences>>,
}

impl PreferenceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            cached: Mutex::new(None),
        }
    }

    pub fn memory() -> Self {
        Self {
            path: None,
            cached: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> StoreResult<Preferences> {
        let mut cached = self.cached.lock().await;
        if let Some(prefs) = *cached {
            return Ok(prefs);
        }
        let prefs = match &self.path {
            Some(path) if tokio::fs::try_exists(path).await? => {
                let content = tokio::fs::read_to_string(path).await?;
                toml::from_str::<PreferencesFile>(&content)?.prefs
            }
            _ => Preferences::default(),
        };
        *cached = Some(prefs);
        Ok(prefs)
    }

    pub async fn save(&self, prefs: Preferences) -> StoreResult<()> {
        let mut cached = self.cached.lock().await;
        if let Some(path) = &self.path {
            let content = toml::to_string_pretty(&PreferencesFile { prefs })?;
            write_atomically(path, content.as_bytes()).await?;
        }
        *cached = Some(prefs);
        Ok(())
    }

    pub async fn is_app_lock_enabled(&self) -> StoreResult<bool> {
        Ok(self.load().await?.app_lock_enabled)
    }

    pub async fn set_app_lock_enabled(&self, enabled: bool) -> StoreResult<()> {
        let mut prefs = self.load().await?;
        prefs.app_lock_enabled = enabled;
        self.save(prefs).await?;
        tracing::info!(enabled, "app lock preference changed");
        Ok(())
    }
}

/// Entry guard combining the preference with an authenticator
pub struct AppLock<'a> {
    prefs: &'a PreferenceStore,
}

impl<'a> AppLock<'a> {
    pub fn new(prefs: &'a PreferenceStore) -> Self {
        Self { prefs }
    }

    /// `true` when the app may be entered
    ///
    /// With the lock disabled this never prompts. With it enabled, entry
    /// requires available hardware and a successful prompt.
    pub async fn unlock(&self, auth: &dyn BiometricAuth) -> StoreResult<bool> {
        if !self.prefs.is_app_lock_enabled().await? {
            return Ok(true);
        }
        if !auth.is_available() {
            tracing::warn!("app lock enabled but biometric authentication is unavailable");
            return Ok(false);
        }
        Ok(auth.request_auth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FakeAuth {
        available: bool,
        accept: bool,
    }

    impl BiometricAuth for FakeAuth {
        fn is_available(&self) -> bool {
            self.available
        }

        fn request_auth(&self) -> bool {
            self.accept
        }
    }

    #[tokio::test]
    async fn test_lock_disabled_by_default() {
        let prefs = PreferenceStore::memory();
        assert!(!prefs.is_app_lock_enabled().await.unwrap());
        assert!(AppLock::new(&prefs).unlock(&NoBiometrics).await.unwrap());
    }

    #[tokio::test]
    async fn test_enabled_lock_requires_auth() {
        let prefs = PreferenceStore::memory();
        prefs.set_app_lock_enabled(true).await.unwrap();
        let lock = AppLock::new(&prefs);

        assert!(!lock.unlock(&NoBiometrics).await.unwrap());
        let rejected = FakeAuth {
            available: true,
            accept: false,
        };
        assert!(!lock.unlock(&rejected).await.unwrap());
        let accepted = FakeAuth {
            available: true,
            accept: true,
        };
        assert!(lock.unlock(&accepted).await.unwrap());
    }

    #[tokio::test]
    async fn test_preference_persists_under_namespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");

        PreferenceStore::new(&path)
            .set_app_lock_enabled(true)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(&format!("[{}]", PREFS_NAMESPACE)));
        assert!(content.contains("app_lock_enabled = true"));

        let reopened = PreferenceStore::new(&path);
        assert!(reopened.is_app_lock_enabled().await.unwrap());
    }
}
