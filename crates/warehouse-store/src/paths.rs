use std::fs;
use std::path::PathBuf;

use tracing::warn;

use warehouse_types::Tier;

/// Directory segment appended to every tier base directory.
pub const NAMESPACE: &str = "warehouse";

/// Supplies the platform root directory for each retention tier.
///
/// Injected at `Warehouse` construction rather than looked up through a
/// global, so tests and embedders can point the store at any directory.
pub trait PathProvider: Send + Sync {
    /// The tier's base directory, without the namespace segment.
    fn base_dir(&self, tier: Tier) -> PathBuf;
}

/// Platform-provided locations: the user's documents directory for
/// [`Tier::Permanent`], the purgeable cache directory for
/// [`Tier::Volatile`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformPaths;

impl PathProvider for PlatformPaths {
    fn base_dir(&self, tier: Tier) -> PathBuf {
        match tier {
            Tier::Permanent => dirs::document_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            Tier::Volatile => dirs::cache_dir().unwrap_or_else(std::env::temp_dir),
        }
    }
}

/// Fixed root with one subdirectory per tier (`<root>/permanent`,
/// `<root>/volatile`). Used by tests over temporary directories and by the
/// CLI's `--root` flag.
#[derive(Clone, Debug)]
pub struct FixedPaths {
    root: PathBuf,
}

impl FixedPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathProvider for FixedPaths {
    fn base_dir(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.to_string())
    }
}

/// The tier's namespace directory, created (with parents) if missing.
///
/// Creation is idempotent; failures are logged and otherwise ignored, and
/// the subsequent file operation surfaces its own error.
pub fn tier_dir(provider: &dyn PathProvider, tier: Tier) -> PathBuf {
    let dir = provider.base_dir(tier).join(NAMESPACE);
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!(dir = %dir.display(), error = %e, "failed to create tier directory");
    }
    dir
}

/// The file backing `key` in `tier`: `<base>/<namespace>/<key>`.
///
/// The key is used verbatim as a file name — no escaping or sanitization.
/// Callers are responsible for supplying filesystem-safe keys.
pub fn entry_path(provider: &dyn PathProvider, tier: Tier, key: &str) -> PathBuf {
    tier_dir(provider, tier).join(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_paths_split_by_tier() {
        let paths = FixedPaths::new("/data/store");
        assert_eq!(
            paths.base_dir(Tier::Permanent),
            PathBuf::from("/data/store/permanent")
        );
        assert_eq!(
            paths.base_dir(Tier::Volatile),
            PathBuf::from("/data/store/volatile")
        );
    }

    #[test]
    fn tier_dir_creates_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let paths = FixedPaths::new(dir.path());
        let created = tier_dir(&paths, Tier::Volatile);
        assert!(created.ends_with(format!("volatile/{NAMESPACE}")));
        assert!(created.is_dir());
        // Idempotent.
        assert_eq!(tier_dir(&paths, Tier::Volatile), created);
    }

    #[test]
    fn entry_path_appends_key_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let paths = FixedPaths::new(dir.path());
        let path = entry_path(&paths, Tier::Permanent, "user-profile");
        assert!(path.ends_with(format!("permanent/{NAMESPACE}/user-profile")));
    }

    #[test]
    fn platform_paths_always_resolve() {
        let paths = PlatformPaths;
        for tier in Tier::ALL {
            assert!(!paths.base_dir(tier).as_os_str().is_empty());
        }
    }
}
