//! Data directory resolution
//!
//! History, logs, reports and archives live under `~/.mesh_analyzer`.
//! Scans usually need root, so when the analyzer runs under `sudo` the
//! directory is placed in the invoking user's home and every file created
//! there is handed back to that user.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DATA_DIR_NAME: &str = ".mesh_analyzer";

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine home directory")]
    NoHomeDir,
    #[error("Failed to create {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
}

/// Numeric owner applied to files created on behalf of a sudo user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

/// The user who invoked `sudo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudoUser {
    pub home: PathBuf,
    pub owner: Owner,
}

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    owner: Option<Owner>,
}

impl DataDir {
    /// Use `root` as-is with no ownership changes
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            owner: None,
        }
    }

    /// Resolve the data directory for the current process
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, PathError> {
        Self::resolve_with(override_dir, dirs::home_dir(), |key| env::var(key), lookup_sudo_user)
    }

    /// Resolve using custom environment and user lookups (for testing)
    pub fn resolve_with<F, L>(
        override_dir: Option<&Path>,
        home: Option<PathBuf>,
        get_var: F,
        lookup_user: L,
    ) -> Result<Self, PathError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
        L: Fn(&str) -> Option<SudoUser>,
    {
        let sudo = get_var("SUDO_USER")
            .ok()
            .filter(|name| !name.is_empty() && name != "root")
            .and_then(|name| lookup_user(&name));

        let root = match (override_dir, &sudo) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(user)) => user.home.join(DATA_DIR_NAME),
            (None, None) => home.ok_or(PathError::NoHomeDir)?.join(DATA_DIR_NAME),
        };

        debug!("Data directory: {}", root.display());
        Ok(Self {
            root,
            owner: sudo.map(|user| user.owner),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Create the directory tree
    pub fn ensure(&self) -> Result<(), PathError> {
        for dir in [self.root.clone(), self.logs_dir(), self.reports_dir()] {
            fs::create_dir_all(&dir).map_err(|source| PathError::Create {
                path: dir.clone(),
                source,
            })?;
            self.hand_over(&dir);
        }
        Ok(())
    }

    /// Give `path` to the sudo user, if there is one
    pub fn hand_over(&self, path: &Path) {
        let Some(owner) = self.owner else {
            return;
        };
        if let Err(e) = chown(path, owner) {
            warn!("Could not change owner of {}: {}", path.display(), e);
        }
    }
}

#[cfg(unix)]
fn chown(path: &Path, owner: Owner) -> Result<(), nix::Error> {
    use nix::unistd::{Gid, Uid};
    nix::unistd::chown(
        path,
        Some(Uid::from_raw(owner.uid)),
        Some(Gid::from_raw(owner.gid)),
    )
}

#[cfg(not(unix))]
fn chown(_path: &Path, _owner: Owner) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(unix)]
fn lookup_sudo_user(name: &str) -> Option<SudoUser> {
    use nix::unistd::{geteuid, User};

    if !geteuid().is_root() {
        return None;
    }
    match User::from_name(name) {
        Ok(Some(user)) => Some(SudoUser {
            home: user.dir,
            owner: Owner {
                uid: user.uid.as_raw(),
                gid: user.gid.as_raw(),
            },
        }),
        Ok(None) => {
            warn!("SUDO_USER {} not found in user database", name);
            None
        }
        Err(e) => {
            warn!("Failed to look up SUDO_USER {}: {}", name, e);
            None
        }
    }
}

#[cfg(not(unix))]
fn lookup_sudo_user(_name: &str) -> Option<SudoUser> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn make_getter(
        vars: HashMap<String, String>,
    ) -> impl Fn(&str) -> Result<String, env::VarError> {
        move |key: &str| vars.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    fn alice(_name: &str) -> Option<SudoUser> {
        Some(SudoUser {
            home: PathBuf::from("/home/alice"),
            owner: Owner {
                uid: 1000,
                gid: 1000,
            },
        })
    }

    #[test]
    fn test_resolve_plain_home() {
        let dir = DataDir::resolve_with(
            None,
            Some(PathBuf::from("/home/bob")),
            make_getter(HashMap::new()),
            alice,
        )
        .unwrap();
        assert_eq!(dir.root(), Path::new("/home/bob/.mesh_analyzer"));
        assert!(dir.owner().is_none());
    }

    #[test]
    fn test_resolve_under_sudo() {
        let mut vars = HashMap::new();
        vars.insert("SUDO_USER".to_string(), "alice".to_string());

        let dir = DataDir::resolve_with(
            None,
            Some(PathBuf::from("/root")),
            make_getter(vars),
            alice,
        )
        .unwrap();
        assert_eq!(dir.root(), Path::new("/home/alice/.mesh_analyzer"));
        assert_eq!(dir.owner(), Some(Owner { uid: 1000, gid: 1000 }));
    }

    #[test]
    fn test_sudo_root_is_ignored() {
        let mut vars = HashMap::new();
        vars.insert("SUDO_USER".to_string(), "root".to_string());

        let dir = DataDir::resolve_with(
            None,
            Some(PathBuf::from("/root")),
            make_getter(vars),
            alice,
        )
        .unwrap();
        assert_eq!(dir.root(), Path::new("/root/.mesh_analyzer"));
        assert!(dir.owner().is_none());
    }

    #[test]
    fn test_override_wins() {
        let dir = DataDir::resolve_with(
            Some(Path::new("/srv/mesh")),
            None,
            make_getter(HashMap::new()),
            alice,
        )
        .unwrap();
        assert_eq!(dir.root(), Path::new("/srv/mesh"));
    }

    #[test]
    fn test_no_home() {
        let result = DataDir::resolve_with(None, None, make_getter(HashMap::new()), alice);
        assert!(matches!(result, Err(PathError::NoHomeDir)));
    }

    #[test]
    fn test_ensure_creates_tree() {
        let tmp = TempDir::new().unwrap();
        let dir = DataDir::at(tmp.path().join("data"));
        dir.ensure().unwrap();
        assert!(dir.logs_dir().is_dir());
        assert!(dir.reports_dir().is_dir());
    }
}
