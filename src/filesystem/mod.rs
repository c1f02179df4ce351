/// Host filesystem access used by mount and listing commands

/// Local directory implementation
pub mod local;

pub use local::LocalFs;

use std::io;
use std::path::{Path, PathBuf};

/// Host-side directory the server browses and mounts images from
///
/// The working directory belongs to the implementation rather than the
/// process, so each connection can carry its own.
pub trait HostFs {
    /// Current working directory
    fn current_dir(&self) -> &Path;

    /// Change the working directory, relative paths resolve against the
    /// current one. On failure the current directory is left unchanged.
    fn change_dir(&mut self, path: &str) -> io::Result<PathBuf>;

    /// Names of the entries in the working directory
    fn entries(&self) -> io::Result<Vec<String>>;

    /// Whether an entry of the working directory is a directory
    /// (symlinks are followed)
    fn is_dir(&self, name: &str) -> io::Result<bool>;

    /// Resolve a name against the working directory
    fn resolve(&self, name: &str) -> PathBuf {
        self.current_dir().join(name)
    }
}
