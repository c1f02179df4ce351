/// Local filesystem implementation of [`HostFs`]

use crate::filesystem::HostFs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Host filesystem rooted at a working directory of its own
#[derive(Debug, Clone)]
pub struct LocalFs {
    cwd: PathBuf,
}

impl LocalFs {
    /// Start in `dir`, which must be an existing directory
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let cwd = fs::canonicalize(dir)?;
        if !fs::metadata(&cwd)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", cwd.display()),
            ));
        }
        Ok(Self { cwd })
    }

    /// Start in the process working directory
    pub fn from_process_dir() -> io::Result<Self> {
        Self::new(std::env::current_dir()?)
    }
}

impl HostFs for LocalFs {
    fn current_dir(&self) -> &Path {
        &self.cwd
    }

    fn change_dir(&mut self, path: &str) -> io::Result<PathBuf> {
        if path.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "empty directory name"));
        }
        let target = fs::canonicalize(self.cwd.join(path))?;
        if !fs::metadata(&target)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", target.display()),
            ));
        }
        self.cwd = target;
        Ok(self.cwd.clone())
    }

    fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(&self.cwd)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn is_dir(&self, name: &str) -> io::Result<bool> {
        Ok(fs::metadata(self.cwd.join(name))?.is_dir())
    }
}
