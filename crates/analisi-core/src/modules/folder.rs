use super::traits::RetrievedFolder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Retrieved files living in a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFolder {
    root: PathBuf,
}

impl DirectoryFolder {
    /// Returns `None` when `root` is not an existing directory.
    pub fn open_existing(root: impl Into<PathBuf>) -> Option<Self> {
        let root = root.into();
        root.is_dir().then_some(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RetrievedFolder for DirectoryFolder {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let relative = Path::new(name);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' is not a path inside the retrieved folder"),
            ));
        }

        let file = File::open(self.root.join(relative))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
