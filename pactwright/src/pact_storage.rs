use std::{
    fmt::Debug,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Whole-file access to where pact documents live.
pub trait PactStorage: Debug {
    /// Returns `None` when nothing is stored at `path` yet.
    fn read(&self, path: &Path) -> Result<Option<String>, io::Error>;
    /// Replaces the content at `path` completely or not at all.
    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilePactStorage;

impl FilePactStorage {
    pub fn new() -> Self {
        Self
    }

    fn temporary_path(path: &Path) -> PathBuf {
        let mut file_name = path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".tmp");
        path.with_file_name(file_name)
    }
}

impl PactStorage for FilePactStorage {
    fn read(&self, path: &Path) -> Result<Option<String>, io::Error> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temporary_path = Self::temporary_path(path);
        let result = File::create(&temporary_path).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });

        if let Err(e) = result.and_then(|_| fs::rename(&temporary_path, path)) {
            let _ = fs::remove_file(&temporary_path);
            return Err(e);
        }

        Ok(())
    }
}
