use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Serialize;

/// Create a directory and its parents; succeeds if it already exists
pub fn ensure_dir(path: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// List the files directly inside `dir` with the given extension, sorted by path
pub fn find_files_with_extension(dir: impl AsRef<Path>, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }

    files.sort();

    Ok(files)
}

/// Resolve a relative path against the current working directory
pub fn absolute(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();

    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Write a value to a file as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;

    fs::write(path, json)
}

/// A fresh, uniquely named directory under the system temp dir
#[cfg(test)]
pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("text-clf-{prefix}-{:016x}", rand::random::<u64>()));
    fs::create_dir_all(&dir).expect("Unable to create temp dir");

    dir
}
