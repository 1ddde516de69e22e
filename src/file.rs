// src/file.rs

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn normalize_dir_path(p: &str) -> PathBuf {
    PathBuf::from(normalize_separators(p.trim()))
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "Path exists but is not a directory: {}", dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// First free name in `dir`:
/// "<stem>.<ext>", then "<stem> (2).<ext>", "<stem> (3).<ext>", …
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let first = dir.join(file_name);
    if !first.exists() { return first; }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, join!(".", e)),
        _ => (file_name, s!()),
    };
    let mut n = 2;
    loop {
        let candidate = dir.join(format!("{stem} ({n}){ext}"));
        if !candidate.exists() { return candidate; }
        n += 1;
    }
}

/// A file being written. Removed on drop unless `commit` renamed it into place.
pub struct PartialFile {
    tmp: PathBuf,
    done: bool,
}

impl PartialFile {
    pub fn create(target: &Path) -> io::Result<(Self, File)> {
        let mut tmp = target.as_os_str().to_owned();
        tmp.push(".part");
        let tmp = PathBuf::from(tmp);
        let file = File::create(&tmp)?;
        Ok((Self { tmp, done: false }, file))
    }

    pub fn commit(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.tmp, target)?;
        self.done = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.done {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Write `bytes` into `dir` under the first free variant of `file_name`.
/// Nothing is left behind on failure.
pub fn save_bytes(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    ensure_directory(dir)?;
    let target = unique_path(dir, file_name);

    let (guard, mut file) = PartialFile::create(&target)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    guard.commit(&target)?;

    Ok(target)
}
