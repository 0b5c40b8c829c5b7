use delve_core::ScoreTable;
use delve_core::scores::STORAGE_KEY;
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "Delve").map(|proj_dirs| {
        let mut path = proj_dirs.data_dir().to_path_buf();
        path.push(format!("{STORAGE_KEY}.json"));
        path
    })
}

pub fn write_atomic(table: &ScoreTable, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = table.to_json().map_err(io::Error::other)?;

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// A missing file is an empty table; a malformed one is an error.
pub fn load(path: &Path) -> io::Result<ScoreTable> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(ScoreTable::new()),
        Err(err) => return Err(err),
    };
    ScoreTable::from_json(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
