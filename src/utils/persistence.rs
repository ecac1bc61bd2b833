use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ConfigError;

const TMP_SUFFIX: &str = "tmp";

/// Writes `value` as pretty JSON by staging to a sibling temp file and renaming it into place.
pub fn save_json_atomic<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a JSON document from disk, returning structured errors on failure.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        let path = Path::new("/tmp/finmate/engine.json");
        assert_eq!(tmp_path(path), PathBuf::from("/tmp/finmate/engine.json.tmp"));
    }

    #[test]
    fn save_then_load_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("doc.json");
        save_json_atomic(&vec![1u32, 2, 3], &path).expect("save");
        let loaded: Vec<u32> = load_json(&path).expect("load");
        assert_eq!(loaded, vec![1, 2, 3]);
        assert!(!tmp_path(&path).exists());
    }
}
