use std::path::{Path, PathBuf};

use crate::foundation::core::SessionId;
use crate::foundation::error::{StripError, StripResult};
use crate::store::record::{PhotoRecord, PhotoStore, sort_records};

/// [`PhotoStore`] on the filesystem: one directory per session holding `<id>.json` metadata and
/// the encoded image next to it.
#[derive(Clone, Debug)]
pub struct DirPhotoStore {
    root: PathBuf,
}

impl DirPhotoStore {
    /// Store rooted at `root`; directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, session: &SessionId) -> StripResult<PathBuf> {
        Ok(self.root.join(path_component("session", session.as_str())?))
    }
}

/// Ids must be a single plain path component.
fn path_component<'a>(kind: &str, name: &'a str) -> StripResult<&'a str> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(StripError::store(format!(
            "{kind} id '{name}' is not a valid file name"
        )));
    }
    Ok(name)
}

fn store_err(action: &str, path: &Path, e: impl std::fmt::Display) -> StripError {
    StripError::store(format!("{action} '{}': {e}", path.display()))
}

impl PhotoStore for DirPhotoStore {
    #[tracing::instrument(level = "debug", skip_all, fields(id = %record.id))]
    fn save(&self, record: &PhotoRecord) -> StripResult<()> {
        let dir = self.session_dir(&record.session)?;
        let id = path_component("photo", record.id.as_str())?;
        std::fs::create_dir_all(&dir).map_err(|e| store_err("create", &dir, e))?;
        let image_path = dir.join(format!("{id}.{}", record.image_extension()));
        std::fs::write(&image_path, &record.image).map_err(|e| store_err("write", &image_path, e))?;
        let json_path = dir.join(format!("{id}.json"));
        std::fs::write(&json_path, record.to_json()?).map_err(|e| store_err("write", &json_path, e))?;
        Ok(())
    }

    fn list(&self, session: &SessionId) -> StripResult<Vec<PhotoRecord>> {
        let dir = self.session_dir(session)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| store_err("read", &dir, e))?;
        let mut out = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| store_err("read", &dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = std::fs::read_to_string(&path).map_err(|e| store_err("read", &path, e))?;
            let mut record = PhotoRecord::from_json(&json)?;
            let image_path = path.with_extension(record.image_extension());
            record.image = std::fs::read(&image_path).map_err(|e| store_err("read", &image_path, e))?;
            out.push(record);
        }
        sort_records(&mut out);
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/dir.rs"]
mod tests;
