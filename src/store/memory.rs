use std::collections::HashMap;
use std::sync::Mutex;

use crate::foundation::core::SessionId;
use crate::foundation::error::{StripError, StripResult};
use crate::store::record::{PhotoRecord, PhotoStore, sort_records};

/// Process-local [`PhotoStore`].
#[derive(Debug, Default)]
pub struct InMemoryPhotoStore {
    records: Mutex<HashMap<SessionId, Vec<PhotoRecord>>>,
    fail_saves: Option<String>,
}

impl InMemoryPhotoStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose `save` always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_saves: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl PhotoStore for InMemoryPhotoStore {
    fn save(&self, record: &PhotoRecord) -> StripResult<()> {
        if let Some(reason) = &self.fail_saves {
            return Err(StripError::store(format!(
                "save '{}' rejected: {reason}",
                record.id
            )));
        }
        let mut records = self
            .records
            .lock()
            .map_err(|_| StripError::store("in-memory store poisoned"))?;
        let list = records.entry(record.session.clone()).or_default();
        match list.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => list.push(record.clone()),
        }
        Ok(())
    }

    fn list(&self, session: &SessionId) -> StripResult<Vec<PhotoRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| StripError::store("in-memory store poisoned"))?;
        let mut out = records.get(session).cloned().unwrap_or_default();
        sort_records(&mut out);
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
