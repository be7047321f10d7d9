use indexmap::IndexMap;
use serde_json::Value;

pub use crate::constants::metadata::{
    META_CORPUS_CREATOR, META_QUARTER, META_RECORD_COUNT, META_SOURCE_ID, META_SOURCE_ROOT,
};

/// Ordered provenance metadata describing a corpus pipeline.
pub type Metadata = IndexMap<String, Value>;

/// Canonical identifier for metadata fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetadataKey {
    name: &'static str,
}

impl MetadataKey {
    /// Create a metadata key with a canonical static name.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Return the raw key name.
    pub const fn as_str(&self) -> &'static str {
        self.name
    }

    /// Set this key on `meta`, replacing any previous value.
    pub fn insert(&self, meta: &mut Metadata, value: impl Into<Value>) {
        meta.insert(self.name.to_string(), value.into());
    }

    /// Look up this key in `meta`.
    pub fn get<'a>(&self, meta: &'a Metadata) -> Option<&'a Value> {
        meta.get(self.name)
    }
}

/// Merge two metadata maps into a new one; `overlay` entries win on key collisions.
///
/// Neither input is modified.
pub fn merge_metadata(base: &Metadata, overlay: &Metadata) -> Metadata {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
