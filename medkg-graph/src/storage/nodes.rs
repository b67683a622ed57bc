//! Node model.

use medkg_core::{EntityKind, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};

/// A node as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: EntityKind,
    /// Normalized name, unique within `kind`
    pub name: String,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            properties: PropertyMap::new(),
        }
    }

    /// A text property, if set and not a list.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_text)
    }

    /// Merge `props` into this node's properties, overwriting existing keys.
    pub fn merge_properties(&mut self, props: &PropertyMap) {
        for (key, value) in props {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    /// Non-empty text value of `key`, the shape consumed by embedding jobs.
    pub(crate) fn non_empty_text(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|text| !text.is_empty())
    }
}
