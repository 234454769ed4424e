//! Level entries
//!
//! A single level as stored inside the "my levels" and "saved levels"
//! sections. Only the identifying fields are typed; every other key is
//! carried through untouched so a load → dump cycle is lossless.

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::crypt::SAVE_BASE64;
use crate::codec::Mapping;
use crate::error::Result;

/// A level entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Server id (`k1`), 0 for levels that were never uploaded
    #[serde(rename = "k1", default)]
    pub id: i64,

    /// Level name (`k2`)
    #[serde(rename = "k2", default)]
    pub name: String,

    /// Description (`k3`), stored base64-encoded
    #[serde(rename = "k3", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creator name (`k5`)
    #[serde(rename = "k5", default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Level revision (`k16`)
    #[serde(rename = "k16", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    /// Every other key, preserved verbatim
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Level {
    /// Create a bare level with an id and a name
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            creator: None,
            version: None,
            extra: Mapping::new(),
        }
    }

    /// Build a level from its stored mapping
    ///
    /// Fails when a typed field holds a value of the wrong shape.
    pub fn from_mapping(map: Mapping) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Render the level into its stored mapping
    ///
    /// Typed fields come first, then the passthrough keys in their order.
    pub fn to_mapping(&self) -> Result<Mapping> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(
                "level did not serialize to a mapping",
            )
            .into()),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded description text, if present and valid base64/UTF-8
    pub fn description_text(&self) -> Option<String> {
        let raw = self.description.as_ref()?;
        let bytes = SAVE_BASE64.decode(raw.trim()).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// Store `text` as the (base64-encoded) description
    pub fn set_description_text(&mut self, text: &str) {
        self.description = Some(SAVE_BASE64.encode(text.as_bytes()));
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
