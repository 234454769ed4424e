//! Encoded container
//!
//! A `Part` is one save section: a mapping decoded from a raw blob that is
//! always usable. If the blob cannot be decoded the part starts from a
//! caller-supplied default (or an empty mapping) instead of failing.
//!
//! ## States
//! ```text
//!            decode ok
//!   blob ──────────────────► Loaded
//!     │
//!     └── decode failed ───► Defaulted
//! ```
//! Both states are terminal; later mutation changes content, not state.

use std::fmt;

use serde_json::map::Entry;
use serde_json::Value;

use crate::codec::{Codec, Mapping, PlistCodec};

/// How a part was initialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    /// Blob decoded successfully
    Loaded,

    /// Blob could not be decoded; content came from the default
    Defaulted,
}

/// One encoded save section
#[derive(Clone)]
pub struct Part<C: Codec = PlistCodec> {
    map: Mapping,
    state: PartState,
    codec: C,
}

impl Part<PlistCodec> {
    /// Decode `raw` with the plist codec, falling back to `default`
    ///
    /// Text input is decoded as its UTF-8 bytes. Decode failures are never
    /// returned; the part is [`PartState::Defaulted`] instead.
    pub fn new(raw: impl AsRef<[u8]>, default: Option<Mapping>) -> Self {
        Self::with_codec(raw, default, PlistCodec)
    }

    /// Wrap an already decoded mapping
    pub fn from_map(map: Mapping) -> Self {
        Self {
            map,
            state: PartState::Loaded,
            codec: PlistCodec,
        }
    }
}

impl<C: Codec> Part<C> {
    /// Decode `raw` with an explicit codec, falling back to `default`
    pub fn with_codec(raw: impl AsRef<[u8]>, default: Option<Mapping>, codec: C) -> Self {
        let raw = raw.as_ref();

        // Only the decode result is inspected here; nothing else is suppressed.
        let (map, state) = match codec.decode(raw) {
            Ok(map) => (map, PartState::Loaded),
            Err(e) => {
                if !raw.is_empty() {
                    tracing::warn!(
                        error = %e,
                        bytes = raw.len(),
                        "section could not be decoded, using default"
                    );
                }
                (default.unwrap_or_default(), PartState::Defaulted)
            }
        };

        Self { map, state, codec }
    }

    /// Re-encode the current content
    pub fn dump(&self) -> String {
        self.codec.encode(&self.map)
    }

    pub fn state(&self) -> PartState {
        self.state
    }

    pub fn is_defaulted(&self) -> bool {
        self.state == PartState::Defaulted
    }

    // =========================================================================
    // Mapping Operations
    // =========================================================================

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.map.get_mut(key)
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_> {
        self.map.entry(key)
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.map.iter()
    }

    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.map.keys()
    }

    pub fn values(&self) -> serde_json::map::Values<'_> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_map(&self) -> &Mapping {
        &self.map
    }

    /// Replace the whole content, returning the old mapping
    pub fn replace(&mut self, map: Mapping) -> Mapping {
        std::mem::replace(&mut self.map, map)
    }

    pub fn into_map(self) -> Mapping {
        self.map
    }
}

impl<'a, C: Codec> IntoIterator for &'a Part<C> {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<C: Codec> fmt::Debug for Part<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("outer_len", &self.map.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<C: Codec> fmt::Display for Part<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(&self.map).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Default for Part<PlistCodec> {
    fn default() -> Self {
        Self::from_map(Mapping::new())
    }
}

impl PartialEq for Part<PlistCodec> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}
