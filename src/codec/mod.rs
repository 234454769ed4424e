//! Codec Module
//!
//! Turns a raw section blob into a nested mapping and back.
//!
//! ## Section Format (compact XML plist)
//! ```text
//! <?xml version="1.0"?>
//! <plist version="1.0" gjver="2.0">
//!   <dict>
//!     <k>GJA_001</k><s>name</s>     string
//!     <k>GJA_003</k><i>71</i>       integer
//!     <k>bgVolume</k><r>0.5</r>     real
//!     <k>showSongMarkers</k><t />   true   (<f /> false)
//!     <k>GLM_03</k><d>...</d>       nested dict (<d /> empty)
//!   </dict>
//! </plist>
//! ```
//!
//! ## On-disk Transform
//! Whole files are additionally wrapped by [`crypt`]:
//! gzip → url-safe base64 → xor with a single-byte key.

pub mod crypt;
mod plist;

use serde_json::{Map, Value};

use crate::error::Result;

pub use plist::{PlistCodec, MAX_DEPTH};

/// In-memory form of a section: insertion-ordered string-keyed mapping
pub type Mapping = Map<String, Value>;

/// A pure decode/encode pair for section blobs
///
/// Implementations must round-trip: `decode(encode(m)) == m` for every
/// mapping this crate produces.
pub trait Codec {
    /// Parse a blob into a mapping
    fn decode(&self, bytes: &[u8]) -> Result<Mapping>;

    /// Render a mapping back into its textual form
    fn encode(&self, map: &Mapping) -> String;
}
