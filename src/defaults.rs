//! Default section templates
//!
//! Content a section falls back to when its blob is missing or cannot be
//! decoded. Mirrors what a fresh install writes on first launch.

use serde_json::{json, Value};

use crate::codec::Mapping;
use crate::keys;

/// Binary version stamp written by the supported game build
pub const BINARY_VERSION: i64 = 35;

/// Fallback content for both sections
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    pub main: Mapping,
    pub levels: Mapping,
}

impl Templates {
    /// The templates shipped with the crate
    pub fn builtin() -> Self {
        Self {
            main: main_template(),
            levels: levels_template(),
        }
    }

    /// Templates that fall back to empty sections
    pub fn empty() -> Self {
        Self {
            main: Mapping::new(),
            levels: Mapping::new(),
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Fresh profile section
pub fn main_template() -> Mapping {
    let mut map = Mapping::new();
    for key in ["valueKeeper", "unlockValueKeeper", "customObjectDict"] {
        map.insert(key.to_string(), json!({}));
    }
    map.insert("bgVolume".to_string(), json!(1.0));
    map.insert("sfxVolume".to_string(), json!(1.0));
    map.insert(keys::UDID.to_string(), json!("S0"));
    map.insert(keys::PLAYER_NAME.to_string(), json!("Player"));
    map.insert(keys::PLAYER_ID.to_string(), json!(0));
    map.insert(keys::BOOTUPS.to_string(), json!(0));
    for key in ["GLM_01", keys::SAVED_LEVELS, "GLM_10", "GS_value", "GS_completed"] {
        map.insert(key.to_string(), json!({}));
    }
    map.insert(keys::BINARY_VERSION.to_string(), json!(BINARY_VERSION));
    map
}

/// Fresh levels section
pub fn levels_template() -> Mapping {
    let mut my_levels = Mapping::new();
    my_levels.insert(keys::ARRAY_MARKER.to_string(), Value::Bool(true));

    let mut map = Mapping::new();
    map.insert(keys::MY_LEVELS.to_string(), Value::Object(my_levels));
    map.insert(keys::LEVELS_BINARY_VERSION.to_string(), json!(BINARY_VERSION));
    map
}
