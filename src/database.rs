//! Save Database
//!
//! Aggregates the two save sections and gives them meaning.
//!
//! ## Responsibilities
//! - Build both sections with default-on-failure semantics
//! - Typed accessors over the fixed profile keys (never fail)
//! - Translate the level sections to and from [`LevelCollection`]s
//! - Hand itself to a persistence collaborator on `dump`
//!
//! ## Level Section Conventions
//! ```text
//! saved levels (main["GLM_03"])       my levels (levels["LLM_01"])
//! ┌──────────┬──────────────┐         ┌──────────┬──────────────┐
//! │ "3"      │ { k1: 3, ..} │         │ "_isArr" │ true         │
//! │ "7"      │ { k1: 7, ..} │         │ "k_0"    │ { k2: .. }   │
//! └──────────┴──────────────┘         │ "k_1"    │ { k2: .. }   │
//!   keyed by id                       └──────────┴──────────────┘
//!                                       keyed by position
//! ```
//!
//! ## Interior Mutability
//! Both parts sit behind a `RwLock` so that a collection holding a shared
//! `&Database` can write back. Every method takes and releases the lock
//! within the call; no lock is held across calls.

use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value;

use crate::codec::Mapping;
use crate::collection::LevelCollection;
use crate::defaults::Templates;
use crate::error::Result;
use crate::keys;
use crate::level::Level;
use crate::part::Part;
use crate::store::Persist;

const UNKNOWN: &str = "unknown";
const DEFAULT_UDID: &str = "S0";
const DEFAULT_PLAYER_NAME: &str = "Player";

/// Which of the two parts an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Profile / account / settings
    Main,

    /// Level storage
    #[default]
    Levels,
}

/// The save database: a `main` part and a `levels` part
pub struct Database {
    /// Profile section
    main: RwLock<Part>,

    /// Levels section
    levels: RwLock<Part>,
}

impl Database {
    /// Build from two raw blobs using the built-in templates as fallback
    pub fn new(main: impl AsRef<[u8]>, levels: impl AsRef<[u8]>) -> Self {
        Self::with_templates(main, levels, &Templates::builtin())
    }

    /// Build from two raw blobs with explicit fallback templates
    pub fn with_templates(
        main: impl AsRef<[u8]>,
        levels: impl AsRef<[u8]>,
        templates: &Templates,
    ) -> Self {
        Self::from_parts(
            Part::new(main, Some(templates.main.clone())),
            Part::new(levels, Some(templates.levels.clone())),
        )
    }

    /// A database made only of the templates
    pub fn empty() -> Self {
        Self::new("", "")
    }

    pub fn from_parts(main: Part, levels: Part) -> Self {
        Self {
            main: RwLock::new(main),
            levels: RwLock::new(levels),
        }
    }

    // =========================================================================
    // Profile Accessors
    // =========================================================================

    pub fn username(&self) -> String {
        self.main_string(keys::USERNAME, UNKNOWN)
    }

    pub fn password(&self) -> String {
        self.main_string(keys::PASSWORD, UNKNOWN)
    }

    pub fn account_id(&self) -> i64 {
        self.main_integer(keys::ACCOUNT_ID)
    }

    pub fn player_id(&self) -> i64 {
        self.main_integer(keys::PLAYER_ID)
    }

    /// Device id
    pub fn udid(&self) -> String {
        self.main_string(keys::UDID, DEFAULT_UDID)
    }

    /// Number of times the game was started
    pub fn bootup_count(&self) -> i64 {
        self.main_integer(keys::BOOTUPS)
    }

    /// Display name chosen before logging in
    pub fn player_name(&self) -> String {
        self.main_string(keys::PLAYER_NAME, DEFAULT_PLAYER_NAME)
    }

    pub fn binary_version(&self) -> i64 {
        self.main_integer(keys::BINARY_VERSION)
    }

    pub fn set_username(&self, username: impl Into<String>) {
        self.main.write().insert(keys::USERNAME, Value::String(username.into()));
    }

    pub fn set_password(&self, password: impl Into<String>) {
        self.main.write().insert(keys::PASSWORD, Value::String(password.into()));
    }

    pub fn set_account_id(&self, account_id: i64) {
        self.main.write().insert(keys::ACCOUNT_ID, account_id);
    }

    pub fn set_player_id(&self, player_id: i64) {
        self.main.write().insert(keys::PLAYER_ID, player_id);
    }

    pub fn set_udid(&self, udid: impl Into<String>) {
        self.main.write().insert(keys::UDID, Value::String(udid.into()));
    }

    pub fn set_bootup_count(&self, count: i64) {
        self.main.write().insert(keys::BOOTUPS, count);
    }

    pub fn set_player_name(&self, name: impl Into<String>) {
        self.main.write().insert(keys::PLAYER_NAME, Value::String(name.into()));
    }

    fn main_string(&self, key: &str, default: &str) -> String {
        self.main
            .read()
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn main_integer(&self, key: &str) -> i64 {
        self.main.read().get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    // =========================================================================
    // Section Helpers
    // =========================================================================

    /// Insert `default` (or an empty mapping) under `key` unless the key exists
    ///
    /// Presence decides, not truthiness: an existing empty or false value is
    /// left untouched. Returns the value now stored under `key`.
    pub fn ensure_default(&self, key: &str, section: Section, default: Option<Value>) -> Value {
        let mut part = self.section(section).write();
        part.entry(key)
            .or_insert_with(|| default.unwrap_or_else(|| Value::Object(Mapping::new())))
            .clone()
    }

    /// [`ensure_default`](Self::ensure_default) on the levels section
    pub fn ensure_level_default(&self, key: &str, default: Option<Value>) -> Value {
        self.ensure_default(key, Section::Levels, default)
    }

    fn section(&self, section: Section) -> &RwLock<Part> {
        match section {
            Section::Main => &self.main,
            Section::Levels => &self.levels,
        }
    }

    // =========================================================================
    // Saved Levels (id-keyed, main section)
    // =========================================================================

    /// Load the "saved levels" section
    pub fn load_saved_levels(&self) -> LevelCollection<'_> {
        self.load_saved_levels_from(keys::SAVED_LEVELS)
    }

    pub fn load_saved_levels_from(&self, key: &str) -> LevelCollection<'_> {
        let inner = self.ensure_default(key, Section::Main, None);
        LevelCollection::derive_from(self, to_levels(key, inner, false))
    }

    /// Replace the "saved levels" section with `levels`
    ///
    /// Entries sharing an id collapse into one; the later entry wins.
    /// The section is left untouched if any level fails to serialize.
    pub fn dump_saved_levels(&self, levels: &[Level]) -> Result<()> {
        self.dump_saved_levels_to(levels, keys::SAVED_LEVELS)
    }

    pub fn dump_saved_levels_to(&self, levels: &[Level], key: &str) -> Result<()> {
        let mut section = Mapping::new();
        for level in levels {
            section.insert(level.id.to_string(), Value::Object(level.to_mapping()?));
        }

        tracing::debug!(key, written = section.len(), "dumping saved levels");
        self.main.write().insert(key, Value::Object(section));
        Ok(())
    }

    // =========================================================================
    // My Levels (position-keyed pseudo-array, levels section)
    // =========================================================================

    /// Load the "my levels" section
    pub fn load_my_levels(&self) -> LevelCollection<'_> {
        self.load_my_levels_from(keys::MY_LEVELS)
    }

    pub fn load_my_levels_from(&self, key: &str) -> LevelCollection<'_> {
        let inner = self.ensure_default(key, Section::Levels, None);
        LevelCollection::derive_from(self, to_levels(key, inner, true))
    }

    /// Replace the "my levels" section with `levels`
    ///
    /// Keys are rebuilt from sequence position, not from ids or the keys the
    /// entries were loaded from.
    pub fn dump_my_levels(&self, levels: &[Level]) -> Result<()> {
        self.dump_my_levels_with(levels, keys::MY_LEVELS, keys::ARRAY_PREFIX)
    }

    pub fn dump_my_levels_with(&self, levels: &[Level], key: &str, prefix: &str) -> Result<()> {
        let mut section = Mapping::new();
        section.insert(keys::ARRAY_MARKER.to_string(), Value::Bool(true));
        for (index, level) in levels.iter().enumerate() {
            section.insert(format!("{}{}", prefix, index), Value::Object(level.to_mapping()?));
        }

        tracing::debug!(key, written = levels.len(), "dumping my levels");
        self.levels.write().insert(key, Value::Object(section));
        Ok(())
    }

    // =========================================================================
    // Persistence & Raw Access
    // =========================================================================

    /// Write the database through `persist`; its errors propagate unchanged
    pub fn dump<P: Persist + ?Sized>(&self, persist: &P) -> Result<()> {
        persist.persist(self)
    }

    /// Read access to `(main, levels)`
    pub fn as_parts(&self) -> (RwLockReadGuard<'_, Part>, RwLockReadGuard<'_, Part>) {
        (self.main.read(), self.levels.read())
    }

    /// Exclusive access to `(main, levels)`
    pub fn parts_mut(&mut self) -> (&mut Part, &mut Part) {
        (self.main.get_mut(), self.levels.get_mut())
    }

    pub fn into_parts(self) -> (Part, Part) {
        (self.main.into_inner(), self.levels.into_inner())
    }

    pub fn main(&self) -> RwLockReadGuard<'_, Part> {
        self.main.read()
    }

    pub fn levels(&self) -> RwLockReadGuard<'_, Part> {
        self.levels.read()
    }

    pub fn main_mut(&self) -> RwLockWriteGuard<'_, Part> {
        self.main.write()
    }

    pub fn levels_mut(&self) -> RwLockWriteGuard<'_, Part> {
        self.levels.write()
    }

    /// Run `f` with exclusive access to the main part
    pub fn with_main<R>(&self, f: impl FnOnce(&mut Part) -> R) -> R {
        f(&mut *self.main.write())
    }

    /// Run `f` with exclusive access to the levels part
    pub fn with_levels<R>(&self, f: impl FnOnce(&mut Part) -> R) -> R {
        f(&mut *self.levels.write())
    }

    /// Both sections as `{"main": {...}, "levels": {...}}`
    pub fn to_json(&self) -> Value {
        let mut out = Mapping::new();
        out.insert("main".to_string(), Value::Object(self.main.read().as_map().clone()));
        out.insert("levels".to_string(), Value::Object(self.levels.read().as_map().clone()));
        Value::Object(out)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::from_parts(self.main.read().clone(), self.levels.read().clone())
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("main", &*self.main.read())
            .field("levels", &*self.levels.read())
            .finish()
    }
}

/// Convert a section value into levels, dropping anything malformed
fn to_levels(key: &str, section: Value, skip_marker: bool) -> Vec<Level> {
    let entries = match section {
        Value::Object(entries) => entries,
        _ => {
            tracing::debug!(key, "level section is not a mapping, treating as empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(|(name, _)| !(skip_marker && name == keys::ARRAY_MARKER))
        .filter_map(|(name, value)| match value {
            Value::Object(map) => match Level::from_mapping(map) {
                Ok(level) => Some(level),
                Err(e) => {
                    tracing::debug!(key, entry = %name, error = %e, "dropping malformed level");
                    None
                }
            },
            _ => {
                tracing::debug!(key, entry = %name, "dropping non-mapping level entry");
                None
            }
        })
        .collect()
}
