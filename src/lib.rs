//! # gdsave
//!
//! A save database model for Geometry Dash profiles with:
//! - Fault-tolerant section decoding (corrupt input falls back to defaults)
//! - Typed accessors over the fixed profile keys
//! - Level collections that write back to the database they came from
//! - File persistence with the game's xor/base64/gzip transform
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SaveStore (Persist)                         │
//! │           CCGameManager.dat / CCLocalLevels.dat              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  crypt + plist codec
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Database                                │
//! │          ┌─────────────┐      ┌─────────────┐                │
//! │          │ Part (main) │      │Part (levels)│                │
//! │          └─────────────┘      └─────────────┘                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  load_* / dump_*
//!                       ▼
//!               ┌────────────────┐
//!               │LevelCollection │──── &Database (non-owning)
//!               └────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod keys;

pub mod codec;
pub mod part;
pub mod defaults;
pub mod level;
pub mod database;
pub mod collection;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SaveError, Result};
pub use config::Config;
pub use codec::{Codec, Mapping, PlistCodec};
pub use part::{Part, PartState};
pub use defaults::Templates;
pub use level::Level;
pub use database::{Database, Section};
pub use collection::LevelCollection;
pub use store::{Persist, SaveStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gdsave
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
