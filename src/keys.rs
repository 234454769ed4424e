//! Fixed key namespace of the save sections
//!
//! These strings are part of the on-disk format and must match exactly.

// =============================================================================
// Main Section (profile / account)
// =============================================================================

pub const USERNAME: &str = "GJA_001";
pub const PASSWORD: &str = "GJA_002";
pub const ACCOUNT_ID: &str = "GJA_003";
pub const PLAYER_ID: &str = "playerUserID";
pub const UDID: &str = "playerUDID";
pub const BOOTUPS: &str = "bootups";
pub const PLAYER_NAME: &str = "playerName";
pub const BINARY_VERSION: &str = "binaryVersion";

/// Id-keyed "saved levels" mapping (main section)
pub const SAVED_LEVELS: &str = "GLM_03";

// =============================================================================
// Levels Section
// =============================================================================

/// Position-keyed "my levels" pseudo-array (levels section)
pub const MY_LEVELS: &str = "LLM_01";

/// Binary version stamp of the levels section
pub const LEVELS_BINARY_VERSION: &str = "LLM_02";

// =============================================================================
// Pseudo-array Convention
// =============================================================================

/// Boolean marker flagging a mapping as an array
pub const ARRAY_MARKER: &str = "_isArr";

/// Prefix of positional keys (`k_0`, `k_1`, ...)
pub const ARRAY_PREFIX: &str = "k_";

// =============================================================================
// Level Entry Fields
// =============================================================================

pub const LEVEL_ID: &str = "k1";
pub const LEVEL_NAME: &str = "k2";
pub const LEVEL_DESCRIPTION: &str = "k3";
pub const LEVEL_CREATOR: &str = "k5";
pub const LEVEL_VERSION: &str = "k16";
