//! Configuration for gdsave
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, SaveError};

/// Main configuration for a save store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Location Configuration
    // -------------------------------------------------------------------------
    /// Directory holding both save files
    /// Internal structure:
    ///   {save_dir}/
    ///     ├── CCGameManager.dat   (main section)
    ///     └── CCLocalLevels.dat   (levels section)
    pub save_dir: PathBuf,

    /// File name of the main (profile) section
    pub main_file: String,

    /// File name of the levels section
    pub levels_file: String,

    // -------------------------------------------------------------------------
    // Transform Configuration
    // -------------------------------------------------------------------------
    /// Write sections through the xor/base64/gzip transform
    pub encrypt: bool,

    /// Single-byte xor key applied to the encoded blob
    pub xor_key: u8,

    /// Gzip level (0-9) used when writing
    pub compression_level: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: Self::default_save_dir(),
            main_file: "CCGameManager.dat".to_string(),
            levels_file: "CCLocalLevels.dat".to_string(),
            encrypt: true,
            xor_key: 11,
            compression_level: 6,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Platform-conventional save directory
    ///
    /// `%LOCALAPPDATA%\GeometryDash` on Windows, `~/.local/share/GeometryDash`
    /// elsewhere, falling back to `./GeometryDash` when neither is set.
    pub fn default_save_dir() -> PathBuf {
        if let Some(local) = env::var_os("LOCALAPPDATA") {
            return PathBuf::from(local).join("GeometryDash");
        }
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("GeometryDash");
        }
        PathBuf::from("GeometryDash")
    }

    /// Full path of the main section file
    pub fn main_path(&self) -> PathBuf {
        self.save_dir.join(&self.main_file)
    }

    /// Full path of the levels section file
    pub fn levels_path(&self) -> PathBuf {
        self.save_dir.join(&self.levels_file)
    }

    /// Check the config for values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.main_file.is_empty() || self.levels_file.is_empty() {
            return Err(SaveError::Config("file names must not be empty".to_string()));
        }
        if self.main_file == self.levels_file {
            return Err(SaveError::Config(format!(
                "main and levels sections share the file name {:?}",
                self.main_file
            )));
        }
        if self.compression_level > 9 {
            return Err(SaveError::Config(format!(
                "compression level {} out of range (0-9)",
                self.compression_level
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the save directory
    pub fn save_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.save_dir = path.into();
        self
    }

    /// Set the main section file name
    pub fn main_file(mut self, name: impl Into<String>) -> Self {
        self.config.main_file = name.into();
        self
    }

    /// Set the levels section file name
    pub fn levels_file(mut self, name: impl Into<String>) -> Self {
        self.config.levels_file = name.into();
        self
    }

    /// Enable or disable the save-file transform on write
    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.config.encrypt = encrypt;
        self
    }

    /// Set the xor key
    pub fn xor_key(mut self, key: u8) -> Self {
        self.config.xor_key = key;
        self
    }

    /// Set the gzip level
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
