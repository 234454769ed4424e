//! Save Store
//!
//! File-system persistence for a [`Database`].
//!
//! ## Responsibilities
//! - Read both section files, undoing the save transform
//! - Write both section files atomically (temp file + rename)
//! - Serve as the [`Persist`] collaborator handed to `Database::dump`
//!
//! A missing or unreadable section never prevents loading: it is passed on
//! as an empty blob and the section falls back to its template.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::crypt::{encrypt_save, open_save};
use crate::config::Config;
use crate::database::Database;
use crate::error::Result;
use crate::part::Part;

/// Something that can durably store a database
pub trait Persist {
    /// Write both sections of `database`
    fn persist(&self, database: &Database) -> Result<()>;
}

/// Persists a database as two files in a directory
#[derive(Debug, Clone)]
pub struct SaveStore {
    config: Config,
}

impl SaveStore {
    /// Create a store, validating the config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Store over a directory with default file names
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::new(Config::builder().save_dir(path).build())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load both sections into a database
    pub fn load(&self) -> Result<Database> {
        let main = self.read_section(&self.config.main_path())?;
        let levels = self.read_section(&self.config.levels_path())?;

        let database = Database::new(main, levels);
        {
            let (main_part, levels_part) = database.as_parts();
            tracing::info!(
                dir = %self.config.save_dir.display(),
                main_defaulted = main_part.is_defaulted(),
                levels_defaulted = levels_part.is_defaulted(),
                "save loaded"
            );
        }

        Ok(database)
    }

    /// Read one section file and return its decoded document bytes
    ///
    /// Plain XML is returned as-is. Missing files and blobs the transform
    /// rejects come back empty. I/O errors other than "not found" propagate.
    pub fn read_section(&self, path: &Path) -> Result<Vec<u8>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "section file missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match open_save(&raw, self.config.xor_key) {
            Ok(document) => Ok(document),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "section file unreadable");
                Ok(Vec::new())
            }
        }
    }

    /// Encode one part and write it to `path`
    pub fn write_section(&self, path: &Path, part: &Part) -> Result<()> {
        let document = part.dump();
        let bytes = if self.config.encrypt {
            encrypt_save(
                document.as_bytes(),
                self.config.xor_key,
                self.config.compression_level,
            )?
        } else {
            document.into_bytes()
        };

        let tmp = tmp_path(path);
        let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "temp file not removed");
            }
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "section written");
        Ok(())
    }
}

impl Persist for SaveStore {
    fn persist(&self, database: &Database) -> Result<()> {
        fs::create_dir_all(&self.config.save_dir)?;

        let (main, levels) = database.as_parts();
        self.write_section(&self.config.main_path(), &main)?;
        self.write_section(&self.config.levels_path(), &levels)?;

        tracing::info!(dir = %self.config.save_dir.display(), "save persisted");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
