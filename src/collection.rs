//! Level Collection
//!
//! An ordered list of [`Level`]s, optionally bound to the [`Database`] it
//! was loaded from so it can be written back with no arguments.
//!
//! The binding is a plain shared borrow: the collection cannot outlive the
//! database, and the database never learns about the collection.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::database::Database;
use crate::error::{Result, SaveError};
use crate::level::Level;

/// Ordered levels with an optional link back to their database
#[derive(Clone, Default)]
pub struct LevelCollection<'db> {
    levels: Vec<Level>,
    database: Option<&'db Database>,
}

impl<'db> LevelCollection<'db> {
    /// An empty, unbound collection
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            database: None,
        }
    }

    /// A collection bound to `database`
    pub fn derive_from(database: &'db Database, levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            database: Some(database),
        }
    }

    /// The database this collection was derived from, if any
    pub fn database(&self) -> Option<&'db Database> {
        self.database
    }

    pub fn is_bound(&self) -> bool {
        self.database.is_some()
    }

    /// First level named `name`
    pub fn get_by_name(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name == name)
    }

    /// First level with id `id`
    pub fn get_by_id(&self, id: i64) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Write into the "my levels" section of `database`, or of the bound one
    pub fn dump(&self, database: Option<&Database>) -> Result<()> {
        self.resolve(database)?.dump_my_levels(&self.levels)
    }

    /// Write into the "saved levels" section of `database`, or of the bound one
    pub fn dump_to_saved(&self, database: Option<&Database>) -> Result<()> {
        self.resolve(database)?.dump_saved_levels(&self.levels)
    }

    pub fn into_inner(self) -> Vec<Level> {
        self.levels
    }

    /// Explicit target first, then the bound database
    fn resolve<'a>(&'a self, database: Option<&'a Database>) -> Result<&'a Database> {
        database
            .or(self.database)
            .ok_or(SaveError::UnboundCollection)
    }
}

impl Deref for LevelCollection<'_> {
    type Target = Vec<Level>;

    fn deref(&self) -> &Self::Target {
        &self.levels
    }
}

impl DerefMut for LevelCollection<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.levels
    }
}

impl From<Vec<Level>> for LevelCollection<'_> {
    fn from(levels: Vec<Level>) -> Self {
        Self {
            levels,
            database: None,
        }
    }
}

impl FromIterator<Level> for LevelCollection<'_> {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for LevelCollection<'_> {
    type Item = Level;
    type IntoIter = std::vec::IntoIter<Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.into_iter()
    }
}

impl<'a> IntoIterator for &'a LevelCollection<'_> {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

impl PartialEq for LevelCollection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.levels == other.levels
    }
}

impl fmt::Debug for LevelCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelCollection")?;
        f.debug_list().entries(&self.levels).finish()
    }
}
