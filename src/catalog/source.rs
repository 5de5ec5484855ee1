//! Where catalog and roster data come from
//!
//! Both files are fetched concurrently and joined before anything is shown;
//! if either fails the load fails as a whole.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Catalog, roster_from_json};
use crate::error::ViewerError;
use crate::types::Roster;

/// Supplier of the raw catalog and roster documents
#[async_trait]
pub trait StorySource: Send + Sync {
    async fn catalog_json(&self) -> Result<String, ViewerError>;

    async fn roster_json(&self) -> Result<String, ViewerError>;
}

/// Files on disk
pub struct FileSystemSource {
    catalog_path: PathBuf,
    roster_path: PathBuf,
}

impl FileSystemSource {
    pub fn new<C: Into<PathBuf>, R: Into<PathBuf>>(catalog_path: C, roster_path: R) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            roster_path: roster_path.into(),
        }
    }

    async fn read(what: &str, path: &Path) -> Result<String, ViewerError> {
        log::debug!("reading {what} from {}", path.display());
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ViewerError::data_load(what, format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl StorySource for FileSystemSource {
    async fn catalog_json(&self) -> Result<String, ViewerError> {
        Self::read("catalog", &self.catalog_path).await
    }

    async fn roster_json(&self) -> Result<String, ViewerError> {
        Self::read("roster", &self.roster_path).await
    }
}

/// Documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    catalog: Option<String>,
    roster: Option<String>,
}

impl InMemorySource {
    pub fn new(catalog: impl Into<String>, roster: impl Into<String>) -> Self {
        Self {
            catalog: Some(catalog.into()),
            roster: Some(roster.into()),
        }
    }

    /// A source whose roster fetch fails
    pub fn without_roster(catalog: impl Into<String>) -> Self {
        Self {
            catalog: Some(catalog.into()),
            roster: None,
        }
    }
}

#[async_trait]
impl StorySource for InMemorySource {
    async fn catalog_json(&self) -> Result<String, ViewerError> {
        self.catalog
            .clone()
            .ok_or_else(|| ViewerError::data_load("catalog", "not available"))
    }

    async fn roster_json(&self) -> Result<String, ViewerError> {
        self.roster
            .clone()
            .ok_or_else(|| ViewerError::data_load("roster", "not available"))
    }
}

/// Everything the viewer needs before its first render
#[derive(Debug, Clone)]
pub struct Library {
    pub catalog: Catalog,
    pub roster: Arc<Roster>,
}

/// Fetch both documents concurrently, then parse
pub async fn load_library(source: &dyn StorySource) -> Result<Library, ViewerError> {
    let (catalog_json, roster_json) =
        tokio::try_join!(source.catalog_json(), source.roster_json())?;

    // Scripts are normalized against the roster, so it is parsed first.
    let roster = roster_from_json(&roster_json)?;
    let catalog = Catalog::from_json(&catalog_json, &roster)?;

    Ok(Library {
        catalog,
        roster: Arc::new(roster),
    })
}
