use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::config::LibrarySettings;
use crate::error::CatalogError;

use super::model::{MediaKind, Track};
use super::scan::scan;

/// Practices sharing one category label.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeGroup {
    pub category: String,
    pub tracks: Vec<Track>,
}

/// Producer of `Track`s for the browse screen.
pub trait PracticeSource {
    fn list_practices(&self) -> Result<Vec<PracticeGroup>, CatalogError>;
}

/// Pick a source for `path`: directories are scanned, anything else is read
/// as a practice listing document.
pub fn open_source(path: &Path, settings: &LibrarySettings) -> Box<dyn PracticeSource> {
    if path.is_dir() {
        Box::new(DirectoryCatalog::new(path, settings.clone()))
    } else {
        Box::new(JsonCatalog::new(path))
    }
}

/// All tracks of `groups`, in group order.
pub fn flatten(groups: &[PracticeGroup]) -> Vec<Track> {
    groups.iter().flat_map(|g| g.tracks.iter().cloned()).collect()
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: BTreeMap<String, Vec<PracticeEntry>>,
}

#[derive(Debug, Deserialize)]
struct PracticeEntry {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    media_id: Option<String>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    position: Option<i64>,
    #[serde(default)]
    duration: Option<String>,
}

impl PracticeEntry {
    fn into_track(self, category: &str) -> Track {
        let media_id = self
            .media_id
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.id.map(|id| id.to_string()))
            .unwrap_or_default();
        Track {
            media_id,
            name: self.name,
            url: self.file_url.filter(|u| !u.trim().is_empty()),
            category: Some(category.to_string()),
            kind: MediaKind::from_label(self.media_type.as_deref()),
            duration_label: self.duration,
        }
    }
}

/// Parse the backend's `/api/practices` response body.
pub(crate) fn parse_listing(body: &str) -> Result<Vec<PracticeGroup>, CatalogError> {
    let listing: Listing = serde_json::from_str(body)?;
    match listing.status.as_deref() {
        Some("success") => {}
        other => {
            return Err(CatalogError::Rejected(
                other.unwrap_or("missing").to_string(),
            ));
        }
    }

    Ok(listing
        .data
        .into_iter()
        .map(|(category, mut entries)| {
            entries.sort_by_key(|e| e.position.unwrap_or(i64::MAX));
            let tracks = entries
                .into_iter()
                .map(|e| e.into_track(&category))
                .collect();
            PracticeGroup { category, tracks }
        })
        .collect())
}

/// Practice listing saved from the assistant backend.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PracticeSource for JsonCatalog {
    fn list_practices(&self) -> Result<Vec<PracticeGroup>, CatalogError> {
        let body = fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let groups = parse_listing(&body)?;
        debug!(
            "loaded {} practice categories from {}",
            groups.len(),
            self.path.display()
        );
        Ok(groups)
    }
}

/// Local directory of media files, grouped by parent directory.
pub struct DirectoryCatalog {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }
}

impl PracticeSource for DirectoryCatalog {
    fn list_practices(&self) -> Result<Vec<PracticeGroup>, CatalogError> {
        if !self.root.is_dir() {
            return Err(CatalogError::Io {
                path: self.root.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }
        let root_label = self
            .root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Library")
            .to_string();

        let mut groups: BTreeMap<String, Vec<Track>> = BTreeMap::new();
        for track in scan(&self.root, &self.settings) {
            let category = track.category.clone().unwrap_or_else(|| root_label.clone());
            groups.entry(category).or_default().push(track);
        }
        Ok(groups
            .into_iter()
            .map(|(category, tracks)| PracticeGroup { category, tracks })
            .collect())
    }
}
