/// Kind of platform handle a track needs.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MediaKind {
    #[default]
    Audio,
    Video,
}

impl MediaKind {
    /// Map the backend's free-form `media_type` label; anything but "video" is audio.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()) {
            Some(l) if l == "video" => Self::Video,
            _ => Self::Audio,
        }
    }
}

/// One playable item.
///
/// Two tracks are the same playback target iff their urls are equal;
/// `media_id`, `name` and `category` are cosmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub media_id: String,
    pub name: String,
    pub url: Option<String>,
    pub category: Option<String>,
    pub kind: MediaKind,
    /// Human-readable length from the catalog, e.g. "10:00".
    pub duration_label: Option<String>,
}

impl Track {
    pub fn new(media_id: impl Into<String>, name: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            media_id: media_id.into(),
            name: name.into(),
            url: url.map(str::to_string),
            category: None,
            kind: MediaKind::Audio,
            duration_label: None,
        }
    }

    /// The url, if present and non-blank.
    pub fn playable_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn is_playable(&self) -> bool {
        self.playable_url().is_some()
    }

    pub fn same_target(&self, other: &Track) -> bool {
        match (self.playable_url(), other.playable_url()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
