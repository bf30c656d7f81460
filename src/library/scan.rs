use std::path::Path;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::format_clock;
use super::model::{MediaKind, Track};

fn normalized(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Classify `path` by extension, or `None` when it is not a media file.
fn media_kind(path: &Path, settings: &LibrarySettings) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if normalized(&settings.extensions).contains(&ext) {
        Some(MediaKind::Audio)
    } else if normalized(&settings.video_extensions).contains(&ext) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and build a track for every media file.
///
/// The track name comes from the title tag when present, else the file stem;
/// the category is the parent directory name (none for files in `dir` itself);
/// `media_id` is the path relative to `dir`.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || (!settings.include_hidden && is_hidden(path)) {
            continue;
        }
        let Some(kind) = media_kind(path, settings) else {
            continue;
        };

        let mut name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut duration_label = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            let length = tagged.properties().duration();
            if !length.is_zero() {
                duration_label = Some(format_clock(length.as_secs_f64()));
            }
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = tag.title() {
                    if !title.trim().is_empty() {
                        name = title.trim().to_string();
                    }
                }
            }
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let category = relative
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .map(str::to_string);

        tracks.push(Track {
            media_id: relative.display().to_string(),
            name,
            url: Some(path.display().to_string()),
            category,
            kind,
            duration_label,
        });
    }

    tracks.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    tracks
}
