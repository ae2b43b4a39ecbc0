//! M3U playlist parsing and rendering.
//!
//! Only the parts needed for matching survive a round trip: each entry's
//! display name (the text after the first comma of its `#EXTINF` line) and
//! its stream URL. Other `#EXTINF` attributes are dropped and replaced by the
//! inferred `tvg-id`.

use crate::matcher::MatchTable;

/// Prefix of the metadata line that names the next stream.
pub const EXTINF_MARKER: &str = "#EXTINF";

/// A named stream from the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Parse playlist text into entries, in document order.
///
/// A `#EXTINF` line sets the pending name; the next line that is neither
/// blank nor a `#` comment becomes that entry's URL. URLs with no pending
/// name are ignored, and so is an `#EXTINF` line without a comma or with an
/// empty name. Nothing here fails; bad lines just produce fewer entries.
pub fn parse_playlist(text: &str) -> Vec<PlaylistEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(EXTINF_MARKER) {
            pending = extinf_name(line);
        } else if !line.is_empty() && !line.starts_with('#') {
            match pending.take() {
                Some(name) => entries.push(PlaylistEntry::new(name, line)),
                None => log::debug!("Ignoring playlist line without #EXTINF: {line}"),
            }
        }
    }

    if entries.is_empty() {
        log::warn!("No entries found in playlist");
    }
    entries
}

/// Display name of an `#EXTINF` line: the trimmed text after the first comma.
fn extinf_name(line: &str) -> Option<&str> {
    let (_, name) = line.split_once(',')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Render the playlist with inferred ids.
///
/// The first line points players at the companion guide (`url-tvg`). Every
/// entry is kept in its original order; matched entries carry a `tvg-id`.
pub fn render_playlist(entries: &[PlaylistEntry], table: &MatchTable, tvg_url: &str) -> String {
    let mut out = format!("#EXTM3U url-tvg=\"{tvg_url}\"\n");
    for entry in entries {
        match table.id_for(&entry.name) {
            Some(id) => out.push_str(&format!("#EXTINF:-1 tvg-id=\"{id}\",{}\n", entry.name)),
            None => out.push_str(&format!("#EXTINF:-1,{}\n", entry.name)),
        }
        out.push_str(&entry.url);
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "tests/playlist_tests.rs"]
mod tests;
