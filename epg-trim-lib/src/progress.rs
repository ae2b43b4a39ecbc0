use std::fmt;
use std::path::PathBuf;

/// Which of the two input documents an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Playlist,
    Guide,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Playlist => f.write_str("playlist"),
            Document::Guide => f.write_str("guide"),
        }
    }
}

/// Progress update emitted while a trim run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Fetch of a document has started
    Downloading { what: Document, location: String },

    /// Document fetched; `bytes` is the decoded text length
    Downloaded { what: Document, bytes: usize },

    PlaylistParsed { entries: usize },

    GuideParsed { channels: usize },

    /// A playlist entry was given a guide id
    Matched {
        name: String,
        id: String,
        score: f64,
    },

    /// No guide channel reached the threshold
    Unmatched { name: String, best_score: f64 },

    /// An output file is about to be written
    Writing { what: Document, path: PathBuf },

    PlaylistWritten { path: PathBuf, entries: usize },

    GuideWritten {
        path: PathBuf,
        channels: usize,
        programmes: usize,
    },
}
