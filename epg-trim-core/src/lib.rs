//! Matching and filtering engine for reconciling an M3U playlist with an
//! XMLTV guide.
//!
//! The crate is pure: it parses both documents from text, infers a guide
//! channel id for every playlist entry by approximate name matching, and
//! renders the trimmed documents. Fetching and persisting them is the job of
//! `epg-trim-lib`.

pub mod guide;
pub mod matcher;
pub mod playlist;
pub mod similarity;

pub use guide::{GuideChannel, GuideChannels, ProjectionStats, parse_guide, project_guide};
pub use matcher::{
    ChannelMatcher, DEFAULT_MIN_SIMILARITY, ExhaustiveMatcher, MatchResult, MatchTable,
    match_entries,
};
pub use playlist::{PlaylistEntry, parse_playlist, render_playlist};
pub use similarity::{PreparedName, similarity};
