//! One complete trim run: fetch, parse, match, then write both outputs.

use std::collections::BTreeSet;
use std::path::PathBuf;

use epg_trim_core::{
    ExhaustiveMatcher, MatchTable, match_entries, parse_guide, parse_playlist, project_guide,
    render_playlist,
};

use crate::error::PipelineError;
use crate::fetch::DocumentSource;
use crate::output;
use crate::progress::{Document, Progress};
use crate::settings::Settings;

/// Options controlling a trim run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Match and report, but write nothing
    pub dry_run: bool,
}

/// What a run found and produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub entries: usize,
    pub guide_channels: usize,
    /// Entries that received a guide id
    pub matched: usize,
    pub unmatched: usize,
    pub used_ids: BTreeSet<String>,
    pub channels_written: usize,
    pub programmes_written: usize,
    /// Files written, in the order they were finalized
    pub outputs: Vec<PathBuf>,
}

/// Run the whole trim.
///
/// Both documents are fetched before anything is written, so a fetch
/// failure leaves existing outputs untouched. The playlist is written
/// before the guide.
pub fn run(
    settings: &Settings,
    source: &dyn DocumentSource,
    options: &RunOptions,
    progress: &dyn Fn(Progress),
) -> Result<RunSummary, PipelineError> {
    settings.validate()?;

    progress(Progress::Downloading {
        what: Document::Playlist,
        location: settings.playlist_source.clone(),
    });
    let playlist_text = source.fetch_text(&settings.playlist_source)?;
    progress(Progress::Downloaded {
        what: Document::Playlist,
        bytes: playlist_text.len(),
    });

    progress(Progress::Downloading {
        what: Document::Guide,
        location: settings.guide_source.clone(),
    });
    let guide_xml = source.fetch_gzip_text(&settings.guide_source)?;
    progress(Progress::Downloaded {
        what: Document::Guide,
        bytes: guide_xml.len(),
    });

    let entries = parse_playlist(&playlist_text);
    progress(Progress::PlaylistParsed {
        entries: entries.len(),
    });

    let channels = parse_guide(&guide_xml);
    progress(Progress::GuideParsed {
        channels: channels.len(),
    });

    let matcher = ExhaustiveMatcher::new(&channels, settings.min_similarity);
    let results = match_entries(&matcher, &entries);
    for result in &results {
        match result.matched_id {
            Some(ref id) => progress(Progress::Matched {
                name: result.playlist_name.clone(),
                id: id.clone(),
                score: result.score,
            }),
            None => progress(Progress::Unmatched {
                name: result.playlist_name.clone(),
                best_score: result.score,
            }),
        }
    }

    let table = MatchTable::from_results(&results);
    let matched = results.iter().filter(|r| r.is_match()).count();
    let mut summary = RunSummary {
        entries: entries.len(),
        guide_channels: channels.len(),
        matched,
        unmatched: entries.len() - matched,
        used_ids: table.used_ids().clone(),
        ..Default::default()
    };

    if options.dry_run {
        log::debug!("Dry run, skipping output");
        return Ok(summary);
    }

    let playlist_path = &settings.playlist_output;
    progress(Progress::Writing {
        what: Document::Playlist,
        path: playlist_path.clone(),
    });
    let playlist = render_playlist(&entries, &table, &settings.tvg_url());
    output::write_text(playlist_path, &playlist)
        .map_err(|e| PipelineError::write(playlist_path, e))?;
    summary.outputs.push(playlist_path.clone());
    progress(Progress::PlaylistWritten {
        path: playlist_path.clone(),
        entries: entries.len(),
    });

    let guide_path = &settings.guide_output;
    progress(Progress::Writing {
        what: Document::Guide,
        path: guide_path.clone(),
    });
    let stats = output::write_gzip(guide_path, |w| {
        project_guide(&guide_xml, table.used_ids(), w)
    })
    .map_err(|e| PipelineError::write(guide_path, e))?;
    summary.channels_written = stats.channels;
    summary.programmes_written = stats.programmes;
    summary.outputs.push(guide_path.clone());
    progress(Progress::GuideWritten {
        path: guide_path.clone(),
        channels: stats.channels,
        programmes: stats.programmes,
    });

    Ok(summary)
}
