//! Terminal output for a trim run.
//!
//! Status lines go through `log::info!` so `-q` silences them; the final
//! summary is always printed.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use epg_trim_lib::{Progress, RunSummary};

/// Turns pipeline progress events into status lines, with a spinner
/// while a download is in flight.
pub(crate) struct Reporter {
    quiet: bool,
    spinner: RefCell<Option<ProgressBar>>,
}

impl Reporter {
    pub(crate) fn new(quiet: bool) -> Self {
        Self {
            quiet,
            spinner: RefCell::new(None),
        }
    }

    pub(crate) fn handle(&self, event: Progress) {
        match event {
            Progress::Downloading { what, location } => {
                log::debug!("Fetching {what} from {location}");
                self.start_spinner(format!("Downloading {what}..."));
            }
            Progress::Downloaded { what, bytes } => {
                self.stop_spinner();
                log::info!(
                    "{} Downloaded {what} ({})",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    format_size(bytes),
                );
            }
            Progress::PlaylistParsed { entries } => {
                log::info!("Playlist entries: {entries}");
            }
            Progress::GuideParsed { channels } => {
                log::info!("Guide channels: {channels}");
            }
            Progress::Matched { name, id, score } => {
                log::info!(
                    "{} '{name}' \u{2192} id={} (score={score:.3})",
                    "[OK]".if_supports_color(Stdout, |t| t.green()),
                    id.if_supports_color(Stdout, |t| t.cyan()),
                );
            }
            Progress::Unmatched { name, best_score } => {
                log::info!(
                    "{} '{name}' (max score={best_score:.3})",
                    "[SKIP]".if_supports_color(Stdout, |t| t.yellow()),
                );
            }
            Progress::Writing { what, path } => {
                log::debug!("Writing {what} to {}", path.display());
            }
            Progress::PlaylistWritten { path, entries } => {
                log::info!(
                    "{} Wrote playlist {} ({entries} entries)",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    path.display(),
                );
            }
            Progress::GuideWritten {
                path,
                channels,
                programmes,
            } => {
                log::info!(
                    "{} Wrote guide {} ({channels} channels, {programmes} programmes)",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    path.display(),
                );
            }
        }
    }

    /// Clear any spinner left by a failed download.
    pub(crate) fn finish(&self) {
        self.stop_spinner();
    }

    fn start_spinner(&self, msg: String) {
        self.stop_spinner();
        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn stop_spinner(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

/// Final summary, printed even in quiet mode.
pub(crate) fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    println!(
        "Matched {} of {} entries ({} unmatched), {} guide channels used",
        summary
            .matched
            .if_supports_color(Stdout, |t| t.green()),
        summary.entries,
        summary.unmatched,
        summary.used_ids.len(),
    );
    if dry_run {
        println!(
            "{}",
            "Dry run: no files were written".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }
    println!(
        "{}",
        "Done. Files created:".if_supports_color(Stdout, |t| t.bold()),
    );
    for path in &summary.outputs {
        println!(" - {}", path.display());
    }
}

/// Human-readable size of a downloaded document.
pub(crate) fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
