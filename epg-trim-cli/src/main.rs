//! epg-trim CLI
//!
//! Tags an M3U playlist with XMLTV guide ids and trims the guide down to the
//! channels the playlist actually uses.

mod error;
mod report;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use epg_trim_lib::{HttpSource, RunOptions, Settings, SettingsOverrides};

use crate::error::CliError;
use crate::report::Reporter;

#[derive(Parser)]
#[command(name = "epg-trim")]
#[command(version, about = "Match playlist channels to an XMLTV guide and trim the guide", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/epg-trim/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playlist URL or local path
    #[arg(long)]
    playlist_source: Option<String>,

    /// Gzip-compressed XMLTV guide URL or local path
    #[arg(long)]
    guide_source: Option<String>,

    /// Where to write the tagged playlist
    #[arg(long)]
    playlist_output: Option<PathBuf>,

    /// Where to write the trimmed, gzip-compressed guide
    #[arg(long)]
    guide_output: Option<PathBuf>,

    /// Guide location written into the playlist header
    #[arg(long)]
    tvg_url: Option<String>,

    /// Lowest similarity (0 to 1) accepted as a match
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Match and report without writing any files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Only print the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            playlist_source: self.playlist_source.clone(),
            guide_source: self.guide_source.clone(),
            playlist_output: self.playlist_output.clone(),
            guide_output: self.guide_output.clone(),
            tvg_url: self.tvg_url.clone(),
            min_similarity: self.min_similarity,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!(
            "{} {e}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
        );
        std::process::exit(1);
    }
}

/// Status lines are printed bare to stdout. `RUST_LOG` overrides the level
/// picked from `-q`/`-v`.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = Settings::resolve(cli.config.as_deref(), &cli.overrides())?;
    log::debug!("Settings: {settings:?}");

    let source = HttpSource::from_settings(&settings)?;
    let options = RunOptions {
        dry_run: cli.dry_run,
    };

    let reporter = Reporter::new(cli.quiet);
    let result = epg_trim_lib::run(&settings, &source, &options, &|event| {
        reporter.handle(event)
    });
    reporter.finish();

    report::print_summary(&result?, cli.dry_run);
    Ok(())
}
