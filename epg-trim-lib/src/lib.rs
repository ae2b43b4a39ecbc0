//! Fetching, configuration and output for epg-trim.
//!
//! The matching engine lives in `epg-trim-core`; this crate wires it to the
//! network, the filesystem and the config file.

pub mod error;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod settings;

pub use error::{FetchError, PipelineError, SettingsError};
pub use fetch::{DocumentSource, HttpSource};
pub use pipeline::{RunOptions, RunSummary, run};
pub use progress::{Document, Progress};
pub use settings::{Settings, SettingsOverrides, settings_path};

pub use epg_trim_core;
