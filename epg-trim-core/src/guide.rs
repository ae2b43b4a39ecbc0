//! XMLTV guide scanning and projection.
//!
//! The guide is handled as text rather than parsed as XML: guides are large
//! and very regular, and scanning keeps every retained `<channel>` and
//! `<programme>` block byte-for-byte identical in the output. Malformed input
//! never errors, it just yields fewer blocks.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::{self, Write};
use std::sync::LazyLock;

use regex::Regex;

/// Header used when the document has no recognizable `<tv>` opening tag.
pub const FALLBACK_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?><tv>"#;

/// Closing root tag appended to every projected guide.
pub const CLOSING_TAG: &str = "</tv>";

// Opening tags end in `[^/>]` so self-closing elements never open a span.
static CHANNEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<channel\s+id="([^"]*)"(?:\s[^>]*[^/>])?\s*>(.*?)</channel>"#)
        .expect("static pattern")
});

static DISPLAY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<display-name(?:\s[^>]*[^/>])?\s*>(.*?)</display-name>")
        .expect("static pattern")
});

static PROGRAMME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<programme(\s[^>]*[^/>])?\s*>.*?</programme>").expect("static pattern")
});

static CHANNEL_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bchannel="([^"]*)""#).expect("static pattern"));

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A.*?<tv(?:\s[^>]*)?>").expect("static pattern"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// A guide channel and the display names it is known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideChannel {
    pub id: String,
    /// Display names in document order. Never empty.
    pub aliases: Vec<String>,
}

/// Guide channels in document order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct GuideChannels {
    channels: Vec<GuideChannel>,
    by_id: HashMap<String, usize>,
}

impl GuideChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel. A repeated id replaces the earlier aliases but keeps
    /// the earlier position.
    pub fn insert(&mut self, channel: GuideChannel) {
        match self.by_id.get(&channel.id) {
            Some(&i) => {
                log::debug!("Duplicate guide channel id '{}', keeping last", channel.id);
                self.channels[i] = channel;
            }
            None => {
                self.by_id.insert(channel.id.clone(), self.channels.len());
                self.channels.push(channel);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&GuideChannel> {
        self.by_id.get(id).map(|&i| &self.channels[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GuideChannel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<'a> IntoIterator for &'a GuideChannels {
    type Item = &'a GuideChannel;
    type IntoIter = std::slice::Iter<'a, GuideChannel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}

impl FromIterator<GuideChannel> for GuideChannels {
    fn from_iter<I: IntoIterator<Item = GuideChannel>>(iter: I) -> Self {
        let mut channels = Self::new();
        for channel in iter {
            channels.insert(channel);
        }
        channels
    }
}

/// A `<channel>` element as it appears in the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBlock<'a> {
    pub id: &'a str,
    /// Content between the opening and closing tags.
    pub inner: &'a str,
    /// The whole element, tags included.
    pub raw: &'a str,
}

/// A `<programme>` element as it appears in the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgrammeBlock<'a> {
    /// Value of the `channel` attribute on the opening tag, if any.
    pub channel: Option<&'a str>,
    /// The whole element, tags included.
    pub raw: &'a str,
}

/// Scan every `<channel id="...">...</channel>` block in document order.
pub fn channel_blocks(xml: &str) -> impl Iterator<Item = ChannelBlock<'_>> {
    CHANNEL_RE.captures_iter(xml).filter_map(|caps| {
        Some(ChannelBlock {
            id: caps.get(1)?.as_str(),
            inner: caps.get(2)?.as_str(),
            raw: caps.get(0)?.as_str(),
        })
    })
}

/// Scan every `<programme ...>...</programme>` block in document order.
///
/// Programmes are siblings of channels, so this is a separate pass over the
/// whole document.
pub fn programme_blocks(xml: &str) -> impl Iterator<Item = ProgrammeBlock<'_>> {
    PROGRAMME_RE.captures_iter(xml).filter_map(|caps| {
        let channel = caps
            .get(1)
            .and_then(|attrs| CHANNEL_ATTR_RE.captures(attrs.as_str()))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        Some(ProgrammeBlock {
            channel,
            raw: caps.get(0)?.as_str(),
        })
    })
}

/// Everything up to and including the `<tv ...>` root tag, or
/// [`FALLBACK_HEADER`] when there is none.
pub fn guide_header(xml: &str) -> &str {
    match HEADER_RE.find(xml) {
        Some(m) => m.as_str(),
        None => {
            log::warn!("Guide has no <tv> root tag, using a minimal header");
            FALLBACK_HEADER
        }
    }
}

/// Extract the channel id -> display names mapping from a guide document.
///
/// Channels without any usable display name are dropped, since they can
/// never be matched.
pub fn parse_guide(xml: &str) -> GuideChannels {
    let mut channels = GuideChannels::new();

    for block in channel_blocks(xml) {
        let aliases = display_names(block.inner);
        if aliases.is_empty() {
            log::debug!("Guide channel '{}' has no display names, skipping", block.id);
            continue;
        }
        channels.insert(GuideChannel {
            id: block.id.to_string(),
            aliases,
        });
    }

    if channels.is_empty() {
        log::warn!("No named channels found in guide");
    }
    channels
}

/// All non-empty `<display-name>` texts inside a channel body.
fn display_names(inner: &str) -> Vec<String> {
    DISPLAY_NAME_RE
        .captures_iter(inner)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_display_name(m.as_str()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Unescape entities, collapse whitespace runs and trim.
fn clean_display_name(raw: &str) -> String {
    let text = quick_xml::escape::unescape(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// What a guide projection emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    pub channels: usize,
    pub programmes: usize,
}

/// Write the guide restricted to `used` ids.
///
/// Output is the original header, the kept channel blocks, the kept
/// programme blocks and a closing `</tv>`, joined by newlines. Blocks are
/// copied verbatim. A programme is kept only if its channel block was
/// emitted, so an id with no channel block contributes nothing.
pub fn project_guide<W: Write + ?Sized>(
    xml: &str,
    used: &BTreeSet<String>,
    out: &mut W,
) -> io::Result<ProjectionStats> {
    let mut stats = ProjectionStats::default();
    let mut emitted: HashSet<&str> = HashSet::new();

    out.write_all(guide_header(xml).as_bytes())?;

    for block in channel_blocks(xml) {
        if used.contains(block.id) {
            out.write_all(b"\n")?;
            out.write_all(block.raw.as_bytes())?;
            emitted.insert(block.id);
            stats.channels += 1;
        }
    }

    for block in programme_blocks(xml) {
        if block.channel.is_some_and(|id| emitted.contains(id)) {
            out.write_all(b"\n")?;
            out.write_all(block.raw.as_bytes())?;
            stats.programmes += 1;
        }
    }

    out.write_all(b"\n")?;
    out.write_all(CLOSING_TAG.as_bytes())?;
    Ok(stats)
}

/// [`project_guide`] into a `String`.
pub fn project_guide_to_string(xml: &str, used: &BTreeSet<String>) -> (String, ProjectionStats) {
    let mut buf = Vec::with_capacity(xml.len() / 4);
    // Writing into a Vec cannot fail.
    let stats = project_guide(xml, used, &mut buf).unwrap_or_default();
    let text = String::from_utf8(buf)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
    (text, stats)
}

#[cfg(test)]
#[path = "tests/guide_tests.rs"]
mod tests;
