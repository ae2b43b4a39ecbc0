use std::collections::{BTreeSet, HashMap};

use crate::guide::GuideChannels;
use crate::playlist::PlaylistEntry;
use crate::similarity::{PreparedName, fold};

/// Lowest similarity accepted as a match.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.82;

/// Outcome of matching one playlist name against the guide.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub playlist_name: String,
    /// Guide channel id, present only when `score` reached the threshold.
    pub matched_id: Option<String>,
    /// Best score seen, even when it was rejected.
    pub score: f64,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.matched_id.is_some()
    }
}

/// Whether `score` passes the acceptance threshold. The boundary is inclusive.
pub fn accepts(score: f64, min_similarity: f64) -> bool {
    score >= min_similarity
}

/// Finds the guide channel for a playlist name.
///
/// Implementations may index or block the guide however they like, but must
/// return the same result as scoring every alias of every channel.
pub trait ChannelMatcher {
    fn best_match(&self, name: &str) -> MatchResult;
}

/// Scores a name against every alias of every guide channel.
///
/// Aliases are lowercased and indexed once up front. Aliases whose cheap
/// upper bound is already below the best score are skipped, which never
/// changes the result.
pub struct ExhaustiveMatcher {
    channels: Vec<(String, Vec<PreparedName>)>,
    min_similarity: f64,
}

impl ExhaustiveMatcher {
    pub fn new(guide: &GuideChannels, min_similarity: f64) -> Self {
        let channels = guide
            .iter()
            .map(|channel| {
                let aliases = channel.aliases.iter().map(|a| PreparedName::new(a)).collect();
                (channel.id.clone(), aliases)
            })
            .collect();
        Self {
            channels,
            min_similarity,
        }
    }

    pub fn min_similarity(&self) -> f64 {
        self.min_similarity
    }

    /// Number of channels that can be matched.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl ChannelMatcher for ExhaustiveMatcher {
    /// Highest-scoring channel for `name`. Ties at the top score go to the
    /// lexicographically smallest id, whatever the guide order.
    fn best_match(&self, name: &str) -> MatchResult {
        let query = fold(name);
        let mut best: Option<&str> = None;
        let mut best_score = 0.0;

        for (id, aliases) in &self.channels {
            for alias in aliases {
                if best.is_some()
                    && (alias.real_quick_ratio(&query) < best_score
                        || alias.quick_ratio(&query) < best_score)
                {
                    continue;
                }
                let score = alias.ratio(&query);
                let better = match best {
                    None => true,
                    Some(current) => {
                        score > best_score || (score == best_score && id.as_str() < current)
                    }
                };
                if better {
                    best = Some(id.as_str());
                    best_score = score;
                }
            }
        }

        let matched_id = best
            .filter(|_| accepts(best_score, self.min_similarity))
            .map(str::to_string);

        MatchResult {
            playlist_name: name.to_string(),
            matched_id,
            score: best_score,
        }
    }
}

/// Match every playlist entry, in order. Repeated names are scored once.
pub fn match_entries<M: ChannelMatcher + ?Sized>(
    matcher: &M,
    entries: &[PlaylistEntry],
) -> Vec<MatchResult> {
    let mut seen: HashMap<&str, MatchResult> = HashMap::new();
    entries
        .iter()
        .map(|entry| {
            seen.entry(entry.name.as_str())
                .or_insert_with(|| matcher.best_match(&entry.name))
                .clone()
        })
        .collect()
}

/// Playlist name -> guide id mapping plus the set of ids in use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTable {
    by_name: HashMap<String, String>,
    used_ids: BTreeSet<String>,
}

impl MatchTable {
    /// Build the table from match results; unmatched results are ignored.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Self {
        let mut table = Self::default();
        for result in results {
            if let Some(ref id) = result.matched_id {
                table.by_name.insert(result.playlist_name.clone(), id.clone());
                table.used_ids.insert(id.clone());
            }
        }
        table
    }

    /// Inferred guide id for a playlist name.
    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Every id that at least one playlist entry matched.
    pub fn used_ids(&self) -> &BTreeSet<String> {
        &self.used_ids
    }

    /// Number of distinct playlist names with a match.
    pub fn matched_names(&self) -> usize {
        self.by_name.len()
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
