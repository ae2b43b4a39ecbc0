//! Character-level name similarity.
//!
//! Scores are Ratcliff/Obershelp ratios: find the longest common run of
//! characters, recurse on the pieces to its left and right, and report
//! `2 * matched / (len_a + len_b)`. Comparison is case-insensitive and works
//! on Unicode scalar values, not bytes or tokens.

use std::collections::HashMap;

/// Names at least this long get the popular-character heuristic.
const POPULAR_MIN_LEN: usize = 200;

/// Case-insensitive similarity of two names, in `[0, 1]`.
///
/// Identical names (ignoring case) score `1.0`, and so do two empty names.
///
/// ```
/// use epg_trim_core::similarity;
///
/// assert_eq!(similarity("LRT HD", "lrt hd"), 1.0);
/// assert!(similarity("LRT HD", "LRT Plius") < 0.82);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    PreparedName::new(b).ratio(&fold(a))
}

/// Lowercase a name and split it into characters.
pub fn fold(name: &str) -> Vec<char> {
    name.to_lowercase().chars().collect()
}

/// A lowercased name with a character position index, so it can be scored
/// against many queries without re-indexing.
#[derive(Debug, Clone)]
pub struct PreparedName {
    chars: Vec<char>,
    /// Character -> ascending positions, minus popular characters.
    positions: HashMap<char, Vec<usize>>,
    /// Full character histogram, used by `quick_ratio`.
    counts: HashMap<char, usize>,
}

impl PreparedName {
    pub fn new(name: &str) -> Self {
        let chars = fold(name);
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in chars.iter().enumerate() {
            positions.entry(c).or_default().push(j);
        }

        let counts = positions.iter().map(|(&c, js)| (c, js.len())).collect();

        if chars.len() >= POPULAR_MIN_LEN {
            let limit = chars.len() / 100 + 1;
            positions.retain(|_, js| js.len() <= limit);
        }

        Self {
            chars,
            positions,
            counts,
        }
    }

    /// Number of characters after lowercasing.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Similarity ratio of an already folded query against this name.
    pub fn ratio(&self, query: &[char]) -> f64 {
        ratio_of(self.matching_characters(query), query.len() + self.chars.len())
    }

    /// Upper bound on `ratio` from the lengths alone.
    pub fn real_quick_ratio(&self, query: &[char]) -> f64 {
        let shorter = query.len().min(self.chars.len());
        ratio_of(shorter, query.len() + self.chars.len())
    }

    /// Upper bound on `ratio` from shared characters, ignoring order.
    pub fn quick_ratio(&self, query: &[char]) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut shared = 0;
        for c in query {
            let left = available
                .entry(*c)
                .or_insert_with(|| self.counts.get(c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                shared += 1;
            }
        }
        ratio_of(shared, query.len() + self.chars.len())
    }

    /// Total size of all matching blocks between `query` and this name.
    fn matching_characters(&self, query: &[char]) -> usize {
        let mut pending = vec![(0, query.len(), 0, self.chars.len())];
        let mut total = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(query, alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }

    /// Longest common block of `a[alo..ahi]` and `self.chars[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in the
    /// name. Returns `(start_in_a, start_in_name, size)`.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.chars;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // Run length of the block ending at name position j, for the previous row of `a`.
        let mut run_ending: HashMap<usize, usize> = HashMap::new();
        let mut next_run: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            next_run.clear();
            if let Some(js) = self.positions.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let size = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, size);
                    if size > best_size {
                        best_i = i + 1 - size;
                        best_j = j + 1 - size;
                        best_size = size;
                    }
                }
            }
            std::mem::swap(&mut run_ending, &mut next_run);
        }

        // Popular characters never seed a block but may still extend one.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn ratio_of(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / total as f64
}

#[cfg(test)]
#[path = "tests/similarity_tests.rs"]
mod tests;
