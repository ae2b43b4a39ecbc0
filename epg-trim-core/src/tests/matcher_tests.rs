use super::*;
use crate::guide::{GuideChannel, parse_guide};

fn channel(id: &str, aliases: &[&str]) -> GuideChannel {
    GuideChannel {
        id: id.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

fn lt_guide() -> GuideChannels {
    GuideChannels::from_iter([
        channel("lrt.lt", &["LRT HD", "LRT Televizija"]),
        channel("lrt-plius.lt", &["LRT Plius"]),
        channel("tv3.lt", &["TV3", "TV3 Lietuva"]),
        channel("abc", &["ABC TV", "ABC"]),
    ])
}

#[test]
fn test_exact_alias_scores_one() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let result = matcher.best_match("LRT HD");
    assert_eq!(result.matched_id.as_deref(), Some("lrt.lt"));
    assert_eq!(result.score, 1.0);
    assert!(result.is_match());
}

#[test]
fn test_match_ignores_case() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let result = matcher.best_match("tv3 lietuva");
    assert_eq!(result.matched_id.as_deref(), Some("tv3.lt"));
    assert_eq!(result.score, 1.0);
}

#[test]
fn test_second_alias_can_match() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let result = matcher.best_match("ABC");
    assert_eq!(result.matched_id.as_deref(), Some("abc"));
    assert_eq!(result.score, 1.0);
}

#[test]
fn test_close_name_matches() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    // "lrt plius hd" vs "lrt plius": 2 * 9 / 21
    let result = matcher.best_match("LRT Plius HD");
    assert_eq!(result.matched_id.as_deref(), Some("lrt-plius.lt"));
    assert!((result.score - 18.0 / 21.0).abs() < 1e-12);
}

#[test]
fn test_unrelated_name_is_rejected_with_best_score() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let result = matcher.best_match("XYZ Random Channel 123");
    assert_eq!(result.matched_id, None);
    assert!(result.score < DEFAULT_MIN_SIMILARITY);
    assert!(result.score > 0.0);
    assert_eq!(result.playlist_name, "XYZ Random Channel 123");
}

#[test]
fn test_empty_guide_never_matches() {
    let matcher = ExhaustiveMatcher::new(&GuideChannels::new(), DEFAULT_MIN_SIMILARITY);
    let result = matcher.best_match("LRT HD");
    assert_eq!(result.matched_id, None);
    assert_eq!(result.score, 0.0);
    assert_eq!(matcher.channel_count(), 0);
}

#[test]
fn test_threshold_is_inclusive() {
    assert!(accepts(0.82, 0.82));
    assert!(!accepts(0.819999, 0.82));
    assert!(accepts(1.0, 0.82));
}

#[test]
fn test_score_exactly_at_threshold_is_accepted() {
    let alias = format!("{}{}", "a".repeat(41), "c".repeat(9));
    let guide = GuideChannels::from_iter([channel("edge", &[alias.as_str()])]);
    let matcher = ExhaustiveMatcher::new(&guide, 0.82);
    let query = format!("{}{}", "a".repeat(41), "b".repeat(9));
    let result = matcher.best_match(&query);
    assert_eq!(result.score, 0.82);
    assert_eq!(result.matched_id.as_deref(), Some("edge"));
}

#[test]
fn test_higher_threshold_rejects() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), 0.9);
    let result = matcher.best_match("LRT Plius HD");
    assert_eq!(result.matched_id, None);
    assert_eq!(matcher.min_similarity(), 0.9);
}

#[test]
fn test_tie_goes_to_smallest_id() {
    let guide = GuideChannels::from_iter([
        channel("zeta", &["Sport"]),
        channel("alpha", &["Sport"]),
        channel("mid", &["Sport"]),
    ]);
    let matcher = ExhaustiveMatcher::new(&guide, DEFAULT_MIN_SIMILARITY);
    assert_eq!(matcher.best_match("Sport").matched_id.as_deref(), Some("alpha"));

    let reversed = GuideChannels::from_iter([
        channel("mid", &["Sport"]),
        channel("alpha", &["Sport"]),
        channel("zeta", &["Sport"]),
    ]);
    let matcher = ExhaustiveMatcher::new(&reversed, DEFAULT_MIN_SIMILARITY);
    assert_eq!(matcher.best_match("Sport").matched_id.as_deref(), Some("alpha"));
}

#[test]
fn test_higher_score_beats_smaller_id() {
    let guide = GuideChannels::from_iter([channel("a", &["Sport 2"]), channel("b", &["Sport 1"])]);
    let matcher = ExhaustiveMatcher::new(&guide, DEFAULT_MIN_SIMILARITY);
    assert_eq!(matcher.best_match("Sport 1").matched_id.as_deref(), Some("b"));
}

#[test]
fn test_pruning_matches_plain_scan() {
    let guide = lt_guide();
    let matcher = ExhaustiveMatcher::new(&guide, DEFAULT_MIN_SIMILARITY);
    for name in ["LRT", "LRT Plius HD", "TV 3", "ABC News", "XYZ", "Lietuva"] {
        let mut best: Option<(&str, f64)> = None;
        for guide_channel in &guide {
            for alias in &guide_channel.aliases {
                let score = crate::similarity::similarity(name, alias);
                let replace = match best {
                    None => true,
                    Some((id, s)) => score > s || (score == s && guide_channel.id.as_str() < id),
                };
                if replace {
                    best = Some((guide_channel.id.as_str(), score));
                }
            }
        }
        let (id, score) = best.unwrap();
        let result = matcher.best_match(name);
        assert_eq!(result.score, score, "{name}");
        if score >= DEFAULT_MIN_SIMILARITY {
            assert_eq!(result.matched_id.as_deref(), Some(id), "{name}");
        }
    }
}

#[test]
fn test_match_entries_keeps_order_and_count() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let entries = vec![
        PlaylistEntry::new("TV3", "http://1"),
        PlaylistEntry::new("Unknown Thing", "http://2"),
        PlaylistEntry::new("LRT HD", "http://3"),
        PlaylistEntry::new("TV3", "http://4"),
    ];
    let results = match_entries(&matcher, &entries);
    let names: Vec<&str> = results.iter().map(|r| r.playlist_name.as_str()).collect();
    assert_eq!(names, vec!["TV3", "Unknown Thing", "LRT HD", "TV3"]);
    assert_eq!(results[0], results[3]);
    assert!(!results[1].is_match());
}

#[test]
fn test_used_ids_are_exactly_the_matched_ids() {
    let matcher = ExhaustiveMatcher::new(&lt_guide(), DEFAULT_MIN_SIMILARITY);
    let entries = vec![
        PlaylistEntry::new("LRT HD", "http://1"),
        PlaylistEntry::new("LRT Televizija", "http://2"),
        PlaylistEntry::new("Nothing Alike", "http://3"),
        PlaylistEntry::new("ABC TV", "http://4"),
    ];
    let results = match_entries(&matcher, &entries);
    let table = MatchTable::from_results(&results);

    let expected: BTreeSet<String> = results.iter().filter_map(|r| r.matched_id.clone()).collect();
    assert_eq!(table.used_ids(), &expected);
    assert_eq!(
        table.used_ids().iter().collect::<Vec<_>>(),
        vec!["abc", "lrt.lt"]
    );
    assert_eq!(table.matched_names(), 3);
    assert_eq!(table.id_for("LRT Televizija"), Some("lrt.lt"));
    assert_eq!(table.id_for("Nothing Alike"), None);
}

#[test]
fn test_matcher_over_parsed_guide() {
    let xml = r#"<tv>
<channel id="abc"><display-name>ABC TV</display-name><display-name>ABC</display-name></channel>
<channel id="xyz"><display-name>XYZ</display-name></channel>
</tv>"#;
    let matcher = ExhaustiveMatcher::new(&parse_guide(xml), DEFAULT_MIN_SIMILARITY);
    assert_eq!(matcher.best_match("ABC TV").matched_id.as_deref(), Some("abc"));
}

struct FixedMatcher;

impl ChannelMatcher for FixedMatcher {
    fn best_match(&self, name: &str) -> MatchResult {
        MatchResult {
            playlist_name: name.to_string(),
            matched_id: (name == "yes").then(|| "fixed".to_string()),
            score: 1.0,
        }
    }
}

#[test]
fn test_match_entries_accepts_any_matcher() {
    let entries = vec![PlaylistEntry::new("yes", "u1"), PlaylistEntry::new("no", "u2")];
    let matcher: &dyn ChannelMatcher = &FixedMatcher;
    let results = match_entries(matcher, &entries);
    let table = MatchTable::from_results(&results);
    assert_eq!(table.id_for("yes"), Some("fixed"));
    assert_eq!(table.used_ids().len(), 1);
}
