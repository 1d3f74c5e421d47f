use crate::models::{Dream, DreamSignStat, WordCloudEntry};
use std::collections::{HashMap, HashSet};

pub const WORD_CLOUD_TIERS: usize = 6;

const TIER_FONT_SIZES: [&str; WORD_CLOUD_TIERS] =
    ["2.4rem", "2rem", "1.7rem", "1.4rem", "1.15rem", "0.95rem"];
const TIER_COLORS: [&str; WORD_CLOUD_TIERS] =
    ["#c084fc", "#a78bfa", "#818cf8", "#60a5fa", "#94a3b8", "#64748b"];

/// Normalized signs of one dream, paired with their first spelling in that dream.
fn dream_sign_set(dream: &Dream) -> Vec<(String, &str)> {
    let mut seen = HashSet::new();
    dream
        .dream_signs
        .entries()
        .into_iter()
        .filter_map(|entry| {
            let key = entry.to_lowercase();
            seen.insert(key.clone()).then_some((key, entry))
        })
        .collect()
}

pub fn distinct_sign_count(dreams: &[Dream]) -> usize {
    dreams
        .iter()
        .flat_map(|dream| dream_sign_set(dream).into_iter().map(|(key, _)| key))
        .collect::<HashSet<_>>()
        .len()
}

/// Tallies every sign across the journal, most frequent first.
///
/// Each dream contributes at most once per sign. The displayed spelling is the
/// first one seen in journal order.
pub fn analyze(dreams: &[Dream]) -> Vec<DreamSignStat> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats: Vec<DreamSignStat> = Vec::new();

    for dream in dreams {
        for (key, spelling) in dream_sign_set(dream) {
            let slot = *index.entry(key).or_insert_with(|| {
                stats.push(DreamSignStat {
                    sign: spelling.to_string(),
                    total: 0,
                    lucid: 0,
                    lucidity_rate: 0.0,
                });
                stats.len() - 1
            });
            let stat = &mut stats[slot];
            stat.total += 1;
            if dream.is_lucid {
                stat.lucid += 1;
            }
        }
    }

    for stat in &mut stats {
        stat.lucidity_rate = if stat.total == 0 {
            0.0
        } else {
            f64::from(stat.lucid) / f64::from(stat.total)
        };
    }

    stats.sort_by(|a, b| b.total.cmp(&a.total));
    stats
}

/// Buckets ranked signs into six display tiers of `ceil(n / 6)` signs each.
pub fn word_cloud(stats: &[DreamSignStat]) -> Vec<WordCloudEntry> {
    if stats.is_empty() {
        return Vec::new();
    }
    let tier_size = stats.len().div_ceil(WORD_CLOUD_TIERS);

    stats
        .iter()
        .enumerate()
        .map(|(rank, stat)| {
            let tier = (rank / tier_size).min(WORD_CLOUD_TIERS - 1);
            WordCloudEntry {
                sign: stat.sign.clone(),
                total: stat.total,
                tier: tier + 1,
                font_size: TIER_FONT_SIZES[tier],
                color: TIER_COLORS[tier],
            }
        })
        .collect()
}

/// Signs that have triggered lucidity at least once, best trigger first.
pub fn effectiveness(stats: &[DreamSignStat]) -> Vec<DreamSignStat> {
    let mut effective: Vec<DreamSignStat> =
        stats.iter().filter(|stat| stat.lucid > 0).cloned().collect();
    effective.sort_by(|a, b| b.lucidity_rate.total_cmp(&a.lucidity_rate));
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DreamSigns;
    use crate::test_support::{date, dream_on};

    #[test]
    fn repeated_sign_in_one_dream_counts_once() {
        let dreams = vec![dream_on(date(2026, 3, 1), false, "Flying, flying, FLYING")];
        let stats = analyze(&dreams);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].sign, "Flying");
        assert_eq!(stats[0].total, 1);
    }

    #[test]
    fn first_spelling_wins_across_dreams() {
        let dreams = vec![
            dream_on(date(2026, 3, 1), false, "teeth falling"),
            dream_on(date(2026, 3, 2), true, "Teeth Falling, water"),
        ];
        let stats = analyze(&dreams);
        assert_eq!(stats[0].sign, "teeth falling");
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].lucid, 1);
        assert_eq!(stats[0].lucidity_rate, 0.5);
        assert_eq!(stats[1].sign, "water");
    }

    #[test]
    fn list_signs_are_normalized_like_text() {
        let mut dream = dream_on(date(2026, 3, 1), true, "");
        dream.dream_signs = DreamSigns::List(vec!["Water ".into(), "water".into(), "Mirror".into()]);
        let stats = analyze(&[dream]);
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|stat| stat.total == 1 && stat.lucid == 1));
        assert_eq!(distinct_sign_count(&[dream_on(date(2026, 3, 1), false, "a, A, b")]), 2);
    }

    #[test]
    fn lucidity_rate_stays_within_bounds() {
        let dreams = vec![
            dream_on(date(2026, 3, 1), true, "flying, school"),
            dream_on(date(2026, 3, 2), false, "school"),
            dream_on(date(2026, 3, 3), true, "SCHOOL, exam"),
            dream_on(date(2026, 3, 4), false, ""),
        ];
        for stat in analyze(&dreams) {
            assert!(stat.lucid <= stat.total);
            assert!((0.0..=1.0).contains(&stat.lucidity_rate));
        }
    }

    #[test]
    fn word_cloud_tiers_follow_rank() {
        let signs = (0..12)
            .map(|n| format!("sign{n}"))
            .collect::<Vec<_>>();
        let dreams: Vec<Dream> = signs
            .iter()
            .enumerate()
            .flat_map(|(rank, sign)| {
                (0..(12 - rank)).map(move |_| dream_on(date(2026, 3, 1), false, sign))
            })
            .collect();
        let cloud = word_cloud(&analyze(&dreams));
        assert_eq!(cloud.len(), 12);
        assert_eq!(cloud[0].tier, 1);
        assert_eq!(cloud[1].tier, 1);
        assert_eq!(cloud[2].tier, 2);
        assert_eq!(cloud[11].tier, 6);
        assert_eq!(cloud[11].font_size, TIER_FONT_SIZES[5]);
    }

    #[test]
    fn effectiveness_lists_only_lucid_triggers() {
        let dreams = vec![
            dream_on(date(2026, 3, 1), true, "flying"),
            dream_on(date(2026, 3, 2), false, "flying, water"),
            dream_on(date(2026, 3, 3), true, "mirror"),
        ];
        let effective = effectiveness(&analyze(&dreams));
        let names: Vec<&str> = effective.iter().map(|stat| stat.sign.as_str()).collect();
        assert_eq!(names, vec!["mirror", "flying"]);
    }
}
