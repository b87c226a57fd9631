// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Top-N language ranking.

use serde::Serialize;

use crate::{language::color_for, totals::LanguageTotals};

/// Languages drawn on the SVG badge.
pub const IMAGE_TOP_N: usize = 8;
/// Languages listed in the JSON record.
pub const RECORD_TOP_N: usize = 10;

/// One language in a ranked view.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct RankedLanguageEntry
{
    /// Language name.
    pub name:        String,
    /// Amount the ranking is based on (added lines, or bytes for footprints).
    pub amount:      u64,
    /// Share of the grand total in percent, rounded to one decimal.
    pub percentage:  f64,
    /// Display color of the language.
    pub color:       &'static str,
}

/// Ranks `totals` descending by amount and keeps at most `top_n` entries.
///
/// Ties keep the ascending-name order of [`LanguageTotals`]. Percentages are
/// computed against the sum of all languages, not only the retained ones, so
/// they stay within `0.0..=100.0`.
///
/// # Examples
///
/// ```
/// use clir::{LanguageTotals, rank};
///
/// let totals: LanguageTotals = [("Python", 150,), ("Go", 90,),].into_iter().collect();
/// let ranked = rank(&totals, 8,);
///
/// assert_eq!(ranked[0].name, "Python");
/// assert_eq!(ranked[0].percentage, 62.5);
/// assert_eq!(ranked[1].percentage, 37.5);
/// ```
pub fn rank(totals: &LanguageTotals, top_n: usize,) -> Vec<RankedLanguageEntry,>
{
    let grand_total = totals.sum();

    let mut entries: Vec<RankedLanguageEntry,> = totals
        .iter()
        .map(|(name, amount,)| RankedLanguageEntry {
            name:        name.to_owned(),
            amount,
            percentage:  percentage_of(amount, grand_total,),
            color:       color_for(name,),
        },)
        .collect();

    entries.sort_by(|left, right| right.amount.cmp(&left.amount,),);
    entries.truncate(top_n,);
    entries
}

/// Returns `part` as a percentage of `total`, rounded to one decimal.
///
/// A zero total yields `0.0`.
pub fn percentage_of(part: u64, total: u64,) -> f64
{
    if total == 0 {
        return 0.0;
    }

    let raw = part as f64 / total as f64 * 100.0;
    ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0,)
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rank_orders_descending_and_assigns_colors()
    {
        let totals: LanguageTotals = [("Python", 150,), ("Go", 90,),].into_iter().collect();

        let ranked = rank(&totals, 2,);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Python");
        assert_eq!(ranked[0].amount, 150);
        assert_eq!(ranked[0].percentage, 62.5);
        assert_eq!(ranked[0].color, "#3572A5");
        assert_eq!(ranked[1].name, "Go");
        assert_eq!(ranked[1].percentage, 37.5);
        assert_eq!(ranked[1].color, "#00ADD8");
    }

    #[test]
    fn rank_breaks_ties_by_name_order()
    {
        let totals: LanguageTotals = [("Rust", 10,), ("C", 10,), ("Go", 10,),].into_iter().collect();

        let names: Vec<String,> = rank(&totals, 3,).into_iter().map(|entry| entry.name,).collect();

        assert_eq!(names, vec!["C", "Go", "Rust"]);
    }

    #[test]
    fn rank_truncates_but_keeps_grand_total_percentages()
    {
        let totals: LanguageTotals =
            [("A", 50,), ("B", 30,), ("C", 20,),].into_iter().collect();

        let ranked = rank(&totals, 2,);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].percentage, 50.0);
        assert_eq!(ranked[1].percentage, 30.0);
    }

    #[test]
    fn rank_of_empty_totals_is_empty()
    {
        assert!(rank(&LanguageTotals::new(), IMAGE_TOP_N,).is_empty());
    }

    #[test]
    fn percentage_rounds_to_one_decimal()
    {
        assert_eq!(percentage_of(1, 3,), 33.3);
        assert_eq!(percentage_of(2, 3,), 66.7);
        assert_eq!(percentage_of(0, 0,), 0.0);
        assert_eq!(percentage_of(5, 5,), 100.0);
    }

    proptest! {
        #[test]
        fn ranked_output_is_sorted_and_bounded(
            amounts in prop::collection::btree_map("[A-Z][a-z]{0,6}", 0u64..10_000, 0..20),
            top_n in 0usize..12,
        ) {
            let totals: LanguageTotals = amounts.iter().map(|(name, amount)| (name.as_str(), *amount)).collect();
            let ranked = rank(&totals, top_n);

            prop_assert!(ranked.len() <= top_n);
            prop_assert!(ranked.len() <= totals.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].amount >= pair[1].amount);
            }
            for entry in &ranked {
                prop_assert!((0.0..=100.0).contains(&entry.percentage));
            }
        }

        #[test]
        fn percentages_sum_to_hundred_within_rounding(
            amounts in prop::collection::btree_map("[A-Z][a-z]{0,6}", 1u64..10_000, 1..20),
        ) {
            let totals: LanguageTotals = amounts.iter().map(|(name, amount)| (name.as_str(), *amount)).collect();
            let ranked = rank(&totals, usize::MAX);

            let sum: f64 = ranked.iter().map(|entry| entry.percentage).sum();
            let tolerance = 0.1 * ranked.len() as f64 + 1e-9;
            prop_assert!((sum - 100.0).abs() <= tolerance, "sum {} outside tolerance {}", sum, tolerance);
        }
    }
}
