// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-language counters accumulated while scanning.

use std::collections::BTreeMap;

use serde::Serialize;

/// Mapping from language name to an accumulated, never-decremented count.
///
/// The map is ordered by language name, which makes iteration (and therefore
/// ranking ties) deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
#[serde(transparent)]
pub struct LanguageTotals(BTreeMap<String, u64,>,);

impl LanguageTotals
{
    /// Creates an empty set of totals.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Adds `amount` to the counter for `language`.
    pub fn add(&mut self, language: &str, amount: u64,)
    {
        if let Some(counter,) = self.0.get_mut(language,) {
            *counter = counter.saturating_add(amount,);
        } else {
            self.0.insert(language.to_owned(), amount,);
        }
    }

    /// Adds every counter of `other` into `self`.
    pub fn merge(&mut self, other: &LanguageTotals,)
    {
        for (language, amount,) in other.iter() {
            self.add(language, amount,);
        }
    }

    /// Returns the counter for `language`, or zero when absent.
    pub fn get(&self, language: &str,) -> u64
    {
        self.0.get(language,).copied().unwrap_or(0,)
    }

    /// Sum of all counters.
    pub fn sum(&self,) -> u64
    {
        self.0.values().fold(0u64, |acc, amount| acc.saturating_add(*amount,),)
    }

    /// Number of distinct languages.
    pub fn len(&self,) -> usize
    {
        self.0.len()
    }

    /// Returns `true` when no language has been recorded.
    pub fn is_empty(&self,) -> bool
    {
        self.0.is_empty()
    }

    /// Iterates over `(language, amount)` pairs in ascending name order.
    pub fn iter(&self,) -> impl Iterator<Item = (&str, u64,),> + '_
    {
        self.0.iter().map(|(language, amount,)| (language.as_str(), *amount,),)
    }
}

impl<S,> FromIterator<(S, u64,),> for LanguageTotals
where
    S: AsRef<str,>,
{
    fn from_iter<I: IntoIterator<Item = (S, u64,),>,>(iter: I,) -> Self
    {
        let mut totals = Self::new();
        for (language, amount,) in iter {
            totals.add(language.as_ref(), amount,);
        }
        totals
    }
}
