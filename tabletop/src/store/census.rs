//! Card conservation census.
//!
//! Every card id must live in exactly one container: one stack, one hand,
//! or the held selection. The census counts occurrences across all of them
//! and compares against the built deck.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::model::CardId;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConservationReport {
    /// Ids found in more than one place (or twice in one place).
    pub duplicated: Vec<CardId>,
    /// Deck ids found nowhere.
    pub missing: Vec<CardId>,
    /// Ids found somewhere that are not part of the deck.
    pub unknown: Vec<CardId>,
    pub total: usize,
}

impl ConservationReport {
    /// Count `found` against the `deck`.
    pub fn take<I>(deck: &BTreeSet<CardId>, found: I) -> Self
    where
        I: IntoIterator<Item = CardId>,
    {
        let mut counts: BTreeMap<CardId, usize> = BTreeMap::new();
        for id in found {
            *counts.entry(id).or_default() += 1;
        }
        let duplicated = counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(id, _)| *id)
            .collect();
        let missing = deck
            .iter()
            .filter(|id| !counts.contains_key(id))
            .copied()
            .collect();
        let unknown = counts
            .keys()
            .filter(|id| !deck.contains(id))
            .copied()
            .collect();
        Self {
            duplicated,
            missing,
            unknown,
            total: counts.values().sum(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.duplicated.is_empty() && self.missing.is_empty() && self.unknown.is_empty()
    }
}

fn list(ids: &[CardId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for ConservationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return write!(f, "{} cards accounted for", self.total);
        }
        write!(
            f,
            "duplicated [{}], missing [{}], unknown [{}]",
            list(&self.duplicated),
            list(&self.missing),
            list(&self.unknown)
        )
    }
}
