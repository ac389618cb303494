use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

use super::cards::CardId;

/// Type alias for seat positions around the table.
pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player{}", self.0)
    }
}

const PALETTE: [(&str, &str); 8] = [
    ("#c0392b", "#f5b7b1"),
    ("#2471a3", "#aed6f1"),
    ("#1e8449", "#a9dfbf"),
    ("#b7950b", "#f9e79f"),
    ("#7d3c98", "#d7bde2"),
    ("#ca6f1e", "#f5cba7"),
    ("#138d75", "#a3e4d7"),
    ("#566573", "#d5d8dc"),
];

/// Seat and accent colors for seat `index`, cycling through the palette.
#[must_use]
pub fn seat_palette(index: SeatIndex) -> (String, String) {
    let (seat, accent) = PALETTE[index % PALETTE.len()];
    (seat.to_string(), accent.to_string())
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat_color: String,
    pub accent_color: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Seat {
    pub index: SeatIndex,
    pub occupant: Option<PlayerId>,
    /// Position along the table boundary, always in `[0, 1)`.
    pub param: f32,
    pub seat_color: String,
    pub accent_color: String,
}

impl Seat {
    #[must_use]
    pub fn new(index: SeatIndex, param: f32) -> Self {
        let (seat_color, accent_color) = seat_palette(index);
        Self {
            index,
            occupant: None,
            param,
            seat_color,
            accent_color,
        }
    }
}

/// A seat's private hand.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hand {
    pub card_ids: Vec<CardId>,
    /// Cards the owner has chosen to show to everyone else.
    pub revealed: BTreeSet<CardId>,
}

impl Hand {
    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.card_ids.iter().position(|id| *id == card)
    }

    /// Remove `card`, dropping its reveal flag.
    pub fn remove(&mut self, card: CardId) -> Option<usize> {
        let idx = self.position_of(card)?;
        self.card_ids.remove(idx);
        self.revealed.remove(&card);
        Some(idx)
    }
}
