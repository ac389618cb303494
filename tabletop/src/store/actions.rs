//! Human-readable action log.
//!
//! Every table-mutating operation appends one entry. The log is append-only;
//! display widgets read it with [`ActionLog::since`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{model::SeatIndex, settings::LayoutPreset};

fn cards(n: usize) -> String {
    if n == 1 {
        "1 card".to_string()
    } else {
        format!("{n} cards")
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TableAction {
    Rebuilt { cards: usize, preset: LayoutPreset },
    PickedUp { count: usize },
    Placed { count: usize },
    Stacked { count: usize },
    Dealt,
    Returned { count: usize },
    MovedToHand { count: usize },
    PlayedFromHand { count: usize },
    TookFromHand { count: usize },
    ReorderedHand,
    Revealed { card: String },
    Hid { card: String },
    MovedStack { count: usize },
    Split { count: usize },
    Merged { count: usize },
    FlippedStack { count: usize },
    FlippedCard { card: String },
    Shuffled { count: usize },
    TookSeat(SeatIndex),
    LeftSeat(SeatIndex),
    Renamed { name: String },
    Joined,
}

impl fmt::Display for TableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Rebuilt { cards: n, preset } => {
                format!("reset the table ({} {preset} layout)", cards(*n))
            }
            Self::PickedUp { count } => format!("picked up {}", cards(*count)),
            Self::Placed { count } => format!("put down {}", cards(*count)),
            Self::Stacked { count } => format!("stacked {} onto a pile", cards(*count)),
            Self::Dealt => "dealt a card".to_string(),
            Self::Returned { count } => format!("put {} back", cards(*count)),
            Self::MovedToHand { count } => format!("moved {} to hand", cards(*count)),
            Self::PlayedFromHand { count } => format!("played {} from hand", cards(*count)),
            Self::TookFromHand { count } => format!("took {} from hand", cards(*count)),
            Self::ReorderedHand => "rearranged their hand".to_string(),
            Self::Revealed { card } => format!("revealed {}", card.trim()),
            Self::Hid { card } => format!("hid {}", card.trim()),
            Self::MovedStack { count } => format!("moved a stack of {}", cards(*count)),
            Self::Split { count } => format!("split {} off a stack", cards(*count)),
            Self::Merged { count } => format!("merged {} onto a stack", cards(*count)),
            Self::FlippedStack { count } => format!("flipped a stack of {}", cards(*count)),
            Self::FlippedCard { card } => format!("flipped {}", card.trim()),
            Self::Shuffled { count } => format!("shuffled {}", cards(*count)),
            Self::TookSeat(seat) => format!("sat down at seat {}", seat + 1),
            Self::LeftSeat(seat) => format!("left seat {}", seat + 1),
            Self::Renamed { name } => format!("is now known as {name}"),
            Self::Joined => "joined the table".to_string(),
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LogEntry {
    /// Display name of the acting player at the time of the action.
    pub actor: String,
    pub action: TableAction,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.actor, self.action)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    pub(crate) fn push(&mut self, entry: LogEntry) {
        log::debug!("{entry}");
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `seen`.
    #[must_use]
    pub fn since(&self, seen: usize) -> &[LogEntry] {
        self.entries.get(seen..).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display() {
        let entry = LogEntry {
            actor: "alice".to_string(),
            action: TableAction::MovedToHand { count: 2 },
        };
        assert_eq!(entry.to_string(), "alice moved 2 cards to hand");
        assert_eq!(TableAction::PickedUp { count: 1 }.to_string(), "picked up 1 card");
        assert_eq!(TableAction::TookSeat(0).to_string(), "sat down at seat 1");
    }

    #[test]
    fn test_since_is_bounded() {
        let mut log = ActionLog::default();
        log.push(LogEntry {
            actor: "bob".to_string(),
            action: TableAction::Dealt,
        });
        assert_eq!(log.since(0).len(), 1);
        assert!(log.since(1).is_empty());
        assert!(log.since(5).is_empty());
    }
}
