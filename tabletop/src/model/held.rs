use serde::{Deserialize, Serialize};

use super::{cards::CardId, seat::SeatIndex, stack::StackId};
use crate::geometry::Point;

/// How many cards a pickup takes off the top of a stack.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PickCount {
    Count(usize),
    Half,
    All,
}

impl PickCount {
    /// Resolve against a stack of `len` cards. Always takes at least one card
    /// from a non-empty stack and never more than it holds.
    #[must_use]
    pub fn resolve(self, len: usize) -> usize {
        let wanted = match self {
            Self::Count(n) => n,
            Self::Half => len / 2,
            Self::All => len,
        };
        wanted.clamp(1, len.max(1)).min(len)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PickupMode {
    /// The whole stack was lifted.
    Whole,
    /// Some cards were split off the top.
    Partial,
    /// Cards were dragged out of a hand.
    FromHand,
}

/// Where held cards go back to when a hold is cancelled or rejected.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum HeldOrigin {
    Stack { id: StackId, position: Point },
    Hand { seat: SeatIndex, index: usize },
}

/// Cards detached from every stack and hand, following the pointer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HeldSelection {
    /// Bottom to top, in the order they sat in their origin.
    pub card_ids: Vec<CardId>,
    pub origin: HeldOrigin,
    pub face_up: bool,
    pub mode: PickupMode,
}

impl HeldSelection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_count_resolution() {
        assert_eq!(PickCount::Count(3).resolve(10), 3);
        assert_eq!(PickCount::Count(10).resolve(4), 4);
        assert_eq!(PickCount::Count(0).resolve(4), 1);
        assert_eq!(PickCount::Half.resolve(9), 4);
        assert_eq!(PickCount::Half.resolve(1), 1);
        assert_eq!(PickCount::All.resolve(7), 7);
        assert_eq!(PickCount::All.resolve(0), 0);
    }
}
