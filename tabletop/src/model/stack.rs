use serde::{Deserialize, Serialize};
use std::fmt;

use super::{cards::CardId, seat::SeatIndex};
use crate::geometry::{Point, Rect, Size};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StackId(pub u32);

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a stack sits relative to the seats' hand zones.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Zone {
    #[default]
    Table,
    Hand,
}

/// An ordered pile of cards rendered as one object. The last card id is the
/// visible top.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Stack {
    pub id: StackId,
    /// Top-left corner of the card footprint.
    pub position: Point,
    pub rotation: f32,
    pub face_up: bool,
    pub card_ids: Vec<CardId>,
    pub zone: Zone,
    pub owner_seat: Option<SeatIndex>,
}

impl Stack {
    #[must_use]
    pub fn new(id: StackId, position: Point, face_up: bool, card_ids: Vec<CardId>) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            face_up,
            card_ids,
            zone: Zone::Table,
            owner_seat: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<CardId> {
        self.card_ids.last().copied()
    }

    #[must_use]
    pub fn bounds(&self, footprint: Size) -> Rect {
        Rect::from_origin(self.position, footprint)
    }

    #[must_use]
    pub fn center(&self, footprint: Size) -> Point {
        self.position + footprint.half()
    }
}
