//! Render-facing snapshots of the table.

use serde::Serialize;
use std::collections::BTreeMap;

use super::TableState;
use crate::{
    geometry::Point,
    model::{CardId, PlayerId, SeatIndex, StackId, Zone},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackView {
    pub position: Point,
    pub rotation: f32,
    pub face_up: bool,
    pub card_ids: Vec<CardId>,
    /// Resolved face per card, parallel to `card_ids`.
    pub faces: Vec<bool>,
    pub zone: Zone,
    pub owner_seat: Option<SeatIndex>,
    pub paint_index: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandView {
    pub owner: Option<PlayerId>,
    pub card_ids: Vec<CardId>,
    /// Reveal flag per card, parallel to `card_ids`.
    pub revealed: Vec<bool>,
}

impl TableState {
    #[must_use]
    pub fn stack_views(&self) -> BTreeMap<StackId, StackView> {
        self.stacks
            .iter()
            .enumerate()
            .map(|(paint_index, stack)| {
                let faces = stack
                    .card_ids
                    .iter()
                    .map(|card| self.face_of(*card).resolve(stack.face_up))
                    .collect();
                let view = StackView {
                    position: stack.position,
                    rotation: stack.rotation,
                    face_up: stack.face_up,
                    card_ids: stack.card_ids.clone(),
                    faces,
                    zone: stack.zone,
                    owner_seat: stack.owner_seat,
                    paint_index,
                };
                (stack.id, view)
            })
            .collect()
    }

    #[must_use]
    pub fn hand_views(&self) -> BTreeMap<SeatIndex, HandView> {
        self.hands
            .iter()
            .zip(&self.seats)
            .map(|(hand, seat)| {
                let view = HandView {
                    owner: seat.occupant,
                    card_ids: hand.card_ids.clone(),
                    revealed: hand
                        .card_ids
                        .iter()
                        .map(|card| hand.revealed.contains(card))
                        .collect(),
                };
                (seat.index, view)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geometry::Rect,
        model::{PickCount, StackId},
        settings::TableSettings,
        store::TableState,
    };

    #[test]
    fn test_stack_view_resolves_pinned_faces() {
        let mut table =
            TableState::new(TableSettings::default(), Rect::new(0.0, 0.0, 1000.0, 700.0));
        let bob = table.add_player("bob");
        let card = table.stack(StackId(1)).unwrap().card_ids[0];
        table.flip_card(bob, card).unwrap();

        let views = table.stack_views();
        let view = &views[&StackId(1)];
        assert_eq!(view.paint_index, 0);
        assert!(!view.face_up);
        assert!(view.faces[0]);
        assert!(view.faces[1..].iter().all(|face| !face));
    }

    #[test]
    fn test_hand_view_tracks_reveals() {
        let mut table =
            TableState::new(TableSettings::default(), Rect::new(0.0, 0.0, 1000.0, 700.0));
        let bob = table.add_player("bob");
        table.assign_seat(1, bob).unwrap();
        table.pick_up(bob, StackId(1), PickCount::Count(2)).unwrap();
        table.held_to_hand(bob, 1).unwrap();
        let card = table.hand(1).unwrap().card_ids[1];
        table.set_revealed(bob, 1, card, true).unwrap();

        let views = table.hand_views();
        assert_eq!(views.len(), 4);
        assert_eq!(views[&1].owner, Some(bob));
        assert_eq!(views[&1].revealed, vec![false, true]);
        assert!(views[&0].card_ids.is_empty());
    }
}
