//! Deck population and initial layouts.
//!
//! Building is deterministic: the same settings and felt always yield the
//! same card ids, stack ids and positions. Every placement goes through the
//! felt clamp, so no built stack starts off the table.

use std::collections::BTreeMap;

use crate::{
    geometry::{Felt, Point, Size},
    model::{Card, CardColor, CardId, Rank, Stack, StackId, Suit},
    settings::{LayoutPreset, TableSettings},
};

pub const CARDS_PER_DECK: usize = 52;
pub const JOKERS_PER_DECK: usize = 2;
pub const SOLITAIRE_COLUMNS: usize = 7;

/// Fallback surface width for grid layouts on an unbounded felt.
const UNBOUNDED_GRID_WIDTH: f32 = 1200.0;

/// Hands out stack ids, starting from 1 on every rebuild.
#[derive(Debug)]
pub struct StackIdCounter(u32);

impl Default for StackIdCounter {
    fn default() -> Self {
        Self(1)
    }
}

impl StackIdCounter {
    pub fn next_id(&mut self) -> StackId {
        let id = StackId(self.0);
        self.0 += 1;
        id
    }
}

/// Result of a rebuild: the card population and the initial stacks in
/// paint order.
#[derive(Debug)]
pub struct BuiltTable {
    pub cards: BTreeMap<CardId, Card>,
    pub stacks: Vec<Stack>,
    pub ids: StackIdCounter,
}

/// Every card for `deck_count` decks, ids assigned sequentially from zero.
/// Each deck is ordered by suit then rank, with its jokers last.
#[must_use]
pub fn build_cards(deck_count: usize, include_jokers: bool) -> Vec<Card> {
    let per_deck = CARDS_PER_DECK + if include_jokers { JOKERS_PER_DECK } else { 0 };
    let mut cards = Vec::with_capacity(per_deck * deck_count);
    let mut next = 0u32;
    let mut id = || {
        let id = CardId(next);
        next += 1;
        id
    };
    for _ in 0..deck_count {
        for suit in Suit::STANDARD {
            for rank in Rank::STANDARD {
                cards.push(Card::new(id(), rank, suit));
            }
        }
        if include_jokers {
            cards.push(Card::joker(id(), CardColor::Red));
            cards.push(Card::joker(id(), CardColor::Black));
        }
    }
    cards
}

/// Left edge of a row of `count` footprints separated by `gap`, centered
/// on `center_x`.
fn row_start(center_x: f32, count: usize, footprint: Size, gap: f32) -> f32 {
    let count = count as f32;
    let width = count * footprint.width + (count - 1.0).max(0.0) * gap;
    center_x - width / 2.0
}

#[must_use]
pub fn build_layout(settings: &TableSettings, felt: &Felt) -> BuiltTable {
    let cards = build_cards(settings.deck_count, settings.include_jokers);
    let footprint = settings.tuning.footprint();
    let gap = settings.tuning.stack_gap_px;
    let mut ids = StackIdCounter::default();

    let stacks = match settings.preset {
        LayoutPreset::Standard => {
            standard_layout(&cards, settings, felt, footprint, gap, &mut ids)
        }
        LayoutPreset::Solitaire => solitaire_layout(&cards, felt, footprint, gap, &mut ids),
        LayoutPreset::Grid => grid_layout(&cards, felt, footprint, gap, &mut ids),
    };

    BuiltTable {
        cards: cards.into_iter().map(|card| (card.id, card)).collect(),
        stacks,
        ids,
    }
}

fn standard_layout(
    cards: &[Card],
    settings: &TableSettings,
    felt: &Felt,
    footprint: Size,
    gap: f32,
    ids: &mut StackIdCounter,
) -> Vec<Stack> {
    let deck_count = settings.deck_count.max(1);
    let per_deck = cards.len() / deck_count;
    if per_deck == 0 {
        return Vec::new();
    }
    let center = felt.center();
    let start_x = row_start(center.x, deck_count, footprint, gap);
    let y = center.y - footprint.height / 2.0;

    cards
        .chunks(per_deck)
        .enumerate()
        .map(|(i, deck)| {
            let x = start_x + i as f32 * (footprint.width + gap);
            let position = felt.clamp_origin(Point::new(x, y), footprint);
            let card_ids = deck.iter().map(|card| card.id).collect();
            Stack::new(ids.next_id(), position, !settings.reset_face_down, card_ids)
        })
        .collect()
}

fn solitaire_layout(
    cards: &[Card],
    felt: &Felt,
    footprint: Size,
    gap: f32,
    ids: &mut StackIdCounter,
) -> Vec<Stack> {
    let center = felt.center();
    let start_x = row_start(center.x, SOLITAIRE_COLUMNS, footprint, gap);
    let top = center.y - (2.0 * footprint.height + gap) / 2.0;
    let column_y = top + footprint.height + gap;

    let mut stacks = Vec::with_capacity(SOLITAIRE_COLUMNS + 1);
    let mut remaining = cards;
    for column in 0..SOLITAIRE_COLUMNS {
        let size = (column + 1).min(remaining.len());
        if size == 0 {
            break;
        }
        let (dealt, rest) = remaining.split_at(size);
        remaining = rest;
        let x = start_x + column as f32 * (footprint.width + gap);
        let position = felt.clamp_origin(Point::new(x, column_y), footprint);
        stacks.push(Stack::new(
            ids.next_id(),
            position,
            true,
            dealt.iter().map(|card| card.id).collect(),
        ));
    }

    if !remaining.is_empty() {
        let position = felt.clamp_origin(Point::new(start_x, top), footprint);
        stacks.push(Stack::new(
            ids.next_id(),
            position,
            false,
            remaining.iter().map(|card| card.id).collect(),
        ));
    }
    stacks
}

fn grid_layout(
    cards: &[Card],
    felt: &Felt,
    footprint: Size,
    gap: f32,
    ids: &mut StackIdCounter,
) -> Vec<Stack> {
    let (origin, width) = match felt.bounds.filter(|b| !b.is_empty()) {
        Some(bounds) => (Point::new(bounds.x + gap, bounds.y + gap), bounds.width),
        None => {
            let center = felt.center();
            (
                Point::new(center.x - UNBOUNDED_GRID_WIDTH / 2.0, center.y),
                UNBOUNDED_GRID_WIDTH,
            )
        }
    };
    let cell = Size::new(footprint.width + gap, footprint.height + gap);
    let columns = (((width - gap) / cell.width).floor() as usize).max(1);

    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let (row, column) = (i / columns, i % columns);
            let raw = origin + Point::new(column as f32 * cell.width, row as f32 * cell.height);
            let position = felt.clamp_origin(raw, footprint);
            Stack::new(ids.next_id(), position, true, vec![card.id])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, TableShape};

    fn felt() -> Felt {
        Felt::new(Rect::new(0.0, 0.0, 1200.0, 800.0), TableShape::Rectangle)
    }

    #[test]
    fn test_build_cards_counts_and_ids() {
        let cards = build_cards(2, true);
        assert_eq!(cards.len(), 108);
        assert!(cards.iter().enumerate().all(|(i, c)| c.id == CardId(i as u32)));
        assert_eq!(cards.iter().filter(|c| c.is_joker()).count(), 4);
    }

    #[test]
    fn test_standard_layout_one_stack_per_deck() {
        let settings = TableSettings {
            deck_count: 3,
            ..TableSettings::default()
        };
        let built = build_layout(&settings, &felt());
        assert_eq!(built.stacks.len(), 3);
        assert!(built.stacks.iter().all(|s| s.len() == 52 && !s.face_up));
        let ids: Vec<_> = built.stacks.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![StackId(1), StackId(2), StackId(3)]);
        // side by side, left to right
        assert!(built.stacks[0].position.x < built.stacks[1].position.x);
        assert_eq!(built.stacks[0].position.y, built.stacks[2].position.y);
    }

    #[test]
    fn test_standard_layout_face_up_when_not_reset_face_down() {
        let settings = TableSettings {
            reset_face_down: false,
            include_jokers: true,
            ..TableSettings::default()
        };
        let built = build_layout(&settings, &felt());
        assert_eq!(built.stacks.len(), 1);
        assert!(built.stacks[0].face_up);
        assert_eq!(built.stacks[0].len(), 54);
    }

    #[test]
    fn test_grid_layout_places_every_card_on_the_felt() {
        let settings = TableSettings {
            preset: LayoutPreset::Grid,
            ..TableSettings::default()
        };
        let felt = felt();
        let built = build_layout(&settings, &felt);
        let footprint = settings.tuning.footprint();
        assert_eq!(built.stacks.len(), 52);
        for stack in &built.stacks {
            assert_eq!(stack.len(), 1);
            assert!(stack.face_up);
            assert!(felt.contains(stack.center(footprint), footprint));
        }
        // row-major
        assert_eq!(built.stacks[0].position.y, built.stacks[1].position.y);
        assert!(built.stacks[0].position.x < built.stacks[1].position.x);
    }

    #[test]
    fn test_layout_clamps_on_tiny_circle() {
        let felt = Felt::new(Rect::new(0.0, 0.0, 300.0, 300.0), TableShape::Circle);
        let settings = TableSettings {
            deck_count: 6,
            ..TableSettings::default()
        };
        let footprint = settings.tuning.footprint();
        let built = build_layout(&settings, &felt);
        for stack in &built.stacks {
            assert!(felt.contains(stack.center(footprint), footprint));
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let settings = TableSettings::default();
        let a = build_layout(&settings, &felt());
        let b = build_layout(&settings, &felt());
        assert_eq!(a.stacks, b.stacks);
        assert_eq!(a.cards, b.cards);
    }
}
