//! Authoritative table state.
//!
//! [`TableState`] owns every card, stack, hand, seat and player, plus the
//! single held selection. All mutation goes through its methods; each one
//! either fully applies or returns a [`TableError`] and leaves the table
//! untouched.

pub mod actions;
pub mod census;
pub mod view;

pub use actions::{ActionLog, LogEntry, TableAction};
pub use census::ConservationReport;
pub use view::{HandView, StackView};

use rand::{Rng, seq::SliceRandom};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    deck::{StackIdCounter, build_layout},
    error::{TableError, TableResult},
    geometry::{Felt, Point, Rect, Size},
    model::{
        Card, CardFace, CardId, Hand, HeldOrigin, HeldSelection, PickCount, PickupMode, Player,
        PlayerId, Seat, SeatIndex, Stack, StackId, Zone, seat_palette,
    },
    perimeter::{
        PerimeterPoint, constrain_seat_param, min_gap_param, param_from_pointer, point_from_param,
        spread_if_crowded,
    },
    settings::TableSettings,
};

/// Where a put-down landed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    NewStack(StackId),
    Merged(StackId),
    Hand(SeatIndex),
}

impl Placement {
    /// The stack the cards ended up in, if they went to the table.
    #[must_use]
    pub fn stack(self) -> Option<StackId> {
        match self {
            Self::NewStack(id) | Self::Merged(id) => Some(id),
            Self::Hand(_) => None,
        }
    }
}

/// Where a single card currently lives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardLocation {
    Stack { id: StackId, index: usize },
    Hand { seat: SeatIndex, index: usize },
    Held { index: usize },
}

/// Display attributes to change on a player. `None` leaves a field alone.
#[derive(Clone, Debug, Default)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub seat_color: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug)]
pub struct TableState {
    settings: TableSettings,
    felt: Felt,
    cards: BTreeMap<CardId, Card>,
    /// Paint order, bottom-most first.
    stacks: Vec<Stack>,
    index: HashMap<StackId, usize>,
    ids: StackIdCounter,
    faces: HashMap<CardId, CardFace>,
    seats: Vec<Seat>,
    hands: Vec<Hand>,
    players: BTreeMap<PlayerId, Player>,
    next_player: u32,
    held: Option<HeldSelection>,
    log: ActionLog,
}

impl TableState {
    /// Build a fresh table for `settings` on a felt of `bounds`.
    #[must_use]
    pub fn new(settings: TableSettings, bounds: Rect) -> Self {
        let felt = Felt::new(bounds, settings.shape);
        let seats: Vec<Seat> = settings
            .seat_params
            .iter()
            .enumerate()
            .map(|(i, t)| Seat::new(i, *t))
            .collect();
        let hands = vec![Hand::default(); seats.len()];
        let mut table = Self {
            settings,
            felt,
            cards: BTreeMap::new(),
            stacks: Vec::new(),
            index: HashMap::new(),
            ids: StackIdCounter::default(),
            faces: HashMap::new(),
            seats,
            hands,
            players: BTreeMap::new(),
            next_player: 1,
            held: None,
            log: ActionLog::default(),
        };
        table.enforce_seat_gap();
        table.rebuild_deck();
        table
    }

    // ---------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------

    #[must_use]
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    #[must_use]
    pub fn felt(&self) -> &Felt {
        &self.felt
    }

    /// Card footprint used for hit-testing and clamping.
    #[must_use]
    pub fn footprint(&self) -> Size {
        self.settings.tuning.footprint()
    }

    #[must_use]
    pub fn cards(&self) -> &BTreeMap<CardId, Card> {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Stacks in paint order.
    #[must_use]
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    #[must_use]
    pub fn stack(&self, id: StackId) -> Option<&Stack> {
        self.index.get(&id).map(|&i| &self.stacks[i])
    }

    #[must_use]
    pub fn paint_index(&self, id: StackId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn seat(&self, seat: SeatIndex) -> Option<&Seat> {
        self.seats.get(seat)
    }

    #[must_use]
    pub fn hand(&self, seat: SeatIndex) -> Option<&Hand> {
        self.hands.get(seat)
    }

    #[must_use]
    pub fn players(&self) -> &BTreeMap<PlayerId, Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|seat| seat.occupant == Some(player))
    }

    #[must_use]
    pub fn held(&self) -> Option<&HeldSelection> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    #[must_use]
    pub fn face_of(&self, card: CardId) -> CardFace {
        self.faces.get(&card).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn locate(&self, card: CardId) -> Option<CardLocation> {
        for stack in &self.stacks {
            if let Some(index) = stack.card_ids.iter().position(|c| *c == card) {
                return Some(CardLocation::Stack {
                    id: stack.id,
                    index,
                });
            }
        }
        for (seat, hand) in self.hands.iter().enumerate() {
            if let Some(index) = hand.position_of(card) {
                return Some(CardLocation::Hand { seat, index });
            }
        }
        self.held
            .as_ref()
            .and_then(|held| held.card_ids.iter().position(|c| *c == card))
            .map(|index| CardLocation::Held { index })
    }

    /// Top-most stack whose footprint contains `point`.
    #[must_use]
    pub fn stack_at(&self, point: Point) -> Option<StackId> {
        self.stack_at_excluding(point, &[])
    }

    #[must_use]
    pub fn stack_at_excluding(&self, point: Point, exclude: &[StackId]) -> Option<StackId> {
        let footprint = self.footprint();
        self.stacks
            .iter()
            .rev()
            .filter(|stack| !exclude.contains(&stack.id))
            .find(|stack| stack.bounds(footprint).contains(point))
            .map(|stack| stack.id)
    }

    /// Boundary point for a seat, pushed outward by `rail_offset`.
    #[must_use]
    pub fn seat_point(&self, seat: SeatIndex, rail_offset: f32) -> Option<PerimeterPoint> {
        let bounds = self.felt.bounds.filter(|b| !b.is_empty())?;
        let seat = self.seats.get(seat)?;
        Some(point_from_param(
            self.felt.shape,
            &bounds,
            seat.param,
            rail_offset,
        ))
    }

    /// The hand drop zone of an occupied seat, just inside the boundary.
    #[must_use]
    pub fn hand_zone(&self, seat: SeatIndex) -> Option<Rect> {
        self.seats.get(seat)?.occupant?;
        let tuning = &self.settings.tuning;
        let anchor = self.seat_point(seat, -tuning.hand_zone_inset_px)?;
        Some(Rect::centered(anchor.point, tuning.hand_zone()))
    }

    #[must_use]
    pub fn hand_zone_at(&self, point: Point) -> Option<SeatIndex> {
        (0..self.seats.len()).find(|&seat| {
            self.hand_zone(seat)
                .is_some_and(|zone| zone.contains(point))
        })
    }

    /// Count every card across stacks, hands and the held selection.
    #[must_use]
    pub fn census(&self) -> ConservationReport {
        let deck: BTreeSet<CardId> = self.cards.keys().copied().collect();
        let found = self
            .stacks
            .iter()
            .flat_map(|stack| stack.card_ids.iter())
            .chain(self.hands.iter().flat_map(|hand| hand.card_ids.iter()))
            .chain(self.held.iter().flat_map(|held| held.card_ids.iter()))
            .copied();
        ConservationReport::take(&deck, found)
    }

    // ---------------------------------------------------------------
    // Rebuild and settings
    // ---------------------------------------------------------------

    /// Rebuild the deck from the current settings, logged as `actor`.
    pub fn reset(&mut self, actor: PlayerId) {
        self.rebuild_deck();
        self.record(
            actor,
            TableAction::Rebuilt {
                cards: self.cards.len(),
                preset: self.settings.preset,
            },
        );
    }

    /// Swap in new settings. Deck, joker, preset or seat count changes
    /// rebuild the deck; a shape change re-clamps every stack.
    pub fn apply_settings(&mut self, actor: PlayerId, settings: TableSettings) {
        let old = std::mem::replace(&mut self.settings, settings);
        let reseat = self.settings.seat_params.len() != self.seats.len();
        let rebuild = reseat
            || old.deck_count != self.settings.deck_count
            || old.include_jokers != self.settings.include_jokers
            || old.preset != self.settings.preset
            || old.seat_count != self.settings.seat_count;

        self.felt.shape = self.settings.shape;
        if !reseat {
            for (seat, t) in self.seats.iter_mut().zip(&self.settings.seat_params) {
                seat.param = *t;
            }
        } else {
            let seats = self
                .settings
                .seat_params
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let mut seat = Seat::new(i, *t);
                    seat.occupant = self.seats.get(i).and_then(|s| s.occupant);
                    seat
                })
                .collect();
            self.seats = seats;
            self.hands = vec![Hand::default(); self.seats.len()];
        }
        self.enforce_seat_gap();

        if rebuild {
            self.reset(actor);
        } else {
            self.reclamp_stacks();
            self.refresh_zones();
            self.after_mutation();
        }
    }

    /// Resize the felt. Stacks are pulled back inside the new boundary.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.felt.bounds = Some(bounds);
        self.enforce_seat_gap();
        self.reclamp_stacks();
        self.refresh_zones();
    }

    fn rebuild_deck(&mut self) {
        let built = build_layout(&self.settings, &self.felt);
        self.cards = built.cards;
        self.stacks = built.stacks;
        self.ids = built.ids;
        self.faces.clear();
        for hand in &mut self.hands {
            *hand = Hand::default();
        }
        self.held = None;
        self.reindex();
        self.refresh_zones();
        log::info!(
            "Built {} cards in {} stacks ({} layout)",
            self.cards.len(),
            self.stacks.len(),
            self.settings.preset
        );
        self.after_mutation();
    }

    // ---------------------------------------------------------------
    // Stacks
    // ---------------------------------------------------------------

    /// Set a stack's top-left origin, clamped. Not logged; drags call this
    /// once per frame and log through [`TableState::move_stack`] on release.
    pub fn set_stack_position(&mut self, id: StackId, origin: Point) -> TableResult<()> {
        let idx = self.position_of(id)?;
        let origin = self.felt.clamp_origin(origin, self.footprint());
        self.stacks[idx].position = origin;
        self.refresh_zone(idx);
        Ok(())
    }

    pub fn move_stack(&mut self, actor: PlayerId, id: StackId, origin: Point) -> TableResult<()> {
        self.set_stack_position(id, origin)?;
        let count = self.stacks[self.position_of(id)?].len();
        self.record(actor, TableAction::MovedStack { count });
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: StackId) -> TableResult<()> {
        let idx = self.position_of(id)?;
        if idx + 1 != self.stacks.len() {
            let stack = self.stacks.remove(idx);
            self.stacks.push(stack);
            self.reindex();
        }
        Ok(())
    }

    /// Put `src` on top of `dst`. The result keeps `dst`'s id and position.
    pub fn merge(&mut self, actor: PlayerId, src: StackId, dst: StackId) -> TableResult<StackId> {
        if src == dst {
            return Err(TableError::SelfMerge(src));
        }
        let s = self.position_of(src)?;
        let d = self.position_of(dst)?;
        let cards = std::mem::take(&mut self.stacks[s].card_ids);
        self.clear_pins(&cards);
        let count = cards.len();
        self.stacks[d].card_ids.extend(cards);
        self.remove_stack(s);
        self.record(actor, TableAction::Merged { count });
        self.after_mutation();
        Ok(dst)
    }

    /// Move the top `count` cards of a stack into a new stack at `origin`.
    pub fn split(
        &mut self,
        actor: PlayerId,
        id: StackId,
        count: usize,
        origin: Point,
    ) -> TableResult<StackId> {
        let idx = self.position_of(id)?;
        let stack = &mut self.stacks[idx];
        let n = count.min(stack.len());
        if n == 0 {
            return Err(TableError::NothingToMove);
        }
        let taken = stack.card_ids.split_off(stack.len() - n);
        let face_up = stack.face_up;
        let emptied = stack.is_empty();

        self.clear_pins(&taken);
        if emptied {
            self.remove_stack(idx);
        }
        let new_id = self.ids.next_id();
        let origin = self.felt.clamp_origin(origin, self.footprint());
        self.push_stack(Stack::new(new_id, origin, face_up, taken));
        self.record(actor, TableAction::Split { count: n });
        self.after_mutation();
        Ok(new_id)
    }

    /// Turn a whole stack over. Pinned cards keep their relation to the
    /// stack: a card showing the opposite face still does afterwards.
    pub fn flip_stack(&mut self, actor: PlayerId, id: StackId) -> TableResult<()> {
        let idx = self.position_of(id)?;
        let stack = &mut self.stacks[idx];
        stack.face_up = !stack.face_up;
        let face_up = stack.face_up;
        for card in &stack.card_ids {
            if let Some(CardFace::Pinned { face_up: pinned }) = self.faces.get(card).copied() {
                if !pinned == face_up {
                    self.faces.remove(card);
                } else {
                    self.faces
                        .insert(*card, CardFace::Pinned { face_up: !pinned });
                }
            }
        }
        let count = stack.len();
        self.record(actor, TableAction::FlippedStack { count });
        self.after_mutation();
        Ok(())
    }

    /// Turn one card within a stack, pinning it against the stack's face.
    pub fn flip_card(&mut self, actor: PlayerId, card: CardId) -> TableResult<()> {
        let Some(CardLocation::Stack { id, .. }) = self.locate(card) else {
            return Err(TableError::CardNotOnTable(card));
        };
        let stack_face = self.stacks[self.position_of(id)?].face_up;
        let shown = !self.face_of(card).resolve(stack_face);
        if shown == stack_face {
            self.faces.remove(&card);
        } else {
            self.faces.insert(card, CardFace::Pinned { face_up: shown });
        }
        let name = self.card_name(card);
        self.record(actor, TableAction::FlippedCard { card: name });
        self.after_mutation();
        Ok(())
    }

    pub fn shuffle_stack<R>(&mut self, actor: PlayerId, id: StackId, rng: &mut R) -> TableResult<()>
    where
        R: Rng + ?Sized,
    {
        let idx = self.position_of(id)?;
        self.stacks[idx].card_ids.shuffle(rng);
        let count = self.stacks[idx].len();
        self.record(actor, TableAction::Shuffled { count });
        self.after_mutation();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Held selection
    // ---------------------------------------------------------------

    /// Lift cards off the top of a stack into the held selection.
    pub fn pick_up(&mut self, actor: PlayerId, id: StackId, count: PickCount) -> TableResult<usize> {
        if let Some(held) = &self.held {
            return Err(TableError::AlreadyHolding(held.len()));
        }
        let idx = self.position_of(id)?;
        let stack = &mut self.stacks[idx];
        let n = count.resolve(stack.len());
        if n == 0 {
            return Err(TableError::NothingToMove);
        }
        let taken = stack.card_ids.split_off(stack.len() - n);
        let emptied = stack.is_empty();
        let held = HeldSelection {
            card_ids: taken,
            origin: HeldOrigin::Stack {
                id,
                position: stack.position,
            },
            face_up: stack.face_up,
            mode: if emptied {
                PickupMode::Whole
            } else {
                PickupMode::Partial
            },
        };

        if emptied {
            self.remove_stack(idx);
        }
        self.clear_pins(&held.card_ids);
        self.held = Some(held);
        self.record(actor, TableAction::PickedUp { count: n });
        self.after_mutation();
        Ok(n)
    }

    /// Put the whole held selection down centered on `center`.
    pub fn place_held(&mut self, actor: PlayerId, center: Point) -> TableResult<Placement> {
        let held = self.held.take().ok_or(TableError::NothingHeld)?;
        let count = held.len();
        let center = self.felt.clamp(center, self.footprint());
        let placement = self.put_cards(held.card_ids, held.face_up, center, &[]);
        let action = match placement {
            Placement::Merged(_) => TableAction::Stacked { count },
            _ => TableAction::Placed { count },
        };
        self.record(actor, action);
        self.after_mutation();
        Ok(placement)
    }

    /// Peel the top held card off onto the table at `center`. Stacks in
    /// `exclude` are not merge targets.
    pub fn deal_held_card(
        &mut self,
        actor: PlayerId,
        center: Point,
        exclude: &[StackId],
    ) -> TableResult<Placement> {
        let held = self.held.as_mut().ok_or(TableError::NothingHeld)?;
        let card = held.card_ids.pop().ok_or(TableError::NothingHeld)?;
        let face_up = held.face_up;
        if held.is_empty() {
            self.held = None;
        }
        let center = self.felt.clamp(center, self.footprint());
        let placement = self.put_cards(vec![card], face_up, center, exclude);
        self.record(actor, TableAction::Dealt);
        self.after_mutation();
        Ok(placement)
    }

    /// Send the held selection back where it came from. A vanished origin
    /// stack is recreated under its old id; a vanished origin hand drops the
    /// cards at `fallback`.
    pub fn restore_held(&mut self, actor: PlayerId, fallback: Point) -> TableResult<Placement> {
        let held = self.held.take().ok_or(TableError::NothingHeld)?;
        let count = held.len();
        let placement = match held.origin {
            HeldOrigin::Stack { id, position } => {
                if let Some(&idx) = self.index.get(&id) {
                    self.stacks[idx].card_ids.extend(held.card_ids);
                    Placement::Merged(id)
                } else {
                    let origin = self.felt.clamp_origin(position, self.footprint());
                    self.push_stack(Stack::new(id, origin, held.face_up, held.card_ids));
                    Placement::NewStack(id)
                }
            }
            HeldOrigin::Hand { seat, index } => match self.hands.get_mut(seat) {
                Some(hand) => {
                    let at = index.min(hand.len());
                    hand.card_ids.splice(at..at, held.card_ids);
                    Placement::Hand(seat)
                }
                None => {
                    let center = self.felt.clamp(fallback, self.footprint());
                    self.put_cards(held.card_ids, held.face_up, center, &[])
                }
            },
        };
        self.record(actor, TableAction::Returned { count });
        self.after_mutation();
        Ok(placement)
    }

    pub fn held_to_hand(&mut self, actor: PlayerId, seat: SeatIndex) -> TableResult<usize> {
        if seat >= self.hands.len() {
            return Err(TableError::SeatNotFound(seat));
        }
        let held = self.held.take().ok_or(TableError::NothingHeld)?;
        let count = held.len();
        self.hands[seat].card_ids.extend(held.card_ids);
        self.record(actor, TableAction::MovedToHand { count });
        self.after_mutation();
        Ok(count)
    }

    /// Lift cards out of a hand into the held selection.
    pub fn hand_to_held(
        &mut self,
        actor: PlayerId,
        seat: SeatIndex,
        cards: &[CardId],
    ) -> TableResult<usize> {
        if let Some(held) = &self.held {
            return Err(TableError::AlreadyHolding(held.len()));
        }
        let picked = self.take_from_hand(seat, cards)?;
        let count = picked.len();
        let index = picked.iter().map(|(i, _)| *i).min().unwrap_or(0);
        self.held = Some(HeldSelection {
            card_ids: picked.into_iter().map(|(_, card)| card).collect(),
            origin: HeldOrigin::Hand { seat, index },
            face_up: true,
            mode: PickupMode::FromHand,
        });
        self.record(actor, TableAction::TookFromHand { count });
        self.after_mutation();
        Ok(count)
    }

    /// Play cards from a hand straight onto the table, face up.
    pub fn hand_to_table(
        &mut self,
        actor: PlayerId,
        seat: SeatIndex,
        cards: &[CardId],
        center: Point,
    ) -> TableResult<Placement> {
        let picked = self.take_from_hand(seat, cards)?;
        let count = picked.len();
        let center = self.felt.clamp(center, self.footprint());
        let cards = picked.into_iter().map(|(_, card)| card).collect();
        let placement = self.put_cards(cards, true, center, &[]);
        self.record(actor, TableAction::PlayedFromHand { count });
        self.after_mutation();
        Ok(placement)
    }

    /// Move a whole stack into a hand, bottom card first.
    pub fn stack_to_hand(&mut self, actor: PlayerId, id: StackId, seat: SeatIndex) -> TableResult<usize> {
        if seat >= self.hands.len() {
            return Err(TableError::SeatNotFound(seat));
        }
        let idx = self.position_of(id)?;
        let cards = std::mem::take(&mut self.stacks[idx].card_ids);
        self.remove_stack(idx);
        self.clear_pins(&cards);
        let count = cards.len();
        self.hands[seat].card_ids.extend(cards);
        self.record(actor, TableAction::MovedToHand { count });
        self.after_mutation();
        Ok(count)
    }

    pub fn reorder_hand(
        &mut self,
        actor: PlayerId,
        seat: SeatIndex,
        from: usize,
        to: usize,
    ) -> TableResult<()> {
        let hand = self
            .hands
            .get_mut(seat)
            .ok_or(TableError::SeatNotFound(seat))?;
        for index in [from, to] {
            if index >= hand.len() {
                return Err(TableError::HandIndexOutOfBounds(index));
            }
        }
        let card = hand.card_ids.remove(from);
        hand.card_ids.insert(to, card);
        self.record(actor, TableAction::ReorderedHand);
        self.after_mutation();
        Ok(())
    }

    pub fn set_revealed(
        &mut self,
        actor: PlayerId,
        seat: SeatIndex,
        card: CardId,
        revealed: bool,
    ) -> TableResult<()> {
        let hand = self
            .hands
            .get_mut(seat)
            .ok_or(TableError::SeatNotFound(seat))?;
        if hand.position_of(card).is_none() {
            return Err(TableError::CardNotInHand { card, seat });
        }
        let changed = if revealed {
            hand.revealed.insert(card)
        } else {
            hand.revealed.remove(&card)
        };
        if changed {
            let card = self.card_name(card);
            let action = if revealed {
                TableAction::Revealed { card }
            } else {
                TableAction::Hid { card }
            };
            self.record(actor, action);
        }
        self.after_mutation();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Seats and players
    // ---------------------------------------------------------------

    pub fn add_player(&mut self, name: &str) -> PlayerId {
        let id = PlayerId(self.next_player);
        self.next_player += 1;
        let (seat_color, accent_color) = seat_palette(id.0 as usize);
        self.players.insert(
            id,
            Player {
                id,
                name: name.to_string(),
                seat_color,
                accent_color,
            },
        );
        self.record(id, TableAction::Joined);
        id
    }

    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> TableResult<()> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(TableError::PlayerNotFound(id))?;
        if let Some(color) = update.seat_color {
            player.seat_color = color;
        }
        if let Some(color) = update.accent_color {
            player.accent_color = color;
        }
        if let Some(name) = update.name.filter(|name| *name != player.name) {
            self.record(id, TableAction::Renamed { name: name.clone() });
            if let Some(player) = self.players.get_mut(&id) {
                player.name = name;
            }
        }
        Ok(())
    }

    /// Seat a player, moving them out of any seat they held before. The
    /// player takes on the seat's colors.
    pub fn assign_seat(&mut self, seat: SeatIndex, player: PlayerId) -> TableResult<()> {
        if seat >= self.seats.len() {
            return Err(TableError::SeatNotFound(seat));
        }
        if !self.players.contains_key(&player) {
            return Err(TableError::PlayerNotFound(player));
        }
        for other in &mut self.seats {
            if other.occupant == Some(player) {
                other.occupant = None;
            }
        }
        let target = &mut self.seats[seat];
        target.occupant = Some(player);
        let colors = (target.seat_color.clone(), target.accent_color.clone());
        if let Some(player) = self.players.get_mut(&player) {
            (player.seat_color, player.accent_color) = colors;
        }
        self.refresh_zones();
        self.record(player, TableAction::TookSeat(seat));
        self.after_mutation();
        Ok(())
    }

    /// Vacate a seat. Its hand stays with the seat.
    pub fn clear_seat(&mut self, seat: SeatIndex) -> TableResult<Option<PlayerId>> {
        let previous = self
            .seats
            .get_mut(seat)
            .ok_or(TableError::SeatNotFound(seat))?
            .occupant
            .take();
        self.refresh_zones();
        if let Some(player) = previous {
            self.record(player, TableAction::LeftSeat(seat));
        }
        self.after_mutation();
        Ok(previous)
    }

    /// Move a seat toward `pointer`, keeping the minimum gap to its
    /// neighbors. Returns the parameter actually applied.
    pub fn drag_seat(&mut self, seat: SeatIndex, pointer: Point) -> TableResult<f32> {
        let current = self
            .seats
            .get(seat)
            .ok_or(TableError::SeatNotFound(seat))?
            .param;
        match self.felt.bounds.filter(|b| !b.is_empty()) {
            Some(bounds) => {
                let candidate = param_from_pointer(self.felt.shape, &bounds, pointer);
                self.set_seat_param(seat, candidate)
            }
            None => Ok(current),
        }
    }

    pub fn set_seat_param(&mut self, seat: SeatIndex, candidate: f32) -> TableResult<f32> {
        if seat >= self.seats.len() {
            return Err(TableError::SeatNotFound(seat));
        }
        let params: Vec<f32> = self.seats.iter().map(|s| s.param).collect();
        let applied = constrain_seat_param(&params, seat, candidate, self.min_seat_gap());
        self.seats[seat].param = applied;
        if let Some(slot) = self.settings.seat_params.get_mut(seat) {
            *slot = applied;
        }
        self.refresh_zones();
        Ok(applied)
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    /// Minimum seat spacing as a fraction of the perimeter.
    fn min_seat_gap(&self) -> f32 {
        self.felt
            .bounds
            .filter(|b| !b.is_empty())
            .map_or(0.0, |bounds| {
                min_gap_param(
                    self.felt.shape,
                    &bounds,
                    self.settings.tuning.min_seat_gap_px,
                )
            })
    }

    /// Respread the seats evenly when loaded or carried-over parameters
    /// sit closer than the minimum gap on the current felt.
    fn enforce_seat_gap(&mut self) {
        let params: Vec<f32> = self.seats.iter().map(|s| s.param).collect();
        let spread = spread_if_crowded(&params, self.min_seat_gap());
        if spread == params {
            return;
        }
        log::warn!("Seats crowd each other on this felt, respacing {}", spread.len());
        for (seat, t) in self.seats.iter_mut().zip(&spread) {
            seat.param = *t;
        }
        self.settings.seat_params = spread;
    }

    fn position_of(&self, id: StackId) -> TableResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TableError::StackNotFound(id))
    }

    fn reindex(&mut self) {
        self.index = self
            .stacks
            .iter()
            .enumerate()
            .map(|(i, stack)| (stack.id, i))
            .collect();
    }

    fn push_stack(&mut self, stack: Stack) {
        self.index.insert(stack.id, self.stacks.len());
        self.stacks.push(stack);
        self.refresh_zone(self.stacks.len() - 1);
    }

    fn remove_stack(&mut self, idx: usize) {
        let stack = self.stacks.remove(idx);
        log::debug!("Removed empty stack {}", stack.id);
        self.reindex();
    }

    /// Put cards down at an already clamped `center`: onto the top-most
    /// stack there, or as a new stack.
    fn put_cards(
        &mut self,
        cards: Vec<CardId>,
        face_up: bool,
        center: Point,
        exclude: &[StackId],
    ) -> Placement {
        match self.stack_at_excluding(center, exclude) {
            Some(target) => {
                let idx = self.index[&target];
                self.stacks[idx].card_ids.extend(cards);
                Placement::Merged(target)
            }
            None => {
                let id = self.ids.next_id();
                let origin = center - self.footprint().half();
                self.push_stack(Stack::new(id, origin, face_up, cards));
                Placement::NewStack(id)
            }
        }
    }

    /// Remove `cards` from a seat's hand after checking all of them are
    /// there. Returns each card with the index it had.
    fn take_from_hand(
        &mut self,
        seat: SeatIndex,
        cards: &[CardId],
    ) -> TableResult<Vec<(usize, CardId)>> {
        let hand = self
            .hands
            .get_mut(seat)
            .ok_or(TableError::SeatNotFound(seat))?;
        let mut picked: Vec<(usize, CardId)> = Vec::with_capacity(cards.len());
        for &card in cards {
            if picked.iter().any(|(_, c)| *c == card) {
                continue;
            }
            let index = hand
                .position_of(card)
                .ok_or(TableError::CardNotInHand { card, seat })?;
            picked.push((index, card));
        }
        if picked.is_empty() {
            return Err(TableError::NothingToMove);
        }
        for (_, card) in &picked {
            hand.remove(*card);
        }
        self.clear_pins(cards);
        Ok(picked)
    }

    fn clear_pins(&mut self, cards: &[CardId]) {
        for card in cards {
            self.faces.remove(card);
        }
    }

    fn reclamp_stacks(&mut self) {
        let footprint = self.footprint();
        for stack in &mut self.stacks {
            stack.position = self.felt.clamp_origin(stack.position, footprint);
        }
    }

    fn refresh_zone(&mut self, idx: usize) {
        let center = self.stacks[idx].center(self.footprint());
        let owner = self.hand_zone_at(center);
        let stack = &mut self.stacks[idx];
        stack.owner_seat = owner;
        stack.zone = if owner.is_some() {
            Zone::Hand
        } else {
            Zone::Table
        };
    }

    fn refresh_zones(&mut self) {
        for idx in 0..self.stacks.len() {
            self.refresh_zone(idx);
        }
    }

    fn card_name(&self, card: CardId) -> String {
        self.cards
            .get(&card)
            .map_or_else(|| card.to_string(), ToString::to_string)
    }

    fn record(&mut self, actor: PlayerId, action: TableAction) {
        let actor = self
            .players
            .get(&actor)
            .map_or_else(|| actor.to_string(), |player| player.name.clone());
        self.log.push(LogEntry { actor, action });
    }

    fn after_mutation(&self) {
        if cfg!(debug_assertions) {
            let report = self.census();
            if !report.is_ok() {
                log::error!("Card conservation violated: {report}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::TableShape, perimeter::evenly_spaced, settings::LayoutPreset};
    use rand::{SeedableRng, rngs::StdRng};

    fn grid_table() -> (TableState, PlayerId) {
        let settings = TableSettings {
            preset: LayoutPreset::Grid,
            ..TableSettings::default()
        };
        let mut table = TableState::new(settings, Rect::new(0.0, 0.0, 1600.0, 1000.0));
        let alice = table.add_player("alice");
        (table, alice)
    }

    fn standard_table() -> (TableState, PlayerId) {
        let mut table =
            TableState::new(TableSettings::default(), Rect::new(0.0, 0.0, 1200.0, 800.0));
        let alice = table.add_player("alice");
        (table, alice)
    }

    fn only_stack(table: &TableState) -> StackId {
        table.stacks()[0].id
    }

    #[test]
    fn test_new_table_is_conserved() {
        let (table, _) = standard_table();
        assert!(table.census().is_ok());
        assert_eq!(table.cards().len(), 52);
        assert_eq!(table.stacks().len(), 1);
        assert!(table.held().is_none());
    }

    #[test]
    fn test_merge_puts_source_on_top() {
        let (mut table, alice) = grid_table();
        let a = table.stacks()[0].clone();
        let b = table.stacks()[1].clone();
        let merged = table.merge(alice, a.id, b.id).unwrap();
        assert_eq!(merged, b.id);
        let result = table.stack(b.id).unwrap();
        assert_eq!(result.card_ids, vec![b.card_ids[0], a.card_ids[0]]);
        assert!(table.stack(a.id).is_none());
        assert_eq!(table.merge(alice, b.id, b.id), Err(TableError::SelfMerge(b.id)));
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_stale_ids_leave_table_untouched() {
        let (mut table, alice) = standard_table();
        let ghost = StackId(999);
        let before = table.stacks().to_vec();
        assert_eq!(
            table.pick_up(alice, ghost, PickCount::All),
            Err(TableError::StackNotFound(ghost))
        );
        assert_eq!(
            table.flip_stack(alice, ghost),
            Err(TableError::StackNotFound(ghost))
        );
        assert_eq!(table.stacks(), before.as_slice());
    }

    #[test]
    fn test_pick_up_partial_then_place() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let top: Vec<CardId> = table.stack(id).unwrap().card_ids[49..].to_vec();
        assert_eq!(table.pick_up(alice, id, PickCount::Count(3)), Ok(3));
        assert_eq!(table.stack(id).unwrap().len(), 49);
        assert_eq!(table.held().unwrap().mode, PickupMode::Partial);
        assert!(table.census().is_ok());

        assert_eq!(
            table.pick_up(alice, id, PickCount::All),
            Err(TableError::AlreadyHolding(3))
        );

        let placement = table.place_held(alice, Point::new(100.0, 100.0)).unwrap();
        let Placement::NewStack(new_id) = placement else {
            panic!("expected a new stack, got {placement:?}");
        };
        assert_eq!(table.stack(new_id).unwrap().card_ids, top);
        assert!(table.held().is_none());
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_full_pickup_removes_stack_and_restore_recreates_it() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let position = table.stack(id).unwrap().position;
        table.pick_up(alice, id, PickCount::All).unwrap();
        assert!(table.stack(id).is_none());
        assert_eq!(table.held().unwrap().mode, PickupMode::Whole);

        let placement = table.restore_held(alice, Point::default()).unwrap();
        assert_eq!(placement, Placement::NewStack(id));
        assert_eq!(table.stack(id).unwrap().position, position);
        assert_eq!(table.stack(id).unwrap().len(), 52);
    }

    #[test]
    fn test_deal_held_pops_the_card_that_was_on_top() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let top = table.stack(id).unwrap().top().unwrap();
        table.pick_up(alice, id, PickCount::Count(2)).unwrap();
        let placement = table
            .deal_held_card(alice, Point::new(80.0, 80.0), &[])
            .unwrap();
        let dealt = table.stack(placement.stack().unwrap()).unwrap();
        assert_eq!(dealt.card_ids, vec![top]);
        assert_eq!(table.held().unwrap().len(), 1);
        table
            .deal_held_card(alice, Point::new(400.0, 80.0), &[])
            .unwrap();
        assert!(table.held().is_none());
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_split_moves_top_cards() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let new_id = table
            .split(alice, id, 10, Point::new(20.0, 20.0))
            .unwrap();
        assert_eq!(table.stack(id).unwrap().len(), 42);
        assert_eq!(table.stack(new_id).unwrap().len(), 10);
        assert_eq!(table.paint_index(new_id), Some(1));
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_flip_card_pin_survives_stack_flip() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let card = table.stack(id).unwrap().card_ids[3];
        assert!(!table.stack(id).unwrap().face_up);

        table.flip_card(alice, card).unwrap();
        assert_eq!(table.face_of(card), CardFace::Pinned { face_up: true });

        table.flip_stack(alice, id).unwrap();
        assert!(table.stack(id).unwrap().face_up);
        // still the odd one out
        assert_eq!(table.face_of(card), CardFace::Pinned { face_up: false });

        table.flip_card(alice, card).unwrap();
        assert_eq!(table.face_of(card), CardFace::Inherited);
    }

    #[test]
    fn test_pins_clear_on_membership_change() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let card = table.stack(id).unwrap().top().unwrap();
        table.flip_card(alice, card).unwrap();
        table.pick_up(alice, id, PickCount::Count(1)).unwrap();
        assert_eq!(table.face_of(card), CardFace::Inherited);
    }

    #[test]
    fn test_shuffle_keeps_membership() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let mut before = table.stack(id).unwrap().card_ids.clone();
        let mut rng = StdRng::seed_from_u64(7);
        table.shuffle_stack(alice, id, &mut rng).unwrap();
        let mut after = table.stack(id).unwrap().card_ids.clone();
        assert_ne!(before, after);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_hand_round_trip() {
        let (mut table, alice) = standard_table();
        table.assign_seat(0, alice).unwrap();
        let id = only_stack(&table);
        table.pick_up(alice, id, PickCount::Count(2)).unwrap();
        assert_eq!(table.held_to_hand(alice, 0), Ok(2));
        assert_eq!(
            table.log().last().unwrap().to_string(),
            "alice moved 2 cards to hand"
        );

        let hand = table.hand(0).unwrap().card_ids.clone();
        table.reorder_hand(alice, 0, 0, 1).unwrap();
        assert_eq!(table.hand(0).unwrap().card_ids, vec![hand[1], hand[0]]);

        table.set_revealed(alice, 0, hand[0], true).unwrap();
        assert!(table.hand(0).unwrap().revealed.contains(&hand[0]));

        table.hand_to_held(alice, 0, &[hand[0]]).unwrap();
        assert_eq!(
            table.held().unwrap().origin,
            HeldOrigin::Hand { seat: 0, index: 1 }
        );
        assert!(!table.hand(0).unwrap().revealed.contains(&hand[0]));
        table.restore_held(alice, Point::default()).unwrap();
        assert_eq!(table.hand(0).unwrap().card_ids, vec![hand[1], hand[0]]);
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_hand_errors() {
        let (mut table, alice) = standard_table();
        assert_eq!(
            table.hand_to_table(alice, 0, &[CardId(0)], Point::default()),
            Err(TableError::CardNotInHand {
                card: CardId(0),
                seat: 0
            })
        );
        assert_eq!(
            table.held_to_hand(alice, 42),
            Err(TableError::SeatNotFound(42))
        );
        assert_eq!(
            table.reorder_hand(alice, 0, 0, 0),
            Err(TableError::HandIndexOutOfBounds(0))
        );
    }

    #[test]
    fn test_hit_test_prefers_top_most() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let position = table.stack(id).unwrap().position;
        let new_id = table.split(alice, id, 5, position).unwrap();
        let inside = position + Point::new(1.0, 1.0);
        assert_eq!(table.stack_at(inside), Some(new_id));
        table.bring_to_front(id).unwrap();
        assert_eq!(table.stack_at(inside), Some(id));
        assert_eq!(table.stack_at(Point::new(-500.0, -500.0)), None);
    }

    #[test]
    fn test_hand_zone_needs_an_occupant() {
        let (mut table, alice) = standard_table();
        assert_eq!(table.hand_zone(0), None);
        table.assign_seat(0, alice).unwrap();
        let zone = table.hand_zone(0).unwrap();
        assert_eq!(table.hand_zone_at(zone.center()), Some(0));

        let id = only_stack(&table);
        let origin = zone.center() - table.footprint().half();
        table.move_stack(alice, id, origin).unwrap();
        let stack = table.stack(id).unwrap();
        assert_eq!(stack.zone, Zone::Hand);
        assert_eq!(stack.owner_seat, Some(0));

        table.clear_seat(0).unwrap();
        assert_eq!(table.stack(id).unwrap().zone, Zone::Table);
    }

    #[test]
    fn test_assign_seat_moves_player() {
        let (mut table, alice) = standard_table();
        table.assign_seat(0, alice).unwrap();
        table.assign_seat(2, alice).unwrap();
        assert_eq!(table.seat_of(alice), Some(2));
        assert_eq!(table.seat(0).unwrap().occupant, None);
        assert_eq!(
            table.player(alice).unwrap().seat_color,
            table.seat(2).unwrap().seat_color
        );
        assert_eq!(
            table.assign_seat(1, PlayerId(77)),
            Err(TableError::PlayerNotFound(PlayerId(77)))
        );
    }

    #[test]
    fn test_update_player_logs_rename() {
        let (mut table, alice) = standard_table();
        table
            .update_player(
                alice,
                PlayerUpdate {
                    name: Some("ally".to_string()),
                    ..PlayerUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(table.player(alice).unwrap().name, "ally");
        assert_eq!(
            table.log().last().unwrap().to_string(),
            "alice is now known as ally"
        );
    }

    #[test]
    fn test_apply_settings_rebuilds_on_deck_change() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        table.pick_up(alice, id, PickCount::Count(4)).unwrap();
        let settings = TableSettings {
            deck_count: 2,
            include_jokers: true,
            ..TableSettings::default()
        };
        table.apply_settings(alice, settings);
        assert_eq!(table.cards().len(), 108);
        assert!(table.held().is_none());
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_flips_shuffles_and_seating_keep_census() {
        let (mut table, alice) = standard_table();
        let id = only_stack(&table);
        let mut rng = StdRng::seed_from_u64(3);
        table.assign_seat(1, alice).unwrap();
        table.flip_stack(alice, id).unwrap();
        let top = table.stack(id).unwrap().top().unwrap();
        table.flip_card(alice, top).unwrap();
        table.shuffle_stack(alice, id, &mut rng).unwrap();
        let three = table.split(alice, id, 3, Point::new(50.0, 50.0)).unwrap();
        table.stack_to_hand(alice, three, 1).unwrap();
        let first = table.hand(1).unwrap().card_ids[0];
        table.reorder_hand(alice, 1, 0, 2).unwrap();
        table.set_revealed(alice, 1, first, true).unwrap();
        table.clear_seat(1).unwrap();

        let report = table.census();
        assert!(report.is_ok(), "{report}");
        assert_eq!(report.total, 52);
        assert_eq!(table.hand(1).unwrap().len(), 3);
    }

    #[test]
    fn test_crowded_seat_params_are_respaced() {
        let settings = TableSettings::from_record(&serde_json::json!({
            "seat_count": 4,
            "seat_params": [0.0, 0.001, 0.002, 0.003],
        }));
        let mut table = TableState::new(settings, Rect::new(0.0, 0.0, 1200.0, 800.0));
        let params: Vec<f32> = table.seats().iter().map(|s| s.param).collect();
        assert_eq!(params, evenly_spaced(4));
        assert_eq!(table.settings().seat_params, params);

        let alice = table.add_player("alice");
        let crowded = TableSettings {
            shape: TableShape::Circle,
            seat_params: vec![0.5, 0.51, 0.52, 0.53],
            ..TableSettings::default()
        };
        table.apply_settings(alice, crowded);
        let params: Vec<f32> = table.seats().iter().map(|s| s.param).collect();
        assert_eq!(params, evenly_spaced(4));
    }

    #[test]
    fn test_spaced_seat_params_survive_shape_change() {
        let (mut table, alice) = standard_table();
        let kept = vec![0.1, 0.3, 0.6, 0.8];
        let settings = TableSettings {
            shape: TableShape::Oval,
            seat_params: kept.clone(),
            ..TableSettings::default()
        };
        table.apply_settings(alice, settings);
        let params: Vec<f32> = table.seats().iter().map(|s| s.param).collect();
        assert_eq!(params, kept);
    }

    #[test]
    fn test_apply_settings_shape_change_reclamps() {
        let (mut table, alice) = grid_table();
        let settings = TableSettings {
            preset: LayoutPreset::Grid,
            shape: TableShape::Circle,
            ..TableSettings::default()
        };
        table.apply_settings(alice, settings);
        let footprint = table.footprint();
        let felt = *table.felt();
        assert_eq!(table.stacks().len(), 52);
        for stack in table.stacks() {
            assert!(felt.contains(stack.center(footprint), footprint));
        }
    }
}
