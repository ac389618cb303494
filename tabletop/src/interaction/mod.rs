//! Pointer and keyboard gestures.
//!
//! [`Interaction`] turns raw input into [`TableState`] mutations. It owns
//! only gesture state: which mode it is in, what is selected and hovered,
//! and the pending drag position. The table is passed in by `&mut` on every
//! call.
//!
//! Store errors never escape. A gesture that refers to a stack some earlier
//! mutation removed is dropped with a debug log, and the machine falls back
//! to a mode consistent with the table.

pub mod input;
pub mod mode;
pub mod slide;

pub use input::{Button, Effect, InputEvent, Key, KeyPress};
pub use mode::{DragStack, HoldStack, Idle, Mode, ModeState, PendingPress, SlideArm, Sliding};

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::{
    coalesce::FrameBatch,
    error::TableResult,
    geometry::Point,
    model::{CardId, PickCount, PlayerId, StackId},
    store::{Placement, TableState},
};

/// Display-only cursor state for the local player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Presence {
    pub cursor: Option<Point>,
    pub pressed: bool,
    pub held_count: usize,
}

/// Log a swallowed store error and hand back the value, if any.
fn settle<T>(result: TableResult<T>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Ignoring {what}: {e}");
            None
        }
    }
}

#[derive(Debug)]
pub struct Interaction {
    mode: Mode,
    local_player: PlayerId,
    selected: Option<StackId>,
    hovered: Option<StackId>,
    pointer: Point,
    frames: FrameBatch<Point>,
    presence: Presence,
    rng: StdRng,
}

impl Interaction {
    #[must_use]
    pub fn new(local_player: PlayerId) -> Self {
        Self::with_rng(local_player, StdRng::from_os_rng())
    }

    /// Deterministic jitter and shuffles, for tests and replays.
    #[must_use]
    pub fn with_seed(local_player: PlayerId, seed: u64) -> Self {
        Self::with_rng(local_player, StdRng::seed_from_u64(seed))
    }

    fn with_rng(local_player: PlayerId, rng: StdRng) -> Self {
        Self {
            mode: Mode::default(),
            local_player,
            selected: None,
            hovered: None,
            pointer: Point::default(),
            frames: FrameBatch::new(),
            presence: Presence::default(),
            rng,
        }
    }

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn selected(&self) -> Option<StackId> {
        self.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<StackId> {
        self.hovered
    }

    #[must_use]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    #[must_use]
    pub fn local_player(&self) -> PlayerId {
        self.local_player
    }

    /// Route any input event to its handler.
    pub fn handle(&mut self, table: &mut TableState, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown {
                point,
                button,
                time_ms,
            } => self.pointer_down(table, point, button, time_ms),
            InputEvent::PointerMove { point, time_ms } => self.pointer_move(table, point, time_ms),
            InputEvent::PointerUp {
                point,
                button,
                time_ms,
            } => self.pointer_up(table, point, button, time_ms),
            InputEvent::PointerCancel | InputEvent::Blur => self.cancel(table),
            InputEvent::Key(press) => self.key(table, press),
            InputEvent::Frame { time_ms } => self.frame(table, time_ms),
            InputEvent::PickUp { stack, count } => self.pick_up(table, stack, count),
            InputEvent::HandDrag { cards, point } => self.begin_hand_drag(table, &cards, point),
        }
    }

    pub fn pointer_down(
        &mut self,
        table: &mut TableState,
        point: Point,
        button: Button,
        time_ms: f64,
    ) -> Vec<Effect> {
        self.pointer = point;
        self.presence.pressed = true;
        let mut effects = Vec::new();

        let mode = std::mem::take(&mut self.mode);
        self.mode = match (mode, button) {
            (Mode::Idle(_), Button::Primary) => match table.stack_at(point) {
                Some(stack) => {
                    let origin = table.stack(stack).map_or(point, |s| s.position);
                    PendingPress {
                        stack,
                        start: point,
                        grab_offset: point - origin,
                    }
                    .into()
                }
                None => {
                    if self.selected.take().is_some() {
                        effects.push(Effect::CloseMenu);
                    }
                    Idle.into()
                }
            },
            (Mode::Idle(_), Button::Secondary) => match table.stack_at(point) {
                Some(stack) => match self.enter_hold(table, stack, PickCount::All) {
                    Mode::HoldStack(_) => self.arm_slide(point, time_ms, true, &mut effects),
                    mode => mode,
                },
                None => Idle.into(),
            },
            (Mode::HoldStack(hold), Button::Secondary) if hold.arm.is_none() => {
                self.arm_slide(point, time_ms, false, &mut effects)
            }
            (mode, _) => mode,
        };
        self.finish(table, effects)
    }

    pub fn pointer_move(&mut self, table: &mut TableState, point: Point, time_ms: f64) -> Vec<Effect> {
        self.pointer = point;
        let tuning = table.settings().tuning.clone();
        let mut effects = Vec::new();

        let mode = std::mem::take(&mut self.mode);
        self.mode = match mode {
            Mode::Idle(idle) => {
                let hovered = table.stack_at(point);
                if hovered != self.hovered {
                    self.hovered = hovered;
                    effects.push(Effect::HoverChanged(hovered));
                }
                idle.into()
            }
            Mode::PendingPress(press) => {
                if press.start.distance(point) > tuning.drag_threshold_px {
                    self.start_drag(table, press, point, &mut effects)
                } else {
                    press.into()
                }
            }
            Mode::DragStack(drag) => {
                if self.frames.write(point - drag.grab_offset) {
                    effects.push(Effect::RequestFrame);
                }
                drag.into()
            }
            Mode::HoldStack(HoldStack { arm: Some(arm) }) => {
                let travelled = arm.start.distance(point) > tuning.slide_start_px;
                let waited = time_ms - arm.pressed_at_ms >= tuning.hold_delay_ms;
                if travelled || waited {
                    log::debug!("Slide started at {}", arm.start);
                    self.slide(table, Sliding::new(arm.start), point)
                } else {
                    HoldStack { arm: Some(arm) }.into()
                }
            }
            Mode::Sliding(sliding) => self.slide(table, sliding, point),
            mode => mode,
        };
        self.finish(table, effects)
    }

    pub fn pointer_up(
        &mut self,
        table: &mut TableState,
        point: Point,
        button: Button,
        time_ms: f64,
    ) -> Vec<Effect> {
        self.pointer = point;
        self.presence.pressed = false;
        let hold_delay_ms = table.settings().tuning.hold_delay_ms;
        let mut effects = Vec::new();

        let mode = std::mem::take(&mut self.mode);
        self.mode = match (mode, button) {
            (Mode::PendingPress(press), Button::Primary) => {
                if table.stack(press.stack).is_some() {
                    self.selected = Some(press.stack);
                    effects.push(Effect::OpenMenu(press.stack));
                }
                Idle.into()
            }
            (Mode::DragStack(drag), Button::Primary) => {
                self.frames.discard();
                self.drop_stack(table, drag, point);
                Idle.into()
            }
            (Mode::HoldStack(_), Button::Primary) => {
                self.drop_held(table, point);
                Idle.into()
            }
            (Mode::HoldStack(HoldStack { arm: Some(arm) }), Button::Secondary) => {
                // only a click deals; a press held past the delay was a
                // slide that never moved
                if arm.lifted || time_ms - arm.pressed_at_ms >= hold_delay_ms {
                    HoldStack::default().into()
                } else {
                    let actor = self.local_player;
                    settle(table.deal_held_card(actor, point, &[]), "deal");
                    self.after_peel(table)
                }
            }
            (Mode::Sliding(_), Button::Secondary) => self.after_peel(table),
            (mode, _) => mode,
        };
        self.finish(table, effects)
    }

    /// Unwind whatever gesture is in progress. Escape, pointer-cancel and
    /// focus loss all land here.
    pub fn cancel(&mut self, table: &mut TableState) -> Vec<Effect> {
        self.presence.pressed = false;
        let mode = std::mem::take(&mut self.mode);
        match mode {
            Mode::DragStack(drag) => {
                self.frames.discard();
                settle(table.set_stack_position(drag.stack, drag.origin), "drag cancel");
            }
            Mode::HoldStack(_) | Mode::Sliding(_) => {
                settle(table.restore_held(self.local_player, self.pointer), "hold cancel");
            }
            Mode::Idle(_) | Mode::PendingPress(_) => {}
        }
        self.finish(table, Vec::new())
    }

    pub fn key(&mut self, table: &mut TableState, press: KeyPress) -> Vec<Effect> {
        let c = match press.key {
            Key::Escape => {
                if !self.mode.is_active() && self.selected.take().is_some() {
                    return vec![Effect::CloseMenu];
                }
                return self.cancel(table);
            }
            Key::Char(c) => c.to_ascii_lowercase(),
        };
        let Some(stack) = self.selected else {
            return Vec::new();
        };
        if press.text_input_focused {
            return Vec::new();
        }
        let actor = self.local_player;
        match c {
            'f' => {
                settle(table.flip_stack(actor, stack), "flip");
            }
            's' => {
                settle(table.shuffle_stack(actor, stack, &mut self.rng), "shuffle");
            }
            '1' => return self.pick_up(table, stack, PickCount::Count(1)),
            '5' => return self.pick_up(table, stack, PickCount::Count(5)),
            '0' => return self.pick_up(table, stack, PickCount::Count(10)),
            _ => {}
        }
        self.finish(table, Vec::new())
    }

    /// Display refresh: apply the latest drag position and start any slide
    /// whose hold delay has run out.
    pub fn frame(&mut self, table: &mut TableState, time_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(origin) = self.frames.flush() {
            if let Mode::DragStack(drag) = &self.mode {
                settle(table.set_stack_position(drag.stack, origin), "drag frame");
            }
        }
        if let Mode::HoldStack(HoldStack { arm: Some(arm) }) = self.mode {
            if time_ms - arm.pressed_at_ms >= table.settings().tuning.hold_delay_ms {
                self.mode = Sliding::new(arm.start).into();
            } else if self.frames.request_tick() {
                effects.push(Effect::RequestFrame);
            }
        }
        self.finish(table, effects)
    }

    /// Menu pick-up: lift `count` cards off `stack` into a hold.
    pub fn pick_up(&mut self, table: &mut TableState, stack: StackId, count: PickCount) -> Vec<Effect> {
        if self.mode.is_active() {
            log::debug!("Ignoring pick-up during {}", self.mode);
            return Vec::new();
        }
        self.mode = self.enter_hold(table, stack, count);
        self.finish(table, Vec::new())
    }

    /// Start holding cards dragged out of the local player's hand.
    pub fn begin_hand_drag(
        &mut self,
        table: &mut TableState,
        cards: &[CardId],
        point: Point,
    ) -> Vec<Effect> {
        self.pointer = point;
        if self.mode.is_active() {
            return Vec::new();
        }
        let Some(seat) = table.seat_of(self.local_player) else {
            log::debug!("Ignoring hand drag from unseated {}", self.local_player);
            return Vec::new();
        };
        if settle(table.hand_to_held(self.local_player, seat, cards), "hand drag").is_some() {
            self.presence.pressed = true;
            self.mode = HoldStack::default().into();
        }
        self.finish(table, Vec::new())
    }

    fn enter_hold(&mut self, table: &mut TableState, stack: StackId, count: PickCount) -> Mode {
        match settle(table.pick_up(self.local_player, stack, count), "pick-up") {
            Some(_) => HoldStack::default().into(),
            None => Idle.into(),
        }
    }

    /// Secondary press while holding: wait to see whether it is a click
    /// or a slide, polling frames for the hold delay.
    fn arm_slide(
        &mut self,
        start: Point,
        time_ms: f64,
        lifted: bool,
        effects: &mut Vec<Effect>,
    ) -> Mode {
        if self.frames.request_tick() {
            effects.push(Effect::RequestFrame);
        }
        HoldStack {
            arm: Some(SlideArm {
                start,
                pressed_at_ms: time_ms,
                lifted,
            }),
        }
        .into()
    }

    fn start_drag(
        &mut self,
        table: &mut TableState,
        press: PendingPress,
        point: Point,
        effects: &mut Vec<Effect>,
    ) -> Mode {
        let Some(origin) = table.stack(press.stack).map(|s| s.position) else {
            log::debug!("Ignoring drag of vanished stack {}", press.stack);
            return Idle.into();
        };
        settle(table.bring_to_front(press.stack), "bring to front");
        if self.frames.write(point - press.grab_offset) {
            effects.push(Effect::RequestFrame);
        }
        DragStack {
            stack: press.stack,
            grab_offset: press.grab_offset,
            origin,
        }
        .into()
    }

    /// Release of a dragged stack: into the owner's hand, back where it
    /// came from over someone else's hand, onto a stack it overlaps, or
    /// left where it is.
    fn drop_stack(&mut self, table: &mut TableState, drag: DragStack, point: Point) {
        let actor = self.local_player;
        if settle(table.set_stack_position(drag.stack, point - drag.grab_offset), "drop").is_none() {
            return;
        }
        let footprint = table.footprint();
        let Some(center) = table.stack(drag.stack).map(|s| s.center(footprint)) else {
            return;
        };

        if let Some(seat) = table.hand_zone_at(center) {
            if Some(seat) == table.seat_of(actor) {
                settle(table.stack_to_hand(actor, drag.stack, seat), "drop into hand");
            } else {
                log::debug!("Rejected drop on seat {seat}'s hand");
                settle(table.set_stack_position(drag.stack, drag.origin), "drop reject");
            }
            return;
        }

        match table.stack_at_excluding(center, &[drag.stack]) {
            Some(target) => {
                if settle(table.merge(actor, drag.stack, target), "drop merge").is_some()
                    && self.selected == Some(drag.stack)
                {
                    self.selected = Some(target);
                }
            }
            None => {
                settle(
                    table.move_stack(actor, drag.stack, point - drag.grab_offset),
                    "drop move",
                );
            }
        }
    }

    fn drop_held(&mut self, table: &mut TableState, point: Point) {
        let actor = self.local_player;
        let center = table.felt().clamp(point, table.footprint());
        let result = match table.hand_zone_at(center) {
            Some(seat) if Some(seat) == table.seat_of(actor) => {
                table.held_to_hand(actor, seat).map(|_| Placement::Hand(seat))
            }
            Some(seat) => {
                log::debug!("Rejected drop on seat {seat}'s hand");
                table.restore_held(actor, center)
            }
            None => table.place_held(actor, center),
        };
        settle(result, "drop");
    }

    /// Peel whatever travel since the last peel has earned.
    fn slide(&mut self, table: &mut TableState, mut sliding: Sliding, point: Point) -> Mode {
        let direction = match sliding.direction {
            Some(direction) => direction,
            None => match (point - sliding.anchor).normalized() {
                Some(direction) => {
                    sliding.direction = Some(direction);
                    direction
                }
                None => return sliding.into(),
            },
        };
        sliding.carry += sliding.last.distance(point);
        sliding.last = point;

        let tuning = table.settings().tuning.clone();
        let footprint = table.footprint();
        let held = table.held().map_or(0, |held| held.len());
        let peels = slide::peel_count(sliding.carry, &tuning, held);
        sliding.carry -= peels as f32 * tuning.slide_spacing_px;

        for behind in (0..peels).rev() {
            let center = slide::placement(
                point,
                direction,
                behind,
                &sliding.trail,
                &tuning,
                table.felt(),
                footprint,
                &mut self.rng,
            );
            match table.deal_held_card(self.local_player, center, &sliding.placed) {
                Ok(placement) => {
                    if let Placement::NewStack(id) = placement {
                        sliding.placed.push(id);
                    }
                    sliding.trail.push(center);
                }
                Err(e) => {
                    log::debug!("Slide stopped: {e}");
                    break;
                }
            }
        }

        if table.held().is_some() {
            sliding.into()
        } else {
            Idle.into()
        }
    }

    /// After a deal or the end of a slide: keep holding if cards remain.
    fn after_peel(&self, table: &TableState) -> Mode {
        if table.held().is_some() {
            HoldStack::default().into()
        } else {
            Idle.into()
        }
    }

    /// Common tail of every handler: drop a selection whose stack is gone,
    /// fall back to idle if the held cards vanished, refresh presence.
    fn finish(&mut self, table: &TableState, mut effects: Vec<Effect>) -> Vec<Effect> {
        if let Some(stack) = self.selected {
            if table.stack(stack).is_none() {
                self.selected = None;
                effects.push(Effect::CloseMenu);
            }
        }
        if self.mode.holds_cards() && table.held().is_none() {
            self.mode = Mode::default();
        }
        if !self.mode.is_active() {
            self.frames.discard();
        }
        self.presence.cursor = Some(self.pointer);
        self.presence.held_count = table.held().map_or(0, |held| held.len());
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::Rect,
        settings::{LayoutPreset, TableSettings},
    };

    fn setup() -> (TableState, Interaction) {
        let mut table =
            TableState::new(TableSettings::default(), Rect::new(0.0, 0.0, 1200.0, 800.0));
        let alice = table.add_player("alice");
        (table, Interaction::with_seed(alice, 11))
    }

    fn deck_center(table: &TableState) -> Point {
        table.stacks()[0].center(table.footprint())
    }

    #[test]
    fn test_click_selects_and_escape_closes() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);
        assert_eq!(ui.mode().name(), "pendingPress");
        let effects = ui.pointer_up(&mut table, at, Button::Primary, 10.0);
        assert_eq!(effects, vec![Effect::OpenMenu(StackId(1))]);
        assert_eq!(ui.selected(), Some(StackId(1)));

        let effects = ui.key(&mut table, KeyPress::new(Key::Escape));
        assert_eq!(effects, vec![Effect::CloseMenu]);
        assert_eq!(ui.selected(), None);
    }

    #[test]
    fn test_drag_is_frame_batched() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        let origin = table.stack(StackId(1)).unwrap().position;
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);

        let first = ui.pointer_move(&mut table, at + Point::new(20.0, 0.0), 1.0);
        assert_eq!(first, vec![Effect::RequestFrame]);
        let second = ui.pointer_move(&mut table, at + Point::new(40.0, 0.0), 2.0);
        assert!(second.is_empty());
        // nothing written until the frame
        assert_eq!(table.stack(StackId(1)).unwrap().position, origin);

        ui.frame(&mut table, 16.0);
        assert_eq!(
            table.stack(StackId(1)).unwrap().position,
            origin + Point::new(40.0, 0.0)
        );

        ui.pointer_up(&mut table, at + Point::new(60.0, 0.0), Button::Primary, 20.0);
        assert_eq!(ui.mode().name(), "idle");
        assert_eq!(
            table.stack(StackId(1)).unwrap().position,
            origin + Point::new(60.0, 0.0)
        );
    }

    #[test]
    fn test_cancel_drag_restores_position() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        let origin = table.stack(StackId(1)).unwrap().position;
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);
        ui.pointer_move(&mut table, at + Point::new(100.0, 50.0), 1.0);
        ui.frame(&mut table, 16.0);
        ui.handle(&mut table, InputEvent::Blur);
        assert_eq!(ui.mode().name(), "idle");
        assert_eq!(table.stack(StackId(1)).unwrap().position, origin);
    }

    #[test]
    fn test_secondary_press_holds_whole_stack_and_cancel_restores() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Secondary, 0.0);
        assert_eq!(ui.mode().name(), "holdStack");
        assert!(table.stacks().is_empty());
        assert_eq!(ui.presence().held_count, 52);

        // releasing the press that started the hold deals nothing
        ui.pointer_up(&mut table, at, Button::Secondary, 5.0);
        assert_eq!(table.held().unwrap().len(), 52);

        ui.key(&mut table, KeyPress::new(Key::Escape));
        assert_eq!(ui.mode().name(), "idle");
        assert_eq!(table.stack(StackId(1)).unwrap().len(), 52);
        assert!(table.census().is_ok());
    }

    #[test]
    fn test_long_secondary_press_without_moving_deals_nothing() {
        let (mut table, mut ui) = setup();
        let delay = table.settings().tuning.hold_delay_ms;
        ui.pick_up(&mut table, StackId(1), PickCount::Count(3));
        let spot = Point::new(150.0, 150.0);
        let effects = ui.pointer_down(&mut table, spot, Button::Secondary, 0.0);
        assert_eq!(effects, vec![Effect::RequestFrame]);

        // no frames delivered, no moves
        ui.pointer_up(&mut table, spot, Button::Secondary, delay * 5.0);
        assert_eq!(ui.mode().name(), "holdStack");
        assert_eq!(table.held().unwrap().len(), 3);
        assert_eq!(table.stacks().len(), 1);
    }

    #[test]
    fn test_armed_hold_polls_frames_until_slide() {
        let (mut table, mut ui) = setup();
        let delay = table.settings().tuning.hold_delay_ms;
        ui.pick_up(&mut table, StackId(1), PickCount::Count(3));
        ui.pointer_down(&mut table, Point::new(150.0, 150.0), Button::Secondary, 0.0);

        assert_eq!(ui.frame(&mut table, 16.0), vec![Effect::RequestFrame]);
        assert_eq!(ui.mode().name(), "holdStack");
        assert!(ui.frame(&mut table, delay + 16.0).is_empty());
        assert_eq!(ui.mode().name(), "sliding");
    }

    #[test]
    fn test_one_frame_request_outstanding_across_gestures() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);
        let effects = ui.pointer_move(&mut table, at + Point::new(30.0, 0.0), 1.0);
        assert_eq!(effects, vec![Effect::RequestFrame]);
        ui.pointer_up(&mut table, at + Point::new(30.0, 0.0), Button::Primary, 2.0);
        assert_eq!(ui.mode().name(), "idle");

        // the first request has not been answered yet
        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Primary, 3.0);
        let effects = ui.pointer_move(&mut table, at + Point::new(30.0, 0.0), 4.0);
        assert!(!effects.contains(&Effect::RequestFrame));

        ui.frame(&mut table, 16.0);
        let effects = ui.pointer_move(&mut table, at + Point::new(60.0, 0.0), 17.0);
        assert_eq!(effects, vec![Effect::RequestFrame]);
    }

    #[test]
    fn test_secondary_click_deals_one() {
        let (mut table, mut ui) = setup();
        ui.pick_up(&mut table, StackId(1), PickCount::Count(2));
        let spot = Point::new(150.0, 150.0);
        ui.pointer_down(&mut table, spot, Button::Secondary, 0.0);
        ui.pointer_up(&mut table, spot, Button::Secondary, 50.0);
        assert_eq!(ui.mode().name(), "holdStack");
        assert_eq!(table.held().unwrap().len(), 1);
        assert_eq!(table.stack_at(spot).map(|id| table.stack(id).unwrap().len()), Some(1));

        ui.pointer_down(&mut table, spot, Button::Secondary, 100.0);
        ui.pointer_up(&mut table, spot, Button::Secondary, 150.0);
        assert_eq!(ui.mode().name(), "idle");
        assert_eq!(table.stack_at(spot).map(|id| table.stack(id).unwrap().len()), Some(2));
    }

    #[test]
    fn test_keyboard_shortcuts_need_selection_and_no_text_focus() {
        let (mut table, mut ui) = setup();
        assert!(ui.key(&mut table, KeyPress::new(Key::Char('f'))).is_empty());
        assert!(!table.stack(StackId(1)).unwrap().face_up);

        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);
        ui.pointer_up(&mut table, at, Button::Primary, 1.0);

        ui.key(
            &mut table,
            KeyPress {
                key: Key::Char('f'),
                text_input_focused: true,
            },
        );
        assert!(!table.stack(StackId(1)).unwrap().face_up);

        ui.key(&mut table, KeyPress::new(Key::Char('F')));
        assert!(table.stack(StackId(1)).unwrap().face_up);

        ui.key(&mut table, KeyPress::new(Key::Char('5')));
        assert_eq!(ui.mode().name(), "holdStack");
        assert_eq!(table.held().unwrap().len(), 5);
        assert_eq!(table.stack(StackId(1)).unwrap().len(), 47);
    }

    #[test]
    fn test_selection_clears_when_stack_is_picked_up_whole() {
        let (mut table, mut ui) = setup();
        let at = deck_center(&table);
        ui.pointer_down(&mut table, at, Button::Primary, 0.0);
        ui.pointer_up(&mut table, at, Button::Primary, 1.0);
        let effects = ui.pick_up(&mut table, StackId(1), PickCount::All);
        assert_eq!(effects, vec![Effect::CloseMenu]);
        assert_eq!(ui.selected(), None);
    }

    #[test]
    fn test_selection_follows_drag_merge() {
        let settings = TableSettings {
            preset: LayoutPreset::Grid,
            ..TableSettings::default()
        };
        let mut table = TableState::new(settings, Rect::new(0.0, 0.0, 1600.0, 1000.0));
        let alice = table.add_player("alice");
        let mut ui = Interaction::with_seed(alice, 1);
        let fp = table.footprint();
        let a = table.stacks()[0].clone();
        let b = table.stacks()[1].clone();

        ui.pointer_down(&mut table, a.center(fp), Button::Primary, 0.0);
        ui.pointer_up(&mut table, a.center(fp), Button::Primary, 1.0);
        assert_eq!(ui.selected(), Some(a.id));

        ui.pointer_down(&mut table, a.center(fp), Button::Primary, 2.0);
        ui.pointer_move(&mut table, b.center(fp), 3.0);
        ui.pointer_up(&mut table, b.center(fp), Button::Primary, 4.0);
        assert_eq!(ui.selected(), Some(b.id));
        assert_eq!(table.stack(b.id).unwrap().card_ids, vec![b.card_ids[0], a.card_ids[0]]);
    }

    #[test]
    fn test_hand_drag_requires_seat() {
        let (mut table, mut ui) = setup();
        assert!(ui
            .begin_hand_drag(&mut table, &[CardId(0)], Point::new(10.0, 10.0))
            .is_empty());
        assert_eq!(ui.mode().name(), "idle");
    }
}
