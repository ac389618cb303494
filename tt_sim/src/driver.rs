//! Seeded gesture driver.
//!
//! Plays scripted-but-random gestures against one table through the
//! interaction machine, the way a host would forward pointer and key events,
//! and audits card conservation whenever the machine comes back to rest.

use anyhow::{Result, bail};
use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tabletop::{
    Button, ConservationReport, InputEvent, Interaction, Key, KeyPress, ModeState, PickCount,
    PlayerId, Point, StackId, TableSettings, TableState,
};

use crate::config::SimConfig;

const NAMES: [&str; 8] = ["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];

/// Frame interval the driver advances its clock by.
const FRAME_MS: f64 = 16.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Gesture {
    Drag,
    Click,
    HoldAndDeal,
    Slide,
    Shortcut,
    PickUpAndDrop,
    HandToTable,
    Abandon,
    SeatDrag,
}

const GESTURES: [Gesture; 9] = [
    Gesture::Drag,
    Gesture::Click,
    Gesture::HoldAndDeal,
    Gesture::Slide,
    Gesture::Shortcut,
    Gesture::PickUpAndDrop,
    Gesture::HandToTable,
    Gesture::Abandon,
    Gesture::SeatDrag,
];

/// What a finished run looked like.
#[derive(Debug)]
pub struct SimReport {
    pub events: usize,
    pub gestures: usize,
    pub audits: usize,
    pub census: ConservationReport,
}

pub struct Driver {
    table: TableState,
    ui: Interaction,
    rng: StdRng,
    clock: f64,
    events: usize,
    audits: usize,
}

impl Driver {
    pub fn new(settings: TableSettings, config: &SimConfig) -> Result<Self> {
        let mut table = TableState::new(settings, config.bounds());
        let mut players: Vec<PlayerId> = Vec::with_capacity(config.players);
        for i in 0..config.players {
            let name = NAMES.get(i).copied().unwrap_or("guest");
            players.push(table.add_player(name));
        }
        let seats = table.seats().len();
        for (i, player) in players.iter().enumerate().take(seats) {
            table.assign_seat(i, *player)?;
        }
        let Some(local) = players.first().copied() else {
            bail!("simulation needs at least one player");
        };
        info!(
            "Table ready: {} cards in {} stacks, {} players",
            table.cards().len(),
            table.stacks().len(),
            players.len()
        );
        Ok(Self {
            table,
            ui: Interaction::with_seed(local, config.seed ^ 0x5eed),
            rng: StdRng::seed_from_u64(config.seed),
            clock: 0.0,
            events: 0,
            audits: 0,
        })
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    /// Replay gestures until `steps` input events have been delivered.
    pub fn run(&mut self, steps: usize) -> Result<SimReport> {
        let mut gestures = 0;
        while self.events < steps {
            let Some(gesture) = GESTURES.choose(&mut self.rng).copied() else {
                break;
            };
            debug!("gesture {gestures}: {gesture:?}");
            self.play(gesture)?;
            gestures += 1;
        }
        self.send(InputEvent::Blur)?;
        let census = self.table.census();
        if !census.is_ok() {
            bail!("cards lost or duplicated at shutdown: {census}");
        }
        Ok(SimReport {
            events: self.events,
            gestures,
            audits: self.audits,
            census,
        })
    }

    fn play(&mut self, gesture: Gesture) -> Result<()> {
        match gesture {
            Gesture::Drag => {
                let Some(from) = self.random_stack_center() else {
                    return Ok(());
                };
                let to = self.random_point();
                self.press(from, Button::Primary)?;
                self.glide(from, to, 6)?;
                self.release(to, Button::Primary)?;
            }
            Gesture::Click => {
                let Some(at) = self.random_stack_center() else {
                    return Ok(());
                };
                self.press(at, Button::Primary)?;
                self.release(at, Button::Primary)?;
            }
            Gesture::HoldAndDeal => {
                let Some(from) = self.random_stack_center() else {
                    return Ok(());
                };
                self.press(from, Button::Secondary)?;
                self.release(from, Button::Secondary)?;
                for _ in 0..self.rng.random_range(1..4) {
                    let at = self.random_point();
                    self.glide(from, at, 2)?;
                    self.press(at, Button::Secondary)?;
                    self.release(at, Button::Secondary)?;
                }
                let rest = self.random_point();
                self.press(rest, Button::Primary)?;
                self.release(rest, Button::Primary)?;
            }
            Gesture::Slide => {
                let Some(from) = self.random_stack_center() else {
                    return Ok(());
                };
                let to = self.random_point();
                self.slide(from, to)?;
            }
            Gesture::Shortcut => {
                let key = *['f', 's', '1', '5', '0']
                    .choose(&mut self.rng)
                    .unwrap_or(&'f');
                self.send(InputEvent::Key(KeyPress::new(Key::Char(key))))?;
                let at = self.random_point();
                self.glide(at, at, 1)?;
                self.press(at, Button::Primary)?;
                self.release(at, Button::Primary)?;
            }
            Gesture::PickUpAndDrop => {
                let Some(stack) = self.random_stack() else {
                    return Ok(());
                };
                let count = match self.rng.random_range(0..3) {
                    0 => PickCount::All,
                    1 => PickCount::Half,
                    _ => PickCount::Count(self.rng.random_range(1..12)),
                };
                self.send(InputEvent::PickUp { stack, count })?;
                let at = self.own_zone_or_random();
                self.glide(at, at, 1)?;
                self.press(at, Button::Primary)?;
                self.release(at, Button::Primary)?;
            }
            Gesture::HandToTable => {
                let seat = self.table.seat_of(self.ui.local_player());
                let cards: Vec<_> = seat
                    .and_then(|seat| self.table.hand(seat))
                    .map(|hand| hand.card_ids.iter().take(2).copied().collect())
                    .unwrap_or_default();
                if cards.is_empty() {
                    return Ok(());
                }
                let at = self.random_point();
                self.send(InputEvent::HandDrag { cards, point: at })?;
                self.press(at, Button::Primary)?;
                self.release(at, Button::Primary)?;
            }
            Gesture::Abandon => {
                let Some(from) = self.random_stack_center() else {
                    return Ok(());
                };
                let to = self.random_point();
                let button = if self.rng.random_bool(0.5) {
                    Button::Primary
                } else {
                    Button::Secondary
                };
                self.press(from, button)?;
                self.glide(from, to, 4)?;
                if self.rng.random_bool(0.5) {
                    self.send(InputEvent::Key(KeyPress::new(Key::Escape)))?;
                } else {
                    self.send(InputEvent::Blur)?;
                }
            }
            Gesture::SeatDrag => {
                let seats = self.table.seats().len();
                if seats == 0 {
                    return Ok(());
                }
                let seat = self.rng.random_range(0..seats);
                let pointer = self.random_point();
                // seat drags go straight to the store; no census impact
                if let Err(err) = self.table.drag_seat(seat, pointer) {
                    debug!("seat drag refused: {err}");
                }
            }
        }
        Ok(())
    }

    /// Secondary press on a stack, slide it out along the way, drop the rest.
    fn slide(&mut self, from: Point, to: Point) -> Result<()> {
        self.press(from, Button::Secondary)?;
        self.glide(from, to, 12)?;
        self.release(to, Button::Secondary)?;
        self.press(to, Button::Primary)?;
        self.release(to, Button::Primary)
    }

    fn press(&mut self, point: Point, button: Button) -> Result<()> {
        self.send(InputEvent::PointerDown {
            point,
            button,
            time_ms: self.clock,
        })
    }

    fn release(&mut self, point: Point, button: Button) -> Result<()> {
        self.send(InputEvent::PointerUp {
            point,
            button,
            time_ms: self.clock,
        })
    }

    /// Move from `from` to `to` in even steps, with a display frame after each.
    fn glide(&mut self, from: Point, to: Point, steps: usize) -> Result<()> {
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let point = from + (to - from) * t;
            self.send(InputEvent::PointerMove {
                point,
                time_ms: self.clock,
            })?;
            self.send(InputEvent::Frame {
                time_ms: self.clock,
            })?;
        }
        Ok(())
    }

    fn send(&mut self, event: InputEvent) -> Result<()> {
        self.clock += FRAME_MS;
        self.events += 1;
        self.ui.handle(&mut self.table, event);
        if !self.ui.mode().is_active() {
            self.audit()?;
        }
        Ok(())
    }

    fn audit(&mut self) -> Result<()> {
        self.audits += 1;
        if self.table.held().is_some() {
            bail!("cards still held while the table is idle");
        }
        let report = self.table.census();
        if !report.is_ok() {
            bail!("conservation broken after event {}: {report}", self.events);
        }
        Ok(())
    }

    fn random_stack(&mut self) -> Option<StackId> {
        self.table.stacks().choose(&mut self.rng).map(|stack| stack.id)
    }

    fn random_stack_center(&mut self) -> Option<Point> {
        let fp = self.table.footprint();
        self.table
            .stacks()
            .choose(&mut self.rng)
            .map(|stack| stack.center(fp))
    }

    fn random_point(&mut self) -> Point {
        let felt = *self.table.felt();
        let bounds = felt.bounds.unwrap_or_default();
        let x = bounds.x + self.rng.random::<f32>() * bounds.width;
        let y = bounds.y + self.rng.random::<f32>() * bounds.height;
        Point::new(x, y)
    }

    fn own_zone_or_random(&mut self) -> Point {
        let zone = self
            .table
            .seat_of(self.ui.local_player())
            .and_then(|seat| self.table.hand_zone(seat));
        match zone {
            Some(zone) if self.rng.random_bool(0.3) => zone.center(),
            _ => self.random_point(),
        }
    }
}
