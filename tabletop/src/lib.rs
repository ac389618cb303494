//! # Tabletop
//!
//! The core of a shared virtual card table: stacks of playing cards on a
//! felt that may be a rectangle, an oval or a circle, with seats placed
//! around its edge and a private hand per seat.
//!
//! Pointer and keyboard input is interpreted by an explicit gesture state
//! machine built on `enum_dispatch`, and every change lands in a single
//! owned [`TableState`].
//!
//! ## Gestures
//!
//! - **idle**: hover highlighting only
//! - **pendingPress**: primary button down on a stack, below the drag threshold
//! - **dragStack**: a whole stack follows the pointer, written once per frame
//! - **holdStack**: picked-up cards float with the pointer until dropped
//! - **sliding**: cards peel off the held set as the pointer travels
//!
//! ## Core Modules
//!
//! - [`geometry`]: felt containment and clamping
//! - [`perimeter`]: seat positions along the felt edge
//! - [`deck`]: card population and preset layouts
//! - [`store`]: authoritative table state, census, action log and views
//! - [`interaction`]: the gesture state machine
//!
//! ## Example
//!
//! ```
//! use tabletop::{Button, Interaction, Point, Rect, TableSettings, TableState};
//!
//! let mut table = TableState::new(TableSettings::default(), Rect::new(0.0, 0.0, 1200.0, 800.0));
//! let alice = table.add_player("alice");
//! let mut ui = Interaction::with_seed(alice, 7);
//!
//! // Secondary press on the deck picks the whole stack up.
//! let deck = table.stacks()[0].center(table.footprint());
//! ui.pointer_down(&mut table, deck, Button::Secondary, 0.0);
//! assert_eq!(table.held().map(|held| held.len()), Some(52));
//!
//! // Primary release somewhere else puts it down there.
//! ui.pointer_up(&mut table, Point::new(200.0, 200.0), Button::Primary, 100.0);
//! assert!(table.held().is_none());
//! assert!(table.census().is_ok());
//! ```

pub mod coalesce;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod perimeter;
pub mod settings;
pub mod store;

pub use coalesce::FrameBatch;
pub use error::{TableError, TableResult};
pub use geometry::{Felt, Point, Rect, Size, TableShape, clamp_to_boundary, is_inside};
pub use interaction::{
    Button, Effect, InputEvent, Interaction, Key, KeyPress, Mode, ModeState, Presence,
};
pub use model::{
    Card, CardFace, CardId, HeldSelection, PickCount, PlayerId, SeatIndex, Stack, StackId, Zone,
};
pub use settings::{LayoutPreset, TableSettings, Tuning};
pub use store::{
    ActionLog, ConservationReport, HandView, LogEntry, Placement, PlayerUpdate, StackView,
    TableAction, TableState,
};
