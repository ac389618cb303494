//! Card, stack, seat and hand definitions.
//!
//! These are plain data types. All mutation goes through
//! [`crate::store::TableState`].

pub mod cards;
pub mod held;
pub mod seat;
pub mod stack;

pub use cards::{Card, CardColor, CardFace, CardId, Rank, Suit};
pub use held::{HeldOrigin, HeldSelection, PickCount, PickupMode};
pub use seat::{Hand, Player, PlayerId, Seat, SeatIndex, seat_palette};
pub use stack::{Stack, StackId, Zone};
