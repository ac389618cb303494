//! Table error types.

use thiserror::Error;

use crate::model::{CardId, PlayerId, SeatIndex, StackId};

/// Errors from table store operations.
///
/// None of these are fatal. Most mean the request referred to something a
/// previous mutation already removed, and the table is left unchanged.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error("stack {0} no longer exists")]
    StackNotFound(StackId),

    #[error("seat {0} does not exist")]
    SeatNotFound(SeatIndex),

    #[error("player {0} does not exist")]
    PlayerNotFound(PlayerId),

    #[error("card {0} is not on the table")]
    CardNotOnTable(CardId),

    #[error("card {card} is not in seat {seat}'s hand")]
    CardNotInHand { card: CardId, seat: SeatIndex },

    #[error("hand index {0} out of bounds")]
    HandIndexOutOfBounds(usize),

    #[error("already holding {0} cards")]
    AlreadyHolding(usize),

    #[error("nothing is held")]
    NothingHeld,

    #[error("can't merge stack {0} onto itself")]
    SelfMerge(StackId),

    #[error("nothing to move")]
    NothingToMove,
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
