use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
    // Jokers carry the wild suit.
    Wild,
}

impl Suit {
    pub const STANDARD: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Wild => "w",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    pub const STANDARD: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Joker => "★",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CardColor {
    Red,
    Black,
}

/// An immutable playing card. Cards only come into existence when the deck
/// is (re)built.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub rank: Rank,
    pub suit: Suit,
    pub color: CardColor,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, rank: Rank, suit: Suit) -> Self {
        let color = match suit {
            Suit::Diamond | Suit::Heart => CardColor::Red,
            Suit::Club | Suit::Spade | Suit::Wild => CardColor::Black,
        };
        Self {
            id,
            rank,
            suit,
            color,
        }
    }

    #[must_use]
    pub fn joker(id: CardId, color: CardColor) -> Self {
        Self {
            id,
            rank: Rank::Joker,
            suit: Suit::Wild,
            color,
        }
    }

    #[must_use]
    pub fn is_joker(&self) -> bool {
        self.rank == Rank::Joker
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_joker() {
            let color = match self.color {
                CardColor::Red => "red",
                CardColor::Black => "black",
            };
            return write!(f, "{} joker", color);
        }
        let repr = format!("{}{}", self.rank, self.suit);
        write!(f, "{repr:>3}")
    }
}

/// Which way up a card shows.
///
/// Most cards follow their containing stack. A card flipped on its own is
/// pinned until it moves to another stack or hand.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum CardFace {
    #[default]
    Inherited,
    Pinned {
        face_up: bool,
    },
}

impl CardFace {
    #[must_use]
    pub fn resolve(self, stack_face_up: bool) -> bool {
        match self {
            Self::Inherited => stack_face_up,
            Self::Pinned { face_up } => face_up,
        }
    }
}
