//! Host-facing input events and effects.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::Point,
    model::{CardId, PickCount, StackId},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Button {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Key {
    Escape,
    Char(char),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyPress {
    pub key: Key,
    /// Shortcuts are ignored while a text field has focus. Escape is not.
    pub text_input_focused: bool,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            text_input_focused: false,
        }
    }
}

/// Everything the host can feed the machine. Times are milliseconds on any
/// monotonic clock.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum InputEvent {
    PointerDown {
        point: Point,
        button: Button,
        time_ms: f64,
    },
    PointerMove {
        point: Point,
        time_ms: f64,
    },
    PointerUp {
        point: Point,
        button: Button,
        time_ms: f64,
    },
    PointerCancel,
    Blur,
    Key(KeyPress),
    Frame {
        time_ms: f64,
    },
    /// Menu action on a stack.
    PickUp {
        stack: StackId,
        count: PickCount,
    },
    /// Cards dragged out of the local player's hand onto the surface.
    HandDrag {
        cards: Vec<CardId>,
        point: Point,
    },
}

/// What the host should do after an event.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Effect {
    /// Call back with [`InputEvent::Frame`] on the next display refresh.
    RequestFrame,
    OpenMenu(StackId),
    CloseMenu,
    HoverChanged(Option<StackId>),
}
