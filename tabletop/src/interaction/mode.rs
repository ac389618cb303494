//! Interaction modes.
//!
//! Each variant carries only the fields it needs. Slide bookkeeping lives
//! in [`Sliding`] and nowhere else.

use enum_dispatch::enum_dispatch;
use std::fmt;

use crate::{geometry::Point, model::StackId};

#[enum_dispatch]
pub trait ModeState {
    fn name(&self) -> &'static str;

    /// Whether a gesture is in progress that cancel would unwind.
    fn is_active(&self) -> bool {
        true
    }

    /// Whether the table's held selection belongs to this mode.
    fn holds_cards(&self) -> bool {
        false
    }
}

#[enum_dispatch(ModeState)]
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Idle,
    PendingPress,
    DragStack,
    HoldStack,
    Sliding,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Idle(Idle)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Idle;

/// Primary button down on a stack, not yet past the drag threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingPress {
    pub stack: StackId,
    pub start: Point,
    /// Pointer minus the stack's top-left at press time.
    pub grab_offset: Point,
}

/// A whole stack following the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStack {
    pub stack: StackId,
    pub grab_offset: Point,
    /// Top-left before the drag, for cancel and rejected drops.
    pub origin: Point,
}

/// Secondary button down while holding; becomes a deal or a slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideArm {
    pub start: Point,
    pub pressed_at_ms: f64,
    /// This press picked the cards up, so a plain release deals nothing.
    pub lifted: bool,
}

/// Cards floating with the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoldStack {
    pub arm: Option<SlideArm>,
}

/// Slide-dealing: cards peel off as the pointer travels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sliding {
    pub anchor: Point,
    /// Locked from the first movement away from the anchor.
    pub direction: Option<Point>,
    /// Travel since the last peel.
    pub carry: f32,
    pub last: Point,
    /// Centers already dealt this slide.
    pub trail: Vec<Point>,
    /// Stacks created this slide; never merge targets for later peels.
    pub placed: Vec<StackId>,
}

impl Sliding {
    #[must_use]
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            direction: None,
            carry: 0.0,
            last: anchor,
            trail: Vec::new(),
            placed: Vec::new(),
        }
    }
}

impl ModeState for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn is_active(&self) -> bool {
        false
    }
}

impl ModeState for PendingPress {
    fn name(&self) -> &'static str {
        "pendingPress"
    }
}

impl ModeState for DragStack {
    fn name(&self) -> &'static str {
        "dragStack"
    }
}

impl ModeState for HoldStack {
    fn name(&self) -> &'static str {
        "holdStack"
    }

    fn holds_cards(&self) -> bool {
        true
    }
}

impl ModeState for Sliding {
    fn name(&self) -> &'static str {
        "sliding"
    }

    fn holds_cards(&self) -> bool {
        true
    }
}
