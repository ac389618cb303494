//! Slide-deal placement.
//!
//! Peels are gated by distance, not by event count: a fast flick that
//! covers three spacings in one move still deals three cards, spread back
//! along the path behind the pointer.

use rand::Rng;

use crate::{
    geometry::{Felt, Point, Size},
    settings::{MAX_SLIDE_COUNT, Tuning},
};

/// How many cards to peel for `carry` pixels of travel.
#[must_use]
pub fn peel_count(carry: f32, tuning: &Tuning, held: usize) -> usize {
    if tuning.slide_spacing_px <= 0.0 {
        return held.min(tuning.slide_max_peels_per_event);
    }
    let earned = (carry / tuning.slide_spacing_px).floor().max(0.0) as usize;
    earned.min(tuning.slide_max_peels_per_event).min(held)
}

/// Center for one peeled card.
///
/// `behind` is how many more cards this event still places after this
/// one; the card steps back that many spacings so the batch lands in
/// path order. The result is jittered sideways, pushed further back until
/// it clears every earlier center in `trail` (bounded attempts), and
/// clamped onto the felt.
#[allow(clippy::too_many_arguments)]
pub fn placement<R>(
    pointer: Point,
    direction: Point,
    behind: usize,
    trail: &[Point],
    tuning: &Tuning,
    felt: &Felt,
    footprint: Size,
    rng: &mut R,
) -> Point
where
    R: Rng + ?Sized,
{
    let jitter = tuning.slide_jitter_px.max(0.0);
    let sideways = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    let mut raw = pointer - direction * (behind as f32 * tuning.slide_spacing_px)
        + direction.perpendicular() * sideways;
    let mut center = felt.clamp(raw, footprint);

    let clear = |p: Point| {
        trail
            .iter()
            .all(|earlier| earlier.distance(p) >= tuning.slide_min_separation_px)
    };
    for _ in 0..tuning.slide_max_attempts.min(MAX_SLIDE_COUNT) {
        if clear(center) {
            break;
        }
        raw = raw - direction * tuning.slide_min_separation_px;
        center = felt.clamp(raw, footprint);
    }
    center
}
