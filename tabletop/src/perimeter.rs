//! Perimeter parameterization used for seat placement.
//!
//! A seat position is a normalized parameter `t ∈ [0, 1)` along the table
//! boundary. Rectangles are walked by arc length starting at the top-left
//! corner (top, right, bottom, left). Ovals and circles are parameterized
//! by angle, starting at the top and running clockwise on screen.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::{Point, Rect, TableShape};

/// A point on (or offset from) the boundary, with the outward unit normal
/// of the boundary at that location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerimeterPoint {
    pub point: Point,
    pub normal: Point,
}

/// Wrap any parameter into `[0, 1)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_param(t: f32) -> f32 {
    if !t.is_finite() {
        return 0.0;
    }
    let wrapped = t.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

fn radii(shape: TableShape, boundary: &Rect) -> (f32, f32) {
    match shape {
        TableShape::Circle => {
            let r = boundary.width.min(boundary.height) / 2.0;
            (r, r)
        }
        _ => (boundary.width / 2.0, boundary.height / 2.0),
    }
}

/// Total boundary length. Ovals use Ramanujan's approximation.
#[must_use]
pub fn perimeter_length(shape: TableShape, boundary: &Rect) -> f32 {
    if boundary.is_empty() {
        return 0.0;
    }
    match shape {
        TableShape::Rectangle => 2.0 * (boundary.width + boundary.height),
        TableShape::Circle => TAU * radii(shape, boundary).0,
        TableShape::Oval => {
            let (a, b) = radii(shape, boundary);
            PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
        }
    }
}

/// Convert a fixed pixel gap into a parameter gap for this boundary.
#[must_use]
pub fn min_gap_param(shape: TableShape, boundary: &Rect, gap_px: f32) -> f32 {
    let length = perimeter_length(shape, boundary);
    if length <= 0.0 || gap_px <= 0.0 {
        0.0
    } else {
        (gap_px / length).min(0.5)
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Parameter of the boundary point nearest to `point`.
#[must_use]
pub fn param_from_pointer(shape: TableShape, boundary: &Rect, point: Point) -> f32 {
    if boundary.is_empty() {
        return 0.0;
    }
    match shape {
        TableShape::Rectangle => {
            let (w, h) = (boundary.width, boundary.height);
            let px = point.x.clamp(boundary.x, boundary.right());
            let py = point.y.clamp(boundary.y, boundary.bottom());
            let candidates = [
                (Edge::Top, py - boundary.y),
                (Edge::Right, boundary.right() - px),
                (Edge::Bottom, boundary.bottom() - py),
                (Edge::Left, px - boundary.x),
            ];
            let mut nearest = candidates[0];
            for candidate in &candidates[1..] {
                if candidate.1 < nearest.1 {
                    nearest = *candidate;
                }
            }
            let arc = match nearest.0 {
                Edge::Top => px - boundary.x,
                Edge::Right => w + (py - boundary.y),
                Edge::Bottom => w + h + (boundary.right() - px),
                Edge::Left => 2.0 * w + h + (boundary.bottom() - py),
            };
            normalize_param(arc / (2.0 * (w + h)))
        }
        TableShape::Oval | TableShape::Circle => {
            let (rx, ry) = radii(shape, boundary);
            let center = boundary.center();
            let angle = ((point.y - center.y) / ry).atan2((point.x - center.x) / rx);
            normalize_param((angle + FRAC_PI_2) / TAU)
        }
    }
}

/// Boundary point for parameter `t`, pushed outward along the normal by
/// `rail_offset` (negative values move toward the center).
#[must_use]
pub fn point_from_param(shape: TableShape, boundary: &Rect, t: f32, rail_offset: f32) -> PerimeterPoint {
    let t = normalize_param(t);
    let on_boundary = match shape {
        TableShape::Rectangle => {
            let (w, h) = (boundary.width.max(0.0), boundary.height.max(0.0));
            let arc = t * 2.0 * (w + h);
            if arc < w {
                PerimeterPoint {
                    point: Point::new(boundary.x + arc, boundary.y),
                    normal: Point::new(0.0, -1.0),
                }
            } else if arc < w + h {
                PerimeterPoint {
                    point: Point::new(boundary.right(), boundary.y + (arc - w)),
                    normal: Point::new(1.0, 0.0),
                }
            } else if arc < 2.0 * w + h {
                PerimeterPoint {
                    point: Point::new(boundary.right() - (arc - w - h), boundary.bottom()),
                    normal: Point::new(0.0, 1.0),
                }
            } else {
                PerimeterPoint {
                    point: Point::new(boundary.x, boundary.bottom() - (arc - 2.0 * w - h)),
                    normal: Point::new(-1.0, 0.0),
                }
            }
        }
        TableShape::Oval | TableShape::Circle => {
            let (rx, ry) = radii(shape, boundary);
            let theta = t * TAU - FRAC_PI_2;
            let (sin, cos) = theta.sin_cos();
            let center = boundary.center();
            let normal = if rx > 0.0 && ry > 0.0 {
                Point::new(cos / rx, sin / ry).normalized()
            } else {
                None
            };
            PerimeterPoint {
                point: Point::new(center.x + rx * cos, center.y + ry * sin),
                normal: normal.unwrap_or(Point::new(cos, sin)),
            }
        }
    };
    PerimeterPoint {
        point: on_boundary.point + on_boundary.normal * rail_offset,
        normal: on_boundary.normal,
    }
}

/// Evenly spread default parameters for `count` seats.
#[must_use]
pub fn evenly_spaced(count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| normalize_param((i as f32 + 0.5) / count as f32))
        .collect()
}

/// Slack for comparing seat gaps that were themselves computed in f32.
const GAP_EPSILON: f32 = 1e-5;

/// Whether every pair of circular neighbors in `params` is at least
/// `min_gap` apart.
#[must_use]
pub fn respects_gap(params: &[f32], min_gap: f32) -> bool {
    if params.len() < 2 || min_gap <= 0.0 {
        return true;
    }
    let mut sorted: Vec<f32> = params.iter().copied().map(normalize_param).collect();
    sorted.sort_by(f32::total_cmp);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return true;
    };
    let wrap = first + 1.0 - last;
    sorted
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .chain(std::iter::once(wrap))
        .all(|gap| gap >= min_gap - GAP_EPSILON)
}

/// Keep `params` when they honor `min_gap`, otherwise spread them evenly.
#[must_use]
pub fn spread_if_crowded(params: &[f32], min_gap: f32) -> Vec<f32> {
    if respects_gap(params, min_gap) {
        params.to_vec()
    } else {
        evenly_spaced(params.len())
    }
}

/// Reposition seat `index` toward `candidate` without passing through or
/// crowding either circular neighbor.
///
/// The result stays within `[prev + min_gap, next - min_gap]`, where `prev`
/// and `next` are the neighbors of the seat's current parameter and `next`
/// is shifted by +1 when the window wraps past 1. A candidate in the
/// forbidden arc snaps to the nearer window edge. If the window is empty
/// the seat keeps its current parameter.
#[must_use]
pub fn constrain_seat_param(params: &[f32], index: usize, candidate: f32, min_gap: f32) -> f32 {
    let candidate = normalize_param(candidate);
    let Some(current) = params.get(index).copied().map(normalize_param) else {
        return candidate;
    };
    if params.len() < 2 {
        return candidate;
    }

    let mut others: Vec<f32> = params
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, t)| normalize_param(*t))
        .collect();
    others.sort_by(f32::total_cmp);

    let prev = others
        .iter()
        .rev()
        .find(|t| **t <= current)
        .or(others.last())
        .copied()
        .unwrap_or(current);
    let mut next = others
        .iter()
        .find(|t| **t > current)
        .or(others.first())
        .copied()
        .unwrap_or(current);
    if next <= prev {
        next += 1.0;
    }

    let lo = prev + min_gap;
    let hi = next - min_gap;
    if hi < lo {
        return current;
    }

    let mut value = candidate;
    while value < prev {
        value += 1.0;
    }
    while value >= prev + 1.0 {
        value -= 1.0;
    }

    let constrained = if value < lo {
        lo
    } else if value <= hi {
        value
    } else if value - hi <= (lo + 1.0) - value {
        hi
    } else {
        lo
    };
    normalize_param(constrained)
}
