//! Felt-boundary geometry.
//!
//! All containment and clamping works on object *centers*: a card whose
//! center satisfies [`is_inside`] lies entirely on the felt. The playable
//! region is the boundary rectangle shrunk by half the object footprint,
//! interpreted according to the table [`TableShape`].

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

/// Relative slack used when deciding whether a point is already on the
/// shrunk boundary. Keeps clamping idempotent under float rounding.
const EDGE_EPSILON: f32 = 1e-4;

/// Absolute tolerance for coordinates around `magnitude`.
fn slack(magnitude: f32) -> f32 {
    EDGE_EPSILON * magnitude.abs().max(1.0)
}

fn round_slack(center: Point, extent: f32) -> f32 {
    slack(center.x.abs().max(center.y.abs()).max(extent))
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    /// The vector rotated a quarter turn.
    #[must_use]
    pub fn perpendicular(self) -> Point {
        Point::new(-self.y, self.x)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width and height of an object, usually the card footprint.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn half(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of `size` whose top-left corner is `origin`.
    #[must_use]
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// A rectangle of `size` centered on `center`.
    #[must_use]
    pub fn centered(center: Point, size: Size) -> Self {
        Self::from_origin(center - size.half(), size)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Rectangle,
    Oval,
    Circle,
}

impl TableShape {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Some(Self::Rectangle),
            "oval" | "ellipse" => Some(Self::Oval),
            "circle" | "round" => Some(Self::Circle),
            _ => None,
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Rectangle => "rectangle",
            Self::Oval => "oval",
            Self::Circle => "circle",
        };
        write!(f, "{repr}")
    }
}

/// The shrunk playable region for a given shape and footprint.
enum Region {
    Box {
        min: Point,
        max: Point,
        center: Point,
    },
    Ellipse {
        center: Point,
        rx: f32,
        ry: f32,
    },
    Disc {
        center: Point,
        radius: f32,
    },
    Collapsed(Point),
}

fn usable(boundary: Option<&Rect>) -> Option<&Rect> {
    boundary.filter(|rect| !rect.is_empty())
}

fn region(boundary: &Rect, shape: TableShape, footprint: Size) -> Region {
    let center = boundary.center();
    let half = footprint.half();
    match shape {
        TableShape::Rectangle => Region::Box {
            min: Point::new(boundary.x + half.x, boundary.y + half.y),
            max: Point::new(boundary.right() - half.x, boundary.bottom() - half.y),
            center,
        },
        TableShape::Oval => {
            let rx = boundary.width / 2.0 - half.x;
            let ry = boundary.height / 2.0 - half.y;
            if rx <= 0.0 || ry <= 0.0 {
                Region::Collapsed(center)
            } else {
                Region::Ellipse { center, rx, ry }
            }
        }
        TableShape::Circle => {
            let radius = boundary.width.min(boundary.height) / 2.0 - half.x.max(half.y);
            if radius <= 0.0 {
                Region::Collapsed(center)
            } else {
                Region::Disc { center, radius }
            }
        }
    }
}

/// Clamp one axis of a box region; a degenerate axis collapses to the
/// center coordinate.
fn clamp_axis(value: f32, min: f32, max: f32, center: f32) -> f32 {
    if min > max {
        center
    } else {
        value.clamp(min, max)
    }
}

fn axis_inside(value: f32, min: f32, max: f32, center: f32) -> bool {
    if min > max {
        (value - center).abs() <= slack(center)
    } else {
        let tol = slack(min.abs().max(max.abs()));
        value >= min - tol && value <= max + tol
    }
}

/// Whether an object of `footprint` centered at `point` lies on the felt.
///
/// An empty or missing boundary accepts every point.
#[must_use]
pub fn is_inside(point: Point, boundary: Option<&Rect>, shape: TableShape, footprint: Size) -> bool {
    let Some(boundary) = usable(boundary) else {
        return true;
    };
    match region(boundary, shape, footprint) {
        Region::Box { min, max, center } => {
            axis_inside(point.x, min.x, max.x, center.x)
                && axis_inside(point.y, min.y, max.y, center.y)
        }
        Region::Ellipse { center, rx, ry } => {
            let tol = round_slack(center, rx.max(ry));
            point.distance(project_ellipse(point, center, rx, ry)) <= tol
        }
        Region::Disc { center, radius } => {
            let tol = round_slack(center, radius);
            point.distance(center) <= radius + tol
        }
        Region::Collapsed(center) => {
            point.distance(center) <= round_slack(center, 0.0)
        }
    }
}

/// Radial projection onto the ellipse, or `point` itself when it is inside.
fn project_ellipse(point: Point, center: Point, rx: f32, ry: f32) -> Point {
    let offset = point - center;
    let nx = offset.x / rx;
    let ny = offset.y / ry;
    let norm = nx * nx + ny * ny;
    if norm <= 1.0 {
        point
    } else {
        center + offset * (1.0 / norm.sqrt())
    }
}

/// Project `point` onto the playable region. Points already inside are
/// returned unchanged, so the function is idempotent.
#[must_use]
pub fn clamp_to_boundary(
    point: Point,
    boundary: Option<&Rect>,
    shape: TableShape,
    footprint: Size,
) -> Point {
    let Some(boundary) = usable(boundary) else {
        return point;
    };
    match region(boundary, shape, footprint) {
        Region::Box { min, max, center } => Point::new(
            clamp_axis(point.x, min.x, max.x, center.x),
            clamp_axis(point.y, min.y, max.y, center.y),
        ),
        Region::Ellipse { center, rx, ry } => {
            let projected = project_ellipse(point, center, rx, ry);
            let tol = round_slack(center, rx.max(ry));
            if point.distance(projected) <= tol {
                point
            } else {
                projected
            }
        }
        Region::Disc { center, radius } => {
            let offset = point - center;
            let distance = offset.length();
            let tol = round_slack(center, radius);
            if distance <= radius + tol {
                point
            } else {
                center + offset * (radius / distance)
            }
        }
        Region::Collapsed(center) => center,
    }
}

/// The playable table surface: a boundary rectangle interpreted by shape.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Felt {
    pub bounds: Option<Rect>,
    pub shape: TableShape,
}

impl Felt {
    #[must_use]
    pub const fn new(bounds: Rect, shape: TableShape) -> Self {
        Self {
            bounds: Some(bounds),
            shape,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds.map(|rect| rect.center()).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, center: Point, footprint: Size) -> bool {
        is_inside(center, self.bounds.as_ref(), self.shape, footprint)
    }

    #[must_use]
    pub fn clamp(&self, center: Point, footprint: Size) -> Point {
        clamp_to_boundary(center, self.bounds.as_ref(), self.shape, footprint)
    }

    /// Clamp a top-left anchored object by clamping its center.
    #[must_use]
    pub fn clamp_origin(&self, origin: Point, footprint: Size) -> Point {
        self.clamp(origin + footprint.half(), footprint) - footprint.half()
    }
}
