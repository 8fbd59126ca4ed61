//! Primitive collision shapes
//!
//! Screen convention: the origin is the top-left of the canvas and +Y grows
//! downward. Circles are anchored at their center, boxes at their top-left
//! corner.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A 2D coordinate
pub type Point = Vec2;

fn check_extent(what: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::DegenerateShape { what, value })
    }
}

/// A disk (player, target, bullets)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircle")]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            center,
            radius: check_extent("radius", radius)?,
        })
    }

    /// Re-check a circle that was built without [`Circle::new`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extent("radius", self.radius).map(|_| ())
    }
}

#[derive(Deserialize)]
struct RawCircle {
    center: Point,
    radius: f32,
}

impl TryFrom<RawCircle> for Circle {
    type Error = ConfigError;

    fn try_from(raw: RawCircle) -> Result<Self, Self::Error> {
        Circle::new(raw.center, raw.radius)
    }
}

/// An axis-aligned box (obstacles)
///
/// Named `Rect` to stay clear of `std::boxed::Box`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(origin: Point, width: f32, height: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            origin,
            width: check_extent("width", width)?,
            height: check_extent("height", height)?,
        })
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Point {
        self.origin + Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.origin + Vec2::new(self.width, self.height) * 0.5
    }

    /// Re-check a box that was built without [`Rect::new`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_extent("width", self.width)?;
        check_extent("height", self.height)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawRect {
    origin: Point,
    width: f32,
    height: f32,
}

impl TryFrom<RawRect> for Rect {
    type Error = ConfigError;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        Rect::new(raw.origin, raw.width, raw.height)
    }
}

/// Shape discriminant used by colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Circle,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Circle => "circle",
        }
    }

    /// Numeric shape codes used by the browser build (0 = box, 1 = circle)
    pub fn from_code(code: u32) -> Result<Self, ConfigError> {
        match code {
            0 => Ok(ShapeKind::Box),
            1 => Ok(ShapeKind::Circle),
            other => Err(ConfigError::InvalidShape(other.to_string())),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "box" | "rect" => Ok(ShapeKind::Box),
            "circle" => Ok(ShapeKind::Circle),
            _ => Err(ConfigError::InvalidShape(s.to_string())),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Rect(Rect),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Rect(_) => ShapeKind::Box,
        }
    }

    /// Fail if any extent is zero, negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Shape::Circle(c) => c.validate(),
            Shape::Rect(r) => r.validate(),
        }
    }

    /// Anchor position (circle center, box top-left)
    pub fn position(&self) -> Point {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Rect(r) => r.origin,
        }
    }

    pub fn set_position(&mut self, pos: Point) {
        match self {
            Shape::Circle(c) => c.center = pos,
            Shape::Rect(r) => r.origin = pos,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        let pos = self.position();
        self.set_position(pos + delta);
    }

    pub fn center(&self) -> Point {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Rect(r) => r.center(),
        }
    }

    /// Side of the square the shape must fit in: diameter or the larger box edge
    pub fn footprint(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.radius * 2.0,
            Shape::Rect(r) => r.width.max(r.height),
        }
    }

    /// Copy of this shape moved so its center sits at `center`
    pub fn placed_at(&self, center: Point) -> Shape {
        match *self {
            Shape::Circle(c) => Shape::Circle(Circle { center, ..c }),
            Shape::Rect(r) => Shape::Rect(Rect {
                origin: center - Vec2::new(r.width, r.height) * 0.5,
                ..r
            }),
        }
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Shape::Circle(c) => (c.center - Vec2::splat(c.radius), c.center + Vec2::splat(c.radius)),
            Shape::Rect(r) => (r.origin, r.max()),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shapes_rejected() {
        assert!(Circle::new(Vec2::ZERO, 0.0).is_err());
        assert!(Circle::new(Vec2::ZERO, -1.0).is_err());
        assert!(Circle::new(Vec2::ZERO, f32::NAN).is_err());
        assert!(Rect::new(Vec2::ZERO, 10.0, 0.0).is_err());
        assert!(Rect::new(Vec2::ZERO, -5.0, 10.0).is_err());
        assert!(Rect::new(Vec2::ZERO, f32::INFINITY, 10.0).is_err());

        assert_eq!(
            Rect::new(Vec2::ZERO, 10.0, 0.0),
            Err(ConfigError::DegenerateShape {
                what: "height",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_hand_built_shapes_fail_validation() {
        let circle = Shape::Circle(Circle {
            center: Vec2::ZERO,
            radius: -5.0,
        });
        assert_eq!(
            circle.validate(),
            Err(ConfigError::DegenerateShape {
                what: "radius",
                value: -5.0
            })
        );

        let rect = Shape::Rect(Rect {
            origin: Vec2::ZERO,
            width: 10.0,
            height: 0.0,
        });
        assert!(rect.validate().is_err());
        assert!(Shape::from(Rect::new(Vec2::ZERO, 1.0, 1.0).unwrap()).validate().is_ok());
    }

    #[test]
    fn test_deserialize_rejects_degenerate_extents() {
        let err = serde_json::from_str::<Circle>(r#"{"center":[0.0,0.0],"radius":0.0}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<Rect>(r#"{"origin":[1.0,2.0],"width":-3.0,"height":4.0}"#);
        assert!(err.is_err());

        let circle: Circle = serde_json::from_str(r#"{"center":[1.0,2.0],"radius":3.0}"#).unwrap();
        assert_eq!(circle, Circle::new(Vec2::new(1.0, 2.0), 3.0).unwrap());
    }

    #[test]
    fn test_shape_kind_parse() {
        assert_eq!("box".parse::<ShapeKind>(), Ok(ShapeKind::Box));
        assert_eq!("Circle".parse::<ShapeKind>(), Ok(ShapeKind::Circle));
        assert_eq!(ShapeKind::from_code(0), Ok(ShapeKind::Box));
        assert_eq!(ShapeKind::from_code(1), Ok(ShapeKind::Circle));
        assert!(matches!(
            "triangle".parse::<ShapeKind>(),
            Err(ConfigError::InvalidShape(_))
        ));
        assert!(ShapeKind::from_code(2).is_err());
    }

    #[test]
    fn test_footprint_and_placement() {
        let circle = Shape::from(Circle::new(Vec2::ZERO, 16.0).unwrap());
        assert_eq!(circle.footprint(), 32.0);
        assert_eq!(circle.placed_at(Vec2::new(50.0, 60.0)).position(), Vec2::new(50.0, 60.0));

        let rect = Shape::from(Rect::new(Vec2::ZERO, 96.0, 40.0).unwrap());
        assert_eq!(rect.footprint(), 96.0);
        let placed = rect.placed_at(Vec2::new(100.0, 100.0));
        assert_eq!(placed.position(), Vec2::new(52.0, 80.0));
        assert_eq!(placed.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_bounds() {
        let circle = Shape::from(Circle::new(Vec2::new(10.0, 10.0), 5.0).unwrap());
        assert_eq!(circle.bounds(), (Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0)));

        let rect = Shape::from(Rect::new(Vec2::new(1.0, 2.0), 3.0, 4.0).unwrap());
        assert_eq!(rect.bounds(), (Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0)));
    }
}
