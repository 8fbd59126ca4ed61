//! Collision detection with tag-based filtering
//!
//! Narrow-phase tests between points, circles and axis-aligned boxes, plus the
//! per-tick pairwise pass. There is no broad phase: the pass is O(n²) and is
//! meant for tens of bodies, not thousands.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::shape::{Circle, Point, Rect, Shape, ShapeKind};
use crate::error::ConfigError;
use crate::{clamp, distance};

/// Is the point inside or on the edge of the circle?
///
/// Boundary-inclusive: a point exactly `radius` away counts as touching.
#[inline]
pub fn point_in_circle(p: Point, c: &Circle) -> bool {
    distance(p, c.center) <= c.radius
}

/// Do two circles overlap?
///
/// Boundary-exclusive: circles that merely touch (`distance == ra + rb`) do
/// not collide. This differs from [`point_in_circle`] and is kept as-is.
#[inline]
pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    distance(a.center, b.center) < a.radius + b.radius
}

/// Do two axis-aligned boxes overlap? Touching edges do not count.
#[inline]
pub fn box_box(a: &Rect, b: &Rect) -> bool {
    a.origin.x < b.origin.x + b.width
        && a.origin.x + a.width > b.origin.x
        && a.origin.y < b.origin.y + b.height
        && a.origin.y + a.height > b.origin.y
}

/// Does the circle touch the box?
///
/// Clamps the circle center into the box to find the closest point on the box,
/// then tests that point against the circle.
#[inline]
pub fn box_circle(rect: &Rect, circle: &Circle) -> bool {
    let max = rect.max();
    let closest = Point::new(
        clamp(circle.center.x, rect.origin.x, max.x),
        clamp(circle.center.y, rect.origin.y, max.y),
    );
    point_in_circle(closest, circle)
}

/// Geometric overlap between any two shapes
///
/// Mixed pairs are normalized so the box is always passed first.
pub fn shapes_collide(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Rect(a), Shape::Rect(b)) => box_box(a, b),
        (Shape::Rect(r), Shape::Circle(c)) => box_circle(r, c),
        (Shape::Circle(c), Shape::Rect(r)) => box_circle(r, c),
        (Shape::Circle(a), Shape::Circle(b)) => circle_circle(a, b),
    }
}

/// Collision category metadata attached to a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    pub kind: ShapeKind,
    /// Category of this body ("player", "obstacle", ...)
    pub tag: String,
    /// Categories this body reacts to
    pub collides_with: BTreeSet<String>,
}

impl Collider {
    pub fn new<I, S>(kind: ShapeKind, tag: impl Into<String>, collides_with: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            tag: tag.into(),
            collides_with: collides_with.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from an untyped shape name, rejecting unknown shapes up front
    pub fn parse<I, S>(
        shape: &str,
        tag: impl Into<String>,
        collides_with: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(shape.parse()?, tag, collides_with))
    }

    #[inline]
    pub fn reacts_to(&self, tag: &str) -> bool {
        self.collides_with.contains(tag)
    }
}

/// A collidable entity: an id, a shape and its collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBody")]
pub struct Body {
    pub id: u32,
    pub shape: Shape,
    pub collider: Collider,
}

impl Body {
    /// Pair a shape with a collider; the collider must describe the same shape
    pub fn new(id: u32, shape: Shape, collider: Collider) -> Result<Self, ConfigError> {
        shape.validate()?;
        if collider.kind != shape.kind() {
            return Err(ConfigError::ShapeMismatch {
                collider: collider.kind,
                body: shape.kind(),
            });
        }
        Ok(Self { id, shape, collider })
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.collider.tag
    }
}

#[derive(Deserialize)]
struct RawBody {
    id: u32,
    shape: Shape,
    collider: Collider,
}

impl TryFrom<RawBody> for Body {
    type Error = ConfigError;

    fn try_from(raw: RawBody) -> Result<Self, Self::Error> {
        Body::new(raw.id, raw.shape, raw.collider)
    }
}

impl AsRef<Body> for Body {
    fn as_ref(&self) -> &Body {
        self
    }
}

/// Does `a` react to a collision with `b`?
///
/// Directional: only `a`'s filter is consulted. A body never collides with
/// itself, even when its own tag is in its filter.
pub fn resolve_collision(a: &Body, b: &Body) -> bool {
    a.id != b.id && a.collider.reacts_to(&b.collider.tag) && shapes_collide(&a.shape, &b.shape)
}

/// A detected collision, from the point of view of `source`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub source: u32,
    pub target: u32,
}

/// Full pairwise scan over ordered pairs, in list order
///
/// Read-only: callers apply any removals after the scan.
pub fn collision_pass<T: AsRef<Body>>(bodies: &[T]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for a in bodies.iter().map(AsRef::as_ref) {
        for b in bodies.iter().map(AsRef::as_ref) {
            if resolve_collision(a, b) {
                contacts.push(Contact {
                    source: a.id,
                    target: b.id,
                });
            }
        }
    }

    contacts
}
