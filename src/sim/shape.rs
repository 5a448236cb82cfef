//! Collision shapes and intersection tests
//!
//! Everything the core needs from a physics subsystem: pairwise shape overlap
//! for contact enumeration, and segment-vs-shape tests for slice hit testing.
//! Shapes are stored unpositioned; world position comes from the owning body.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A collision shape, positioned by its owning body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box given by half extents
    Rect { half: Vec2 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Axis-aligned bounding half extents (circle inflated to its box)
    pub fn bounds_half(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { half } => half,
        }
    }
}

/// Closest point to `point` on the segment `a`-`b`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Do two positioned shapes overlap?
pub fn shapes_overlap(a: &Shape, pos_a: Vec2, b: &Shape, pos_b: Vec2) -> bool {
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            pos_a.distance_squared(pos_b) <= (ra + rb) * (ra + rb)
        }
        (Shape::Rect { half: ha }, Shape::Rect { half: hb }) => {
            let d = (pos_a - pos_b).abs();
            d.x <= ha.x + hb.x && d.y <= ha.y + hb.y
        }
        (Shape::Circle { radius }, Shape::Rect { half }) => {
            circle_rect_overlap(pos_a, radius, pos_b, half)
        }
        (Shape::Rect { half }, Shape::Circle { radius }) => {
            circle_rect_overlap(pos_b, radius, pos_a, half)
        }
    }
}

fn circle_rect_overlap(center: Vec2, radius: f32, rect_pos: Vec2, half: Vec2) -> bool {
    let local = center - rect_pos;
    let clamped = local.clamp(-half, half);
    local.distance_squared(clamped) <= radius * radius
}

/// Does the segment `p0`-`p1` touch the positioned shape?
pub fn segment_hits_shape(p0: Vec2, p1: Vec2, shape: &Shape, pos: Vec2) -> bool {
    match *shape {
        Shape::Circle { radius } => {
            let closest = closest_point_on_segment(p0, p1, pos);
            closest.distance_squared(pos) <= radius * radius
        }
        Shape::Rect { half } => segment_hits_aabb(p0 - pos, p1 - pos, half),
    }
}

/// Slab test against an origin-centered box
fn segment_hits_aabb(p0: Vec2, p1: Vec2, half: Vec2) -> bool {
    let d = p1 - p0;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for axis in 0..2 {
        let (start, delta, extent) = if axis == 0 {
            (p0.x, d.x, half.x)
        } else {
            (p0.y, d.y, half.y)
        };

        if delta.abs() < 1e-6 {
            if start.abs() > extent {
                return false;
            }
            continue;
        }

        let inv = 1.0 / delta;
        let mut t0 = (-extent - start) * inv;
        let mut t1 = (extent - start) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }

    true
}
