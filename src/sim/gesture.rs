//! Touch-gesture path tracking for the slicing game
//!
//! Raw pointer samples become a bounded polyline: at most
//! [`GESTURE_MAX_POINTS`] timestamped points, oldest dropped first. The
//! polyline doubles as the slice hit-tester; fewer than two points is nothing
//! to draw and nothing to test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::segment_hits_shape;
use super::state::{Entity, EntityId};
use crate::consts::GESTURE_MAX_POINTS;

/// One pointer sample, stamped with the tick it was applied on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub pos: Vec2,
    pub tick: u64,
}

/// Bounded ordered buffer of pointer samples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GesturePath {
    points: Vec<PathPoint>,
    active: bool,
}

impl GesturePath {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(GESTURE_MAX_POINTS),
            active: false,
        }
    }

    /// Pointer down: clear the buffer and start a new gesture
    pub fn begin(&mut self, pos: Vec2, tick: u64) {
        self.points.clear();
        self.points.push(PathPoint { pos, tick });
        self.active = true;
    }

    /// Pointer move: append, dropping oldest samples past the cap
    pub fn extend(&mut self, pos: Vec2, tick: u64) {
        self.points.push(PathPoint { pos, tick });
        while self.points.len() > GESTURE_MAX_POINTS {
            self.points.remove(0);
        }
    }

    /// Pointer up/cancel. The buffer is left as-is so the shell can fade the
    /// polyline out; returns whether this ended an active gesture, so calling
    /// it twice signals the fade once.
    pub fn end(&mut self) -> bool {
        std::mem::take(&mut self.active)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Samples in arrival order
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Positions to draw, or empty when below the two-point minimum
    pub fn polyline(&self) -> Vec<Vec2> {
        if self.points.len() < 2 {
            return Vec::new();
        }
        self.points.iter().map(|p| p.pos).collect()
    }

    /// Entities crossed by any path segment, each reported once, in the order
    /// given (callers pass the id-sorted registry). Short paths hit nothing.
    pub fn hit_test(&self, entities: &[Entity]) -> Vec<EntityId> {
        if self.points.len() < 2 {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for entity in entities {
            let crossed = self.points.windows(2).any(|seg| {
                segment_hits_shape(seg[0].pos, seg[1].pos, &entity.body.shape, entity.pos)
            });
            if crossed {
                hits.push(entity.id);
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Shape;
    use crate::sim::state::{PhysicsBody, Role};
    use proptest::prelude::*;

    fn target(id: EntityId, pos: Vec2) -> Entity {
        Entity::new(
            id,
            Role::SlicedTarget,
            pos,
            PhysicsBody::new(Shape::circle(10.0)),
        )
    }

    #[test]
    fn test_begin_clears_previous_gesture() {
        let mut path = GesturePath::new();
        path.begin(Vec2::ZERO, 0);
        path.extend(Vec2::ONE, 1);
        path.begin(Vec2::new(5.0, 5.0), 2);
        assert_eq!(path.points().len(), 1);
        assert_eq!(path.points()[0].pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut path = GesturePath::new();
        assert!(path.polyline().is_empty());
        path.begin(Vec2::ZERO, 0);
        assert!(path.polyline().is_empty());
        path.extend(Vec2::ONE, 0);
        assert_eq!(path.polyline().len(), 2);
    }

    #[test]
    fn test_hit_test_short_path_is_empty() {
        let mut path = GesturePath::new();
        path.begin(Vec2::ZERO, 0);
        let entities = vec![target(1, Vec2::ZERO)];
        assert!(path.hit_test(&entities).is_empty());
    }

    #[test]
    fn test_hit_test_reports_entity_once() {
        let mut path = GesturePath::new();
        path.begin(Vec2::new(-50.0, 0.0), 0);
        // Two segments both crossing the same target at the origin
        path.extend(Vec2::new(50.0, 0.0), 0);
        path.extend(Vec2::new(-50.0, 1.0), 0);
        let entities = vec![target(3, Vec2::ZERO)];
        assert_eq!(path.hit_test(&entities), vec![3]);
    }

    #[test]
    fn test_hit_test_in_registry_order() {
        let mut path = GesturePath::new();
        path.begin(Vec2::new(-50.0, 0.0), 0);
        path.extend(Vec2::new(50.0, 0.0), 0);
        let entities = vec![
            target(1, Vec2::new(-20.0, 0.0)),
            target(2, Vec2::new(200.0, 0.0)), // missed
            target(4, Vec2::new(20.0, 0.0)),
        ];
        assert_eq!(path.hit_test(&entities), vec![1, 4]);
    }

    #[test]
    fn test_end_twice_leaves_points_untouched() {
        let mut path = GesturePath::new();
        path.begin(Vec2::ZERO, 0);
        path.extend(Vec2::ONE, 0);
        assert!(path.end());
        let before: Vec<_> = path.points().to_vec();
        assert!(!path.end());
        assert_eq!(path.points(), &before[..]);
    }

    proptest! {
        #[test]
        fn prop_path_never_exceeds_cap_and_keeps_newest(
            samples in prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0), 0..64)
        ) {
            let mut path = GesturePath::new();
            path.begin(Vec2::ZERO, 0);
            for (i, (x, y)) in samples.iter().enumerate() {
                path.extend(Vec2::new(*x, *y), i as u64);
            }
            prop_assert!(path.points().len() <= GESTURE_MAX_POINTS);

            // The buffer tail must equal the most recent appends in order
            let mut all: Vec<Vec2> = vec![Vec2::ZERO];
            all.extend(samples.iter().map(|(x, y)| Vec2::new(*x, *y)));
            let tail = &all[all.len() - path.points().len()..];
            let kept: Vec<Vec2> = path.points().iter().map(|p| p.pos).collect();
            prop_assert_eq!(kept, tail.to_vec());
        }
    }
}
