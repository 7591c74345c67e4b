//! Closing-boundary tracking.
//!
//! The safe zone shrinks over the game. Its current outline is whatever
//! CLOSING_BOUNDARY vertices the server last sent, treated as a point cloud:
//! the zone is approximated by their bounding box and distances are taken
//! to the nearest vertex.

use crate::geometry::{distance, Point};
use crate::world::{ObjectType, WorldModel};

/// Errors raised by boundary queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    #[error("no closing boundary data in the world model")]
    NoClosingBoundary,
}

/// Snapshot of the closing boundary for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryTracker {
    polygon: Vec<Point>,
}

impl BoundaryTracker {
    /// Collects the vertices of every closing-boundary object in the world.
    pub fn from_world(world: &WorldModel) -> Self {
        let polygon = world
            .objects_of_type(ObjectType::ClosingBoundary)
            .flat_map(|(_, obj)| obj.points().iter().copied())
            .collect();
        BoundaryTracker { polygon }
    }

    pub fn closing_polygon(&self) -> &[Point] {
        &self.polygon
    }

    /// The boundary vertex nearest to `pos`. Ties go to the first vertex.
    pub fn closest_point(&self, pos: Point) -> Result<Point, BoundaryError> {
        let mut best: Option<(Point, f64)> = None;
        for &vertex in &self.polygon {
            let d = distance(pos, vertex);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((vertex, d));
            }
        }
        best.map(|(p, _)| p).ok_or(BoundaryError::NoClosingBoundary)
    }

    /// Distance from `pos` to the nearest boundary vertex.
    pub fn distance_to_boundary(&self, pos: Point) -> Result<f64, BoundaryError> {
        Ok(distance(pos, self.closest_point(pos)?))
    }

    /// Min and max corners of the boundary's axis-aligned bounding box.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.polygon.first()?;
        let (min, max) = self.polygon.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some((min, max))
    }

    /// True if `pos` lies strictly inside the bounding box. Points on an
    /// edge are outside, and so is everything when there is no boundary.
    pub fn contains(&self, pos: Point) -> bool {
        match self.bounding_box() {
            Some((min, max)) => min.x < pos.x && pos.x < max.x && min.y < pos.y && pos.y < max.y,
            None => false,
        }
    }

    /// Coarse danger alarm: fires when either axis gap to `boundary_point`
    /// is below `margin`. The axes are checked independently, so this is
    /// not a Euclidean proximity test.
    pub fn is_near(tank_pos: Point, boundary_point: Point, margin: f64) -> bool {
        (tank_pos.x - boundary_point.x).abs() < margin
            || (tank_pos.y - boundary_point.y).abs() < margin
    }

    /// Ticks needed to cover the straight line from `from` to `to`.
    pub fn time_to_reach(from: Point, to: Point, speed: f64) -> f64 {
        distance(from, to) / speed
    }

    /// True if the tank gets to `target` strictly before the boundary does.
    ///
    /// The boundary's travel is estimated as the distance from its vertex
    /// nearest `target` to `target`, at `boundary_speed`.
    pub fn is_target_reachable(
        &self,
        own_pos: Point,
        target: Point,
        own_speed: f64,
        boundary_speed: f64,
    ) -> Result<bool, BoundaryError> {
        let ours = Self::time_to_reach(own_pos, target, own_speed);
        let theirs = Self::time_to_reach(self.closest_point(target)?, target, boundary_speed);
        Ok(ours < theirs)
    }
}
