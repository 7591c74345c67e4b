//! Powerup target selection.
//!
//! Filters the visible powerups down to those that are inside the safe zone
//! and can be reached before the boundary sweeps over them, then scores the
//! survivors on four weighted features and returns the best one.
//!
//! Scoring features, summed per candidate:
//! - distance to own tank, rescaled to `self_scale` (default -10)
//! - distance to the enemy, rescaled to `enemy_scale`
//! - `boundary_scale` minus distance to the boundary rescaled to `boundary_scale`
//! - a fixed per-kind score
//!
//! With its negative scale the distance-to-self shares of all candidates
//! sum to `self_scale`, so nearer powerups lose less from it.

use crate::config::EngineConfig;
use crate::geometry::{distance, rescale, GeometryError, Point};
use crate::tactics::boundary::{BoundaryError, BoundaryTracker};
use crate::world::{GameObject, ObjectType, PowerupType, WorldModel};

/// A powerup that survived filtering, with its total score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub id: &'a str,
    pub position: Point,
    pub powerup_type: PowerupType,
    pub score: f64,
}

/// Picks the most attractive powerup for one turn.
pub struct PowerupSelector<'a> {
    world: &'a WorldModel,
    boundary: &'a BoundaryTracker,
    config: &'a EngineConfig,
}

impl<'a> PowerupSelector<'a> {
    pub fn new(
        world: &'a WorldModel,
        boundary: &'a BoundaryTracker,
        config: &'a EngineConfig,
    ) -> Self {
        PowerupSelector {
            world,
            boundary,
            config,
        }
    }

    /// Returns the best reachable powerup, or None if nothing qualifies.
    ///
    /// Candidates are ranked by ascending distance to `own_pos` before
    /// scoring, so equal totals go to the nearer powerup.
    pub fn select_best(
        &self,
        own_pos: Point,
        enemy_pos: Point,
        own_speed: f64,
    ) -> Result<Option<Candidate<'a>>, BoundaryError> {
        let mut candidates = self.reachable_candidates(own_pos, own_speed)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        candidates.sort_by(|a, b| {
            distance(own_pos, a.position).total_cmp(&distance(own_pos, b.position))
        });

        let to_self: Vec<f64> = candidates.iter().map(|c| distance(own_pos, c.position)).collect();
        let to_enemy: Vec<f64> = candidates.iter().map(|c| distance(enemy_pos, c.position)).collect();
        let to_boundary = candidates
            .iter()
            .map(|c| self.boundary.distance_to_boundary(c.position))
            .collect::<Result<Vec<f64>, _>>()?;

        let cfg = self.config;
        let self_scores = feature(&to_self, cfg.self_scale, "self");
        let enemy_scores = feature(&to_enemy, cfg.enemy_scale, "enemy");
        let boundary_scores: Vec<f64> = match rescale(&to_boundary, cfg.boundary_scale) {
            Ok(shares) => shares.into_iter().map(|s| cfg.boundary_scale - s).collect(),
            Err(e) => zero_feature(to_boundary.len(), "boundary", e),
        };

        for (i, c) in candidates.iter_mut().enumerate() {
            c.score = self_scores[i]
                + enemy_scores[i]
                + boundary_scores[i]
                + cfg.type_scores.score(c.powerup_type);
            log::debug!(
                "powerup {} {} at {:?} scores {:.3}",
                c.id,
                c.powerup_type.name(),
                c.position,
                c.score
            );
        }

        let mut best: Option<Candidate<'a>> = None;
        for c in candidates {
            if best.as_ref().map_or(true, |b| c.score > b.score) {
                best = Some(c);
            }
        }
        Ok(best)
    }

    /// Builds a fresh list of powerups that are inside the safe zone and
    /// either close by or reachable before the boundary.
    fn reachable_candidates(
        &self,
        own_pos: Point,
        own_speed: f64,
    ) -> Result<Vec<Candidate<'a>>, BoundaryError> {
        let mut kept = Vec::new();
        for (id, obj) in self.world.objects_of_type(ObjectType::Powerup) {
            let (position, powerup_type) = match obj {
                GameObject::Powerup {
                    position,
                    powerup_type,
                } => (*position, *powerup_type),
                _ => continue,
            };
            if !self.boundary.contains(position) {
                continue;
            }
            if distance(own_pos, position) > self.config.reach_check_radius
                && !self.boundary.is_target_reachable(
                    own_pos,
                    position,
                    own_speed,
                    self.config.boundary_speed,
                )?
            {
                continue;
            }
            kept.push(Candidate {
                id,
                position,
                powerup_type,
                score: 0.0,
            });
        }
        Ok(kept)
    }
}

/// Rescales one feature, falling back to no contribution when the values
/// sum to zero.
fn feature(values: &[f64], scale: f64, name: &str) -> Vec<f64> {
    rescale(values, scale).unwrap_or_else(|e| zero_feature(values.len(), name, e))
}

fn zero_feature(len: usize, name: &str, err: GeometryError) -> Vec<f64> {
    log::debug!("{} feature dropped: {}", name, err);
    vec![0.0; len]
}
