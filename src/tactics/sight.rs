//! Line-of-sight checks for shooting.
//!
//! A shot is held back when an indestructible wall sits on the segment
//! between the two tanks, unless a destructible wall sits in front of that
//! wall from our side.

use crate::geometry::{point_between, Point};
use crate::world::{ObjectType, WorldModel};

pub struct LineOfSight<'a> {
    world: &'a WorldModel,
}

impl<'a> LineOfSight<'a> {
    pub fn new(world: &'a WorldModel) -> Self {
        LineOfSight { world }
    }

    /// First indestructible wall on the segment between the tanks.
    pub fn blocking_wall(&self, own_pos: Point, enemy_pos: Point) -> Option<Point> {
        self.world
            .positions_of_type(ObjectType::Wall)
            .find(|&wall| point_between(wall, enemy_pos, own_pos))
    }

    /// True if some destructible wall lies between us and `wall`.
    pub fn is_shielded_by_breakable(&self, own_pos: Point, wall: Point) -> bool {
        self.world
            .positions_of_type(ObjectType::DestructibleWall)
            .any(|breakable| point_between(breakable, own_pos, wall))
    }

    /// True if firing at the enemy is worthwhile this turn.
    pub fn is_clear_shot(&self, own_pos: Point, enemy_pos: Point) -> bool {
        match self.blocking_wall(own_pos, enemy_pos) {
            Some(wall) => {
                let shielded = self.is_shielded_by_breakable(own_pos, wall);
                log::debug!("wall at {:?} in line of fire, breakable cover: {}", wall, shielded);
                shielded
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GameObject;

    const OWN: Point = Point::new(100.0, 100.0);
    const ENEMY: Point = Point::new(300.0, 100.0);

    fn world_with(objects: Vec<(&str, GameObject)>) -> WorldModel {
        let mut world = WorldModel::new("me", "them");
        for (id, obj) in objects {
            world.upsert(id.into(), obj);
        }
        world
    }

    fn wall(x: f64, y: f64) -> GameObject {
        GameObject::Wall { position: Point::new(x, y) }
    }

    fn breakable(x: f64, y: f64) -> GameObject {
        GameObject::DestructibleWall { position: Point::new(x, y) }
    }

    #[test]
    fn open_field_is_clear() {
        let world = world_with(vec![]);
        assert!(LineOfSight::new(&world).is_clear_shot(OWN, ENEMY));
    }

    #[test]
    fn wall_between_blocks() {
        let world = world_with(vec![("w", wall(200.0, 100.0))]);
        let los = LineOfSight::new(&world);
        assert_eq!(los.blocking_wall(OWN, ENEMY), Some(Point::new(200.0, 100.0)));
        assert!(!los.is_clear_shot(OWN, ENEMY));
    }

    #[test]
    fn wall_off_the_line_does_not_block() {
        let world = world_with(vec![("w", wall(200.0, 160.0)), ("w2", wall(400.0, 100.0))]);
        assert!(LineOfSight::new(&world).is_clear_shot(OWN, ENEMY));
    }

    #[test]
    fn breakable_wall_alone_does_not_block() {
        let world = world_with(vec![("d", breakable(200.0, 100.0))]);
        let los = LineOfSight::new(&world);
        assert_eq!(los.blocking_wall(OWN, ENEMY), None);
        assert!(los.is_clear_shot(OWN, ENEMY));
    }

    #[test]
    fn breakable_wall_in_front_makes_it_shootable() {
        let world = world_with(vec![("w", wall(250.0, 100.0)), ("d", breakable(150.0, 100.0))]);
        assert!(LineOfSight::new(&world).is_clear_shot(OWN, ENEMY));
    }

    #[test]
    fn breakable_wall_behind_does_not_help() {
        let world = world_with(vec![("w", wall(150.0, 100.0)), ("d", breakable(250.0, 100.0))]);
        assert!(!LineOfSight::new(&world).is_clear_shot(OWN, ENEMY));
    }
}
