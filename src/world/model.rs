//! The bot's incrementally maintained picture of the arena.
//!
//! Holds every object the server has told us about, keyed by id, and the
//! fixed arena dimensions derived from the outer boundary once the init
//! phase is over. Turn deltas delete first and then upsert whole records.

use std::collections::{BTreeMap, HashMap};

use super::object::{GameObject, ObjectId, ObjectType};
use crate::geometry::Point;

/// A batch of new or replaced objects, ordered by id.
pub type ObjectBatch = BTreeMap<ObjectId, GameObject>;

/// Errors raised while building the world model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("no boundary objects were received during init")]
    NoBoundary,
}

/// Changes to apply for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnDelta {
    pub deleted_ids: Vec<ObjectId>,
    pub updated_objects: ObjectBatch,
}

/// One inbound turn message: either a delta or the end-of-game signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Update(TurnDelta),
    End,
}

/// The object table plus game-lifetime constants.
#[derive(Debug, Clone)]
pub struct WorldModel {
    pub own_tank_id: ObjectId,
    pub enemy_tank_id: ObjectId,
    objects: HashMap<ObjectId, Slot>,
    /// Ids keyed by insertion sequence, for stable iteration.
    order: BTreeMap<u64, ObjectId>,
    next_seq: u64,
    arena_width: f64,
    arena_height: f64,
}

/// A tracked object and the sequence number it was first inserted under.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    object: GameObject,
}

impl WorldModel {
    /// Creates an empty world for the given pair of tanks.
    pub fn new(own_tank_id: impl Into<ObjectId>, enemy_tank_id: impl Into<ObjectId>) -> Self {
        WorldModel {
            own_tank_id: own_tank_id.into(),
            enemy_tank_id: enemy_tank_id.into(),
            objects: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            arena_width: 0.0,
            arena_height: 0.0,
        }
    }

    /// Absorbs every init batch, then sizes the arena from the boundary
    /// vertices: width and height are the largest x and y seen.
    pub fn ingest_init<I>(&mut self, batches: I) -> Result<(), WorldError>
    where
        I: IntoIterator<Item = ObjectBatch>,
    {
        for batch in batches {
            self.upsert_all(batch);
        }

        let mut vertices = self
            .objects_of_type(ObjectType::Boundary)
            .flat_map(|(_, obj)| obj.points())
            .peekable();
        if vertices.peek().is_none() {
            return Err(WorldError::NoBoundary);
        }

        let (width, height) = vertices.fold((f64::MIN, f64::MIN), |(w, h), p| {
            (w.max(p.x), h.max(p.y))
        });
        self.arena_width = width;
        self.arena_height = height;
        log::info!("arena is {}x{}", width, height);
        Ok(())
    }

    /// Applies one turn. Returns false, leaving the model untouched, when the
    /// turn is the end-of-game signal.
    ///
    /// Deletions run before updates, so an id both deleted and updated in
    /// the same turn ends up present. Deleting an unknown id is a no-op.
    pub fn apply_turn(&mut self, turn: Turn) -> bool {
        let delta = match turn {
            Turn::Update(delta) => delta,
            Turn::End => return false,
        };

        for id in &delta.deleted_ids {
            self.remove(id);
        }
        self.upsert_all(delta.updated_objects);
        true
    }

    /// Inserts or wholesale replaces a single object.
    ///
    /// A replaced object keeps its original place in iteration order.
    pub fn upsert(&mut self, id: ObjectId, object: GameObject) {
        if let Some(slot) = self.objects.get_mut(&id) {
            slot.object = object;
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id.clone());
        self.objects.insert(id, Slot { seq, object });
    }

    fn upsert_all(&mut self, batch: ObjectBatch) {
        for (id, object) in batch {
            self.upsert(id, object);
        }
    }

    /// Removes an object. Returns false if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.objects.remove(id) {
            Some(slot) => {
                self.order.remove(&slot.seq);
                true
            }
            None => false,
        }
    }

    /// Looks up any object by id.
    pub fn get(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id).map(|slot| &slot.object)
    }

    /// Looks up a tank by id. Returns None if the id is absent or not a tank.
    pub fn tank(&self, id: &str) -> Option<&GameObject> {
        self.get(id).filter(|obj| obj.kind() == ObjectType::Tank)
    }

    /// Position of the tank with the given id.
    pub fn tank_position(&self, id: &str) -> Option<Point> {
        self.tank(id).and_then(GameObject::position)
    }

    /// Our own tank, if still alive.
    pub fn own_tank(&self) -> Option<&GameObject> {
        self.tank(&self.own_tank_id)
    }

    /// All objects of one kind, in insertion order.
    pub fn objects_of_type(
        &self,
        kind: ObjectType,
    ) -> impl Iterator<Item = (&str, &GameObject)> + '_ {
        self.order.values().filter_map(move |id| {
            let obj = &self.objects[id].object;
            (obj.kind() == kind).then_some((id.as_str(), obj))
        })
    }

    /// Positions of all single-point objects of one kind, in insertion order.
    pub fn positions_of_type(&self, kind: ObjectType) -> impl Iterator<Item = Point> + '_ {
        self.objects_of_type(kind).filter_map(|(_, obj)| obj.position())
    }

    pub fn arena_width(&self) -> f64 {
        self.arena_width
    }

    pub fn arena_height(&self) -> f64 {
        self.arena_height
    }

    /// Centre of the arena.
    pub fn arena_center(&self) -> Point {
        Point::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Number of objects currently tracked.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x: f64, y: f64) -> GameObject {
        GameObject::Wall { position: Point::new(x, y) }
    }

    fn boundary(corners: &[(f64, f64)]) -> GameObject {
        GameObject::Boundary {
            vertices: corners.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    fn batch(items: Vec<(&str, GameObject)>) -> ObjectBatch {
        items.into_iter().map(|(id, o)| (id.to_string(), o)).collect()
    }

    #[test]
    fn init_sizes_arena_from_boundary() {
        let mut world = WorldModel::new("a", "b");
        world
            .ingest_init(vec![
                batch(vec![("w1", wall(3.0, 3.0))]),
                batch(vec![("edge", boundary(&[(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0)]))]),
            ])
            .unwrap();
        assert_eq!(world.arena_width(), 1000.0);
        assert_eq!(world.arena_height(), 1000.0);
        assert_eq!(world.len(), 2);
        assert_eq!(world.arena_center(), Point::new(500.0, 500.0));
    }

    #[test]
    fn init_takes_max_across_boundary_objects() {
        let mut world = WorldModel::new("a", "b");
        world
            .ingest_init(vec![batch(vec![
                ("e1", boundary(&[(0.0, 0.0), (1740.0, 0.0)])),
                ("e2", boundary(&[(0.0, 750.0), (10.0, 20.0)])),
            ])])
            .unwrap();
        assert_eq!(world.arena_width(), 1740.0);
        assert_eq!(world.arena_height(), 750.0);
    }

    #[test]
    fn init_without_boundary_fails() {
        let mut world = WorldModel::new("a", "b");
        let result = world.ingest_init(vec![batch(vec![("w1", wall(1.0, 1.0))])]);
        assert_eq!(result, Err(WorldError::NoBoundary));
    }

    #[test]
    fn end_signal_leaves_model_untouched() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("w1".into(), wall(1.0, 1.0));
        assert!(!world.apply_turn(Turn::End));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn deletion_without_updates_removes() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("w1".into(), wall(1.0, 1.0));
        let turn = Turn::Update(TurnDelta {
            deleted_ids: vec!["w1".into()],
            updated_objects: ObjectBatch::new(),
        });
        assert!(world.apply_turn(turn));
        assert!(world.get("w1").is_none());
        assert_eq!(world.objects_of_type(ObjectType::Wall).count(), 0);
    }

    #[test]
    fn update_wins_over_deletion_in_same_turn() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("w1".into(), wall(1.0, 1.0));
        let turn = Turn::Update(TurnDelta {
            deleted_ids: vec!["w1".into()],
            updated_objects: batch(vec![("w1", wall(2.0, 2.0))]),
        });
        world.apply_turn(turn);
        assert_eq!(world.get("w1"), Some(&wall(2.0, 2.0)));
    }

    #[test]
    fn unknown_deletion_is_noop() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("w1".into(), wall(1.0, 1.0));
        let turn = Turn::Update(TurnDelta {
            deleted_ids: vec!["ghost".into(), "ghost".into()],
            updated_objects: ObjectBatch::new(),
        });
        assert!(world.apply_turn(turn));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn update_replaces_whole_record() {
        let mut world = WorldModel::new("a", "b");
        world.upsert(
            "a".into(),
            GameObject::Tank {
                position: Point::new(0.0, 0.0),
                powerups: vec![crate::world::PowerupType::Speed],
            },
        );
        world.upsert(
            "a".into(),
            GameObject::Tank { position: Point::new(5.0, 5.0), powerups: vec![] },
        );
        let tank = world.own_tank().unwrap();
        assert_eq!(tank.position(), Some(Point::new(5.0, 5.0)));
        assert!(!tank.holds(crate::world::PowerupType::Speed));
    }

    #[test]
    fn iteration_follows_first_insertion() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("z".into(), wall(1.0, 1.0));
        world.upsert("m".into(), wall(2.0, 2.0));
        world.upsert("z".into(), wall(3.0, 3.0));
        let ids: Vec<&str> = world.objects_of_type(ObjectType::Wall).map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["z", "m"]);
    }

    #[test]
    fn removal_keeps_order_of_survivors() {
        let mut world = WorldModel::new("a", "b");
        for (i, id) in ["w1", "w2", "w3", "w4"].iter().enumerate() {
            world.upsert(id.to_string(), wall(i as f64, 0.0));
        }
        assert!(world.remove("w2"));
        assert!(!world.remove("w2"));
        // Replacing keeps the slot; removing and re-adding goes to the back.
        world.upsert("w1".into(), wall(9.0, 9.0));
        world.remove("w3");
        world.upsert("w3".into(), wall(3.0, 3.0));

        let ids: Vec<&str> = world.objects_of_type(ObjectType::Wall).map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["w1", "w4", "w3"]);
        assert_eq!(world.len(), 3);
        assert_eq!(world.get("w1"), Some(&wall(9.0, 9.0)));
    }

    #[test]
    fn tank_lookup_rejects_other_kinds() {
        let mut world = WorldModel::new("a", "b");
        world.upsert("a".into(), wall(1.0, 1.0));
        assert!(world.tank("a").is_none());
        assert!(world.tank_position("b").is_none());
    }
}
