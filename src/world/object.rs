//! Arena object kinds and records.
//!
//! The server sends every object as a loosely shaped JSON record whose
//! fields depend on its numeric `type`. Records are validated on arrival
//! and turned into a `GameObject` variant that carries only the fields its
//! kind uses.

use std::collections::HashMap;

use serde::Deserialize;

use crate::geometry::Point;

/// Server-assigned object identifier.
pub type ObjectId = String;

/// Errors that can occur while decoding an object record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectError {
    #[error("unknown object type code {0}")]
    UnknownType(u8),

    #[error("object type {} expects a single point position", .0.code())]
    ExpectedPoint(ObjectType),

    #[error("object type {} expects a polygon position", .0.code())]
    ExpectedPolygon(ObjectType),

    #[error("powerup record has no powerup_type")]
    MissingPowerupType,
}

/// The kind of an arena object, as numbered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
#[repr(u8)]
pub enum ObjectType {
    Tank = 1,
    Bullet = 2,
    Wall = 3,
    DestructibleWall = 4,
    Boundary = 5,
    ClosingBoundary = 6,
    Powerup = 7,
}

impl ObjectType {
    /// Returns the numeric wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a kind from its numeric wire code.
    pub fn from_code(code: u8) -> Option<ObjectType> {
        match code {
            1 => Some(ObjectType::Tank),
            2 => Some(ObjectType::Bullet),
            3 => Some(ObjectType::Wall),
            4 => Some(ObjectType::DestructibleWall),
            5 => Some(ObjectType::Boundary),
            6 => Some(ObjectType::ClosingBoundary),
            7 => Some(ObjectType::Powerup),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ObjectType {
    type Error = ObjectError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ObjectType::from_code(code).ok_or(ObjectError::UnknownType(code))
    }
}

/// The effect granted by a powerup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerupType {
    Speed,
    Damage,
    Health,
}

impl PowerupType {
    /// Returns the wire name.
    pub const fn name(self) -> &'static str {
        match self {
            PowerupType::Speed => "SPEED",
            PowerupType::Damage => "DAMAGE",
            PowerupType::Health => "HEALTH",
        }
    }

    /// Parses a powerup type from its wire name.
    pub fn from_name(s: &str) -> Option<PowerupType> {
        match s {
            "SPEED" => Some(PowerupType::Speed),
            "DAMAGE" => Some(PowerupType::Damage),
            "HEALTH" => Some(PowerupType::Health),
            _ => None,
        }
    }
}

/// A validated arena object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawObject")]
pub enum GameObject {
    Tank {
        position: Point,
        /// Powerups currently held by the tank.
        powerups: Vec<PowerupType>,
    },
    Bullet {
        position: Point,
    },
    Wall {
        position: Point,
    },
    DestructibleWall {
        position: Point,
    },
    Boundary {
        vertices: Vec<Point>,
    },
    ClosingBoundary {
        vertices: Vec<Point>,
    },
    Powerup {
        position: Point,
        powerup_type: PowerupType,
    },
}

impl GameObject {
    /// Returns the object's kind.
    pub fn kind(&self) -> ObjectType {
        match self {
            GameObject::Tank { .. } => ObjectType::Tank,
            GameObject::Bullet { .. } => ObjectType::Bullet,
            GameObject::Wall { .. } => ObjectType::Wall,
            GameObject::DestructibleWall { .. } => ObjectType::DestructibleWall,
            GameObject::Boundary { .. } => ObjectType::Boundary,
            GameObject::ClosingBoundary { .. } => ObjectType::ClosingBoundary,
            GameObject::Powerup { .. } => ObjectType::Powerup,
        }
    }

    /// Returns the position of a single-point object, or None for boundaries.
    pub fn position(&self) -> Option<Point> {
        match self {
            GameObject::Tank { position, .. }
            | GameObject::Bullet { position }
            | GameObject::Wall { position }
            | GameObject::DestructibleWall { position }
            | GameObject::Powerup { position, .. } => Some(*position),
            GameObject::Boundary { .. } | GameObject::ClosingBoundary { .. } => None,
        }
    }

    /// Returns every point describing the object: one for point objects,
    /// all vertices for boundaries.
    pub fn points(&self) -> &[Point] {
        match self {
            GameObject::Tank { position, .. }
            | GameObject::Bullet { position }
            | GameObject::Wall { position }
            | GameObject::DestructibleWall { position }
            | GameObject::Powerup { position, .. } => std::slice::from_ref(position),
            GameObject::Boundary { vertices } | GameObject::ClosingBoundary { vertices } => {
                vertices
            }
        }
    }

    /// Returns true if this is a tank holding the given powerup.
    pub fn holds(&self, powerup: PowerupType) -> bool {
        match self {
            GameObject::Tank { powerups, .. } => powerups.contains(&powerup),
            _ => false,
        }
    }
}

/// Position as sent on the wire: a point or a vertex list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Point(Point),
    Polygon(Vec<Point>),
}

/// Held powerups arrive either as a list of names or a map keyed by name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPowerups {
    List(Vec<String>),
    Map(HashMap<String, serde_json::Value>),
}

impl RawPowerups {
    fn into_types(self) -> Vec<PowerupType> {
        let names: Vec<String> = match self {
            RawPowerups::List(names) => names,
            RawPowerups::Map(map) => map.into_keys().collect(),
        };
        names.iter().filter_map(|n| PowerupType::from_name(n)).collect()
    }
}

/// An object record exactly as the server sends it. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(rename = "type")]
    kind: ObjectType,
    position: RawPosition,
    #[serde(default)]
    powerup_type: Option<PowerupType>,
    #[serde(default)]
    powerups: Option<RawPowerups>,
}

impl TryFrom<RawObject> for GameObject {
    type Error = ObjectError;

    fn try_from(raw: RawObject) -> Result<Self, Self::Error> {
        let kind = raw.kind;
        let point = |pos: RawPosition| match pos {
            RawPosition::Point(p) => Ok(p),
            RawPosition::Polygon(_) => Err(ObjectError::ExpectedPoint(kind)),
        };
        let polygon = |pos: RawPosition| match pos {
            RawPosition::Polygon(v) => Ok(v),
            RawPosition::Point(_) => Err(ObjectError::ExpectedPolygon(kind)),
        };

        Ok(match kind {
            ObjectType::Tank => GameObject::Tank {
                position: point(raw.position)?,
                powerups: raw.powerups.map(RawPowerups::into_types).unwrap_or_default(),
            },
            ObjectType::Bullet => GameObject::Bullet { position: point(raw.position)? },
            ObjectType::Wall => GameObject::Wall { position: point(raw.position)? },
            ObjectType::DestructibleWall => GameObject::DestructibleWall {
                position: point(raw.position)?,
            },
            ObjectType::Boundary => GameObject::Boundary { vertices: polygon(raw.position)? },
            ObjectType::ClosingBoundary => GameObject::ClosingBoundary {
                vertices: polygon(raw.position)?,
            },
            ObjectType::Powerup => GameObject::Powerup {
                position: point(raw.position)?,
                powerup_type: raw.powerup_type.ok_or(ObjectError::MissingPowerupType)?,
            },
        })
    }
}
