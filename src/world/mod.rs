//! World representation.
//!
//! Contains the typed arena objects and the object table that tracks them
//! across turns.

pub mod model;
pub mod object;

pub use model::{ObjectBatch, Turn, TurnDelta, WorldError, WorldModel};
pub use object::{GameObject, ObjectError, ObjectId, ObjectType, PowerupType};
