//! Tactical queries over the world model.
//!
//! Read-only helpers the decision engine consults each turn: the closing
//! boundary, powerup targeting, and line of sight to the enemy.

pub mod boundary;
pub mod powerup;
pub mod sight;

pub use boundary::{BoundaryError, BoundaryTracker};
pub use powerup::{Candidate, PowerupSelector};
pub use sight::LineOfSight;
