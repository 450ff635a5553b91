//! Core types for Dronewar: teams, identifiers, and field geometry.
//!
//! This crate holds the leaf vocabulary shared by the simulation and its
//! frontends. It has no notion of time or behaviour; see `dw-simulation`
//! for the world model and the agent state machine.

/// Field geometry: bounds, distances, and movement helpers on [`glam::Vec2`].
pub mod geometry;
/// Stable identifiers for agents and resources.
pub mod id;
/// The two competing teams.
pub mod team;

/// Re-export geometry types.
pub use geometry::Bounds;
/// Re-export identifier types.
pub use id::{AgentId, IdAllocator, ResourceId};
/// Re-export the team enum.
pub use team::Team;

/// Re-export of the vector type used for every position on the field.
pub use glam::Vec2;
