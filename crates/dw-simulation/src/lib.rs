//! Tick-based drone harvesting simulation for Dronewar.
//!
//! Two teams of agents compete for resources on a bounded field. The
//! [`World`] owns the resource pool, bases, and scores and arbitrates every
//! collection; each [`Agent`] runs a search, collect, return, unload cycle
//! with local collision avoidance; the [`Simulation`] advances everything by
//! explicit time steps, so runs are reproducible from a seed.

/// Agent state machine.
pub mod agent;
/// Simulation clock for ticks and elapsed seconds.
pub mod clock;
/// Configuration types and boundary clamps.
pub mod config;
/// Mutable context passed to agents and the spawn scheduler each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Both team rosters and the settings broadcast to them.
pub mod fleet;
/// Read-only per-tick projections for renderers and scoreboards.
pub mod snapshot;
/// Periodic resource spawning.
pub mod spawn;
/// Top-level simulation driver.
pub mod simulation;
/// Collision-avoidance steering.
pub mod steering;
/// Resource pool, bases, and scores.
pub mod world;

/// Re-exports of the agent types.
pub use agent::{Agent, AgentState};
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`fleet::Fleet`].
pub use fleet::Fleet;
/// Re-exports of the snapshot types.
pub use snapshot::{AgentView, Snapshot};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`spawn::SpawnScheduler`].
pub use spawn::SpawnScheduler;
/// Re-exports of the world types.
pub use world::{Base, Resource, Scores, World};
