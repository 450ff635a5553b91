use dw_core::AgentId;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation driver.
///
/// Target loss and out-of-range configuration are recovered locally and
/// never show up here; these variants are internal-consistency faults.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No agent with this id is alive in the current fleet.
    #[error("agent not found in simulation: {0}")]
    AgentNotFound(AgentId),

    /// `tick` was called with a negative or non-finite time step.
    #[error("invalid time step: {0} (must be finite and non-negative)")]
    InvalidTimeStep(f32),

    /// An agent ended a tick in an impossible state (e.g. a NaN position).
    #[error("invariant violated by {agent}: {detail}")]
    InvariantViolation {
        /// The offending agent.
        agent: AgentId,
        /// What was wrong.
        detail: String,
    },
}
