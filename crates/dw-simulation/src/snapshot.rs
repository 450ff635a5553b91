use dw_core::{AgentId, Team, Vec2};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentState};
use crate::world::{Base, Resource, Scores, World};

/// Read-only view of one agent for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Agent id.
    pub id: AgentId,
    /// Owning team.
    pub team: Team,
    /// Current position.
    pub position: Vec2,
    /// Active state.
    pub state: AgentState,
    /// Whether it holds a resource.
    pub carrying: bool,
    /// Current position, then the destination if any.
    pub path: Vec<Vec2>,
    /// Whether the path should be drawn.
    pub path_visible: bool,
}

impl AgentView {
    /// Project an agent against the world it lives in.
    pub fn of(agent: &Agent, world: &World) -> Self {
        Self {
            id: agent.id(),
            team: agent.team(),
            position: agent.position(),
            state: agent.state(),
            carrying: agent.carrying(),
            path: agent.path(world),
            path_visible: agent.path_visible(),
        }
    }
}

/// Everything a renderer or scoreboard needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the snapshot was taken after.
    pub tick: u64,
    /// Simulated seconds so far.
    pub elapsed: f64,
    /// Both team scores.
    pub scores: Scores,
    /// Team bases, team A first.
    pub bases: Vec<Base>,
    /// Live resources in pool order.
    pub resources: Vec<Resource>,
    /// Live agents in tick order.
    pub agents: Vec<AgentView>,
}

impl Snapshot {
    /// Agents of one team.
    pub fn agents_of(&self, team: Team) -> impl Iterator<Item = &AgentView> {
        self.agents.iter().filter(move |a| a.team == team)
    }
}
