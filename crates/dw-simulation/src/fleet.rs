use std::collections::HashSet;

use dw_core::{AgentId, IdAllocator, ResourceId, Team, Vec2};
use log::info;

use crate::agent::{Agent, AgentParams, Peers};
use crate::config::{SimConfig, clamp_fleet_size, clamp_speed};
use crate::context::SimContext;
use crate::world::World;

/// New agents appear within this offset of their base.
pub const SPAWN_SCATTER: Vec2 = Vec2::new(1.0, 2.0);

/// Both team rosters plus the settings broadcast to every agent.
///
/// Agents are stored, and ticked, in creation order: all of team A, then all
/// of team B. When two agents finish collecting the same resource on the same
/// tick, the one created first wins.
#[derive(Debug, Clone)]
pub struct Fleet {
    agents: Vec<Agent>,
    ids: IdAllocator,
    size: usize,
    speed: f32,
    path_visible: bool,
    reserve_targets: bool,
    params: AgentParams,
}

impl Fleet {
    /// An empty fleet carrying the configured settings. Call
    /// [`Fleet::rebuild`] to populate it.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            agents: Vec::new(),
            ids: IdAllocator::new(),
            size: clamp_fleet_size(config.fleet_size),
            speed: clamp_speed(config.speed, SimConfig::default().speed),
            path_visible: config.path_visible,
            reserve_targets: config.reserve_targets,
            params: AgentParams::from(config),
        }
    }

    /// Destroy every agent and create `size` fresh ones per team.
    ///
    /// `size` is clamped to the valid range; the clamped value is returned.
    /// Agents in the middle of a task are dropped along with their cargo.
    pub fn set_fleet_size(&mut self, size: usize, world: &mut World) -> usize {
        self.size = clamp_fleet_size(size);
        self.rebuild(world);
        self.size
    }

    /// Destroy every agent and recreate both rosters at the current size.
    pub fn rebuild(&mut self, world: &mut World) {
        self.agents.clear();
        for team in Team::ALL {
            let home = world.base(team).position;
            for _ in 0..self.size {
                let position = world.scatter_near(home, SPAWN_SCATTER);
                self.spawn_agent(team, position);
            }
        }
        info!(
            "created {} agents per team ({} total)",
            self.size,
            self.agents.len()
        );
    }

    /// Add a single agent at an exact position, with the current settings.
    pub fn spawn_agent(&mut self, team: Team, position: Vec2) -> AgentId {
        let id = self.ids.next_agent();
        let mut agent = Agent::new(id, team, position, self.speed, self.params);
        agent.set_path_visible(self.path_visible);
        self.agents.push(agent);
        id
    }

    /// Set the speed of every agent, now and for agents created later.
    /// Returns the clamped value.
    pub fn set_speed(&mut self, speed: f32) -> f32 {
        self.speed = clamp_speed(speed, self.speed);
        for agent in &mut self.agents {
            agent.set_speed(self.speed);
        }
        self.speed
    }

    /// Show or hide every agent's path, now and for agents created later.
    pub fn set_path_visible(&mut self, visible: bool) {
        self.path_visible = visible;
        for agent in &mut self.agents {
            agent.set_path_visible(visible);
        }
    }

    /// Toggle target reservation.
    pub fn set_reserve_targets(&mut self, reserve: bool) {
        self.reserve_targets = reserve;
    }

    /// Tick every agent once, in creation order.
    ///
    /// Each agent steers around the live positions of its peers, so agents
    /// earlier in the order have already moved when later ones look.
    pub fn tick(&mut self, ctx: &mut SimContext<'_>) {
        let mut positions: Vec<Vec2> = self.agents.iter().map(Agent::position).collect();
        let mut targets: Vec<Option<ResourceId>> =
            self.agents.iter().map(Agent::target).collect();
        let reserve = self.reserve_targets;

        for (i, agent) in self.agents.iter_mut().enumerate() {
            let neighbors: Vec<Vec2> = positions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| *p)
                .collect();
            let claimed: HashSet<ResourceId> = if reserve {
                targets
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .filter_map(|(_, t)| *t)
                    .collect()
            } else {
                HashSet::new()
            };
            let peers = Peers {
                positions: &neighbors,
                claimed: &claimed,
            };
            agent.tick(ctx, &peers);
            positions[i] = agent.position();
            targets[i] = agent.target();
        }
    }

    /// All live agents in tick order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up a live agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Live agents of one team.
    pub fn agents_of(&self, team: Team) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(move |a| a.team() == team)
    }

    /// Number of live agents across both teams.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agents are alive.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Configured agents per team.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current shared speed.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current path visibility.
    pub fn path_visible(&self) -> bool {
        self.path_visible
    }

    /// Whether searching agents skip resources targeted by peers.
    pub fn reserve_targets(&self) -> bool {
        self.reserve_targets
    }
}
